//! Leg transport modes shared by population, routing, mobsim and scoring.

use std::str::FromStr;

use crate::DtError;

/// The means by which a leg is travelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransportMode {
    /// Private vehicle, routed on the road network.
    Car,
    /// On foot, teleported along the beeline.
    Walk,
    /// Bicycle, teleported along the beeline.
    Bike,
    /// Scheduled public transport.
    Pt,
    /// Passenger in someone else's car.
    Ride,
}

impl TransportMode {
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Car,
        TransportMode::Walk,
        TransportMode::Bike,
        TransportMode::Pt,
        TransportMode::Ride,
    ];

    /// `true` for modes whose legs are routed over network links.
    #[inline]
    pub fn is_network_mode(self) -> bool {
        matches!(self, TransportMode::Car | TransportMode::Ride)
    }

    /// Assumed beeline speed in m/s for teleported modes.
    pub fn teleport_speed_mps(self) -> f32 {
        match self {
            TransportMode::Walk => 1.4,
            TransportMode::Bike => 4.2,
            TransportMode::Pt   => 8.3,
            // Network modes take link travel times; this is only a fallback.
            TransportMode::Car | TransportMode::Ride => 13.9,
        }
    }

    /// Label used in plans files, config keys and event output.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car  => "car",
            TransportMode::Walk => "walk",
            TransportMode::Bike => "bike",
            TransportMode::Pt   => "pt",
            TransportMode::Ride => "ride",
        }
    }
}

impl FromStr for TransportMode {
    type Err = DtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DtError::UnknownMode(s.to_owned()))
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
