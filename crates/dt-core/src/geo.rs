//! Coordinates of nodes, facilities and activity locations.
//!
//! Inputs carry WGS-84 latitude/longitude.  Distances are great-circle
//! metres; teleported legs scale them by a per-mode beeline factor.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 latitude/longitude pair.  `f32` keeps about one metre of
/// precision, which is enough to snap an activity to its nearest node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// Evaluated in `f64` so that short hops between neighbouring nodes do
    /// not collapse to zero.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        let (phi1, phi2) = (f64::from(self.lat).to_radians(), f64::from(other.lat).to_radians());
        let half_dphi = (phi2 - phi1) / 2.0;
        let half_dlambda = (f64::from(other.lon) - f64::from(self.lon)).to_radians() / 2.0;

        let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
        (2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()) as f32
    }

    /// Distance travelled by a teleported leg: the great-circle distance
    /// times `detour_factor` (1.3 for walk and bike by default).
    #[inline]
    pub fn beeline_m(self, other: GeoPoint, detour_factor: f32) -> f32 {
        self.distance_m(other) * detour_factor
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}
