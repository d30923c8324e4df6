//! Simulation time model.
//!
//! # Design
//!
//! Within one iteration, time is a count of whole seconds since midnight of
//! the simulated day.  Values past 24:00:00 are legal (late trips, an end time
//! of 30 h) and print as such, e.g. `26:15:00`.
//!
//! Using integer seconds keeps all plan arithmetic exact; scoring converts to
//! fractional hours only at the very end.

use std::fmt;
use std::str::FromStr;

use crate::DtError;

/// Seconds since simulated midnight.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u32);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MIDNIGHT: SimTime = SimTime(24 * 3_600);

    #[inline]
    pub const fn from_hms(h: u32, m: u32, s: u32) -> SimTime {
        SimTime(h * 3_600 + m * 60 + s)
    }

    /// `from_hms` that returns `None` instead of overflowing `u32`.
    pub fn checked_from_hms(h: u32, m: u32, s: u32) -> Option<SimTime> {
        h.checked_mul(3_600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(s)
            .map(SimTime)
    }

    #[inline]
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Fractional hours, used by scoring utilities.
    #[inline]
    pub fn hours(self) -> f64 {
        self.0 as f64 / 3_600.0
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u32> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u32) -> SimTime {
        SimTime(self.0.saturating_add(rhs))
    }
}

impl std::ops::Sub for SimTime {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: SimTime) -> u32 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3_600;
        let m = (self.0 % 3_600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Accepts plain seconds (`"27000"`) or clock notation (`"07:30"`, `"07:30:00"`).
impl FromStr for SimTime {
    type Err = DtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DtError::InvalidTime(s.to_owned());

        if !s.contains(':') {
            return s.parse::<u32>().map(SimTime).map_err(|_| invalid());
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        if fields[1] >= 60 || fields[2] >= 60 {
            return Err(invalid());
        }
        SimTime::checked_from_hms(fields[0], fields[1], fields[2]).ok_or_else(invalid)
    }
}
