//! Default scoring: logarithmic utility of performing, linear disutility of
//! travelling.
//!
//! # Activity utility
//!
//! With `t` the performed duration and `T` the typical duration, both in
//! hours, and `β` the marginal utility of performing:
//!
//! ```text
//! t0 = T · exp(-10 / T)                       (zero-utility duration)
//! U  = β · T · ln(t / t0)          if t ≥ t0
//! U  = -(β · T / t0) · (t0 - t)    otherwise  (linear below t0)
//! ```
//!
//! The performed interval is clipped to the activity type's opening hours
//! when they are configured.  Types whose opening and closing times are both
//! zero contribute nothing.
//!
//! # Leg utility
//!
//! `marginal_utility_of_traveling(mode) · travel_hours`.

use std::sync::Arc;

use dt_config::{ActivityParams, ScoringConfig};
use dt_core::{AgentId, SimTime, TransportMode};

use crate::function::{ActivityRecord, LegRecord, ScoringFunction, ScoringFunctionFactory};
use crate::Map;

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct ActivityUtility {
    typical_h:      f64,
    zero_utility_h: f64,
    opening_s:      Option<f64>,
    closing_s:      Option<f64>,
    scored:         bool,
}

impl From<&ActivityParams> for ActivityUtility {
    fn from(p: &ActivityParams) -> Self {
        let typical_h = p.typical_duration / 3_600.0;
        let zero_utility_h = typical_h * (-10.0 / typical_h).exp();
        // A zero-utility duration that underflows to 0 would make ln(t / t0)
        // infinite, so such types are left unscored.
        let usable = typical_h.is_finite() && zero_utility_h > 0.0;
        Self {
            typical_h,
            zero_utility_h,
            opening_s:      p.opening_time,
            closing_s:      p.closing_time,
            scored:         usable && p.scores_at_all(),
        }
    }
}

/// Scoring configuration preprocessed for lookups during scoring.
#[derive(Clone, Debug)]
pub struct ScoringParameters {
    performing_utils_hr: f64,
    stuck_penalty:       f64,
    traveling_utils_hr:  Map<TransportMode, f64>,
    activities:          Map<String, ActivityUtility>,
}

impl ScoringParameters {
    pub fn from_config(config: &ScoringConfig) -> Self {
        let traveling_utils_hr = TransportMode::ALL
            .into_iter()
            .map(|m| (m, config.traveling_utils_hr(m.as_str())))
            .collect();
        let activities = config
            .all_activity_params()
            .iter()
            .map(|p| (p.activity_type.clone(), ActivityUtility::from(p)))
            .collect();
        Self {
            performing_utils_hr: config.performing_utils_hr,
            stuck_penalty: config.stuck_penalty,
            traveling_utils_hr,
            activities,
        }
    }

    pub fn knows_activity(&self, activity_type: &str) -> bool {
        self.activities.contains_key(activity_type)
    }

    fn traveling(&self, mode: TransportMode) -> f64 {
        self.traveling_utils_hr.get(&mode).copied().unwrap_or_default()
    }

    /// Utility of performing `activity_type` from `start_s` to `end_s`.
    fn activity_utility(&self, activity_type: &str, start_s: f64, end_s: f64) -> f64 {
        let Some(u) = self.activities.get(activity_type) else {
            return 0.0;
        };
        if !u.scored {
            return 0.0;
        }
        let start = u.opening_s.map_or(start_s, |o| start_s.max(o));
        let end   = u.closing_s.map_or(end_s, |c| end_s.min(c));
        let dur_h = ((end - start) / 3_600.0).max(0.0);
        let beta_t = self.performing_utils_hr * u.typical_h;
        if dur_h >= u.zero_utility_h {
            beta_t * (dur_h / u.zero_utility_h).ln()
        } else {
            -(beta_t / u.zero_utility_h) * (u.zero_utility_h - dur_h)
        }
    }
}

// ── TypicalDurationScoring ────────────────────────────────────────────────────

pub struct TypicalDurationScoring {
    params:   Arc<ScoringParameters>,
    score:    f64,
    finished: bool,
}

impl TypicalDurationScoring {
    pub fn new(params: Arc<ScoringParameters>) -> Self {
        Self { params, score: 0.0, finished: false }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ScoringFunction for TypicalDurationScoring {
    fn handle_activity(&mut self, activity: &ActivityRecord) {
        let start = activity.start.unwrap_or(SimTime::ZERO).seconds() as f64;
        let end = activity
            .end
            .map_or_else(|| start.max(SimTime::MIDNIGHT.seconds() as f64), |e| e.seconds() as f64);
        self.score += self.params.activity_utility(&activity.activity_type, start, end);
    }

    fn handle_leg(&mut self, leg: &LegRecord) {
        let hours = leg.travel_secs() as f64 / 3_600.0;
        self.score += self.params.traveling(leg.mode) * hours;
    }

    fn agent_stuck(&mut self, _time: SimTime) {
        self.score += self.params.stuck_penalty;
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn score(&self) -> f64 {
        self.score
    }
}

/// Hands out [`TypicalDurationScoring`] instances sharing one parameter set.
#[derive(Clone)]
pub struct TypicalDurationScoringFactory {
    params: Arc<ScoringParameters>,
}

impl TypicalDurationScoringFactory {
    pub fn new(config: &ScoringConfig) -> Self {
        Self { params: Arc::new(ScoringParameters::from_config(config)) }
    }

    pub fn parameters(&self) -> &ScoringParameters {
        &self.params
    }
}

impl ScoringFunctionFactory for TypicalDurationScoringFactory {
    fn create(&self, _agent: AgentId) -> Box<dyn ScoringFunction> {
        Box::new(TypicalDurationScoring::new(Arc::clone(&self.params)))
    }
}
