//! Scoring group: marginal utilities, activity types, learning rate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scoring parameters of one activity type.
///
/// Times are in seconds.  An activity whose opening and closing time are
/// both zero is not scored at all (transit interactions, for instance).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActivityParams {
    pub activity_type:    String,
    pub typical_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time:     Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time:     Option<f64>,
}

impl ActivityParams {
    pub fn new(activity_type: impl Into<String>, typical_duration: f64) -> Self {
        Self {
            activity_type: activity_type.into(),
            typical_duration,
            opening_time: None,
            closing_time: None,
        }
    }

    pub fn with_opening_time(mut self, t: f64) -> Self {
        self.opening_time = Some(t);
        self
    }

    pub fn with_closing_time(mut self, t: f64) -> Self {
        self.closing_time = Some(t);
        self
    }

    /// `false` for zero-width opening windows (opening == closing == 0).
    pub fn scores_at_all(&self) -> bool {
        !(self.opening_time == Some(0.0) && self.closing_time == Some(0.0))
    }
}

/// Scoring parameters of one transport mode.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModeParams {
    /// Utility per hour spent travelling (normally negative).
    pub marginal_utility_of_traveling_utils_hr: f64,
}

impl Default for ModeParams {
    fn default() -> Self {
        Self { marginal_utility_of_traveling_utils_hr: -6.0 }
    }
}

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the newest score: `new = (1 - lr) * old + lr * executed`.
    pub learning_rate: f64,

    /// Logit scale used by the exp-beta plan selector.
    pub brain_exp_beta: f64,

    /// Marginal utility of performing an activity, per hour.
    pub performing_utils_hr: f64,

    /// Added once for every agent that is stuck at the end of the mobsim.
    pub stuck_penalty: f64,

    /// Keyed by mode label (`car`, `walk`, …).
    pub mode_params: BTreeMap<String, ModeParams>,

    activity_params: Vec<ActivityParams>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mode_params = [
            ("car", -6.0),
            ("pt", -6.0),
            ("ride", -6.0),
            ("walk", -12.0),
            ("bike", -12.0),
        ]
        .into_iter()
        .map(|(mode, u)| {
            (mode.to_owned(), ModeParams { marginal_utility_of_traveling_utils_hr: u })
        })
        .collect();

        Self {
            learning_rate:       1.0,
            brain_exp_beta:      1.0,
            performing_utils_hr: 6.0,
            stuck_penalty:       -50.0,
            mode_params,
            activity_params:     Vec::new(),
        }
    }
}

impl ScoringConfig {
    /// Registers parameters for an activity type.
    ///
    /// Returns `false` and keeps the existing entry when the type is already
    /// configured, so user-supplied parameters win over injected ones.
    pub fn add_activity_params(&mut self, params: ActivityParams) -> bool {
        if self.activity_params(&params.activity_type).is_some() {
            return false;
        }
        self.activity_params.push(params);
        true
    }

    pub fn activity_params(&self, activity_type: &str) -> Option<&ActivityParams> {
        self.activity_params
            .iter()
            .find(|p| p.activity_type == activity_type)
    }

    /// All activity parameter sets in registration order.
    pub fn all_activity_params(&self) -> &[ActivityParams] {
        &self.activity_params
    }

    /// Marginal utility of travelling for `mode`, falling back to the
    /// [`ModeParams`] default for unconfigured modes.
    pub fn traveling_utils_hr(&self, mode: &str) -> f64 {
        self.mode_params
            .get(mode)
            .map(|p| p.marginal_utility_of_traveling_utils_hr)
            .unwrap_or_else(|| ModeParams::default().marginal_utility_of_traveling_utils_hr)
    }
}
