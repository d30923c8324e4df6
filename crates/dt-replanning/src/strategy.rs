//! The strategy trait and the plan selectors.

use dt_core::AgentRng;
use dt_population::Person;
use dt_spatial::{LeastCostPathCalculator, RoadNetwork};

use crate::ReplanningResult;

/// Per-agent inputs handed to a strategy.
pub struct StrategyContext<'a> {
    pub network:   &'a RoadNetwork,
    pub router:    &'a dyn LeastCostPathCalculator,
    /// This agent's RNG for this iteration.
    pub rng:       AgentRng,
    pub iteration: u32,
}

/// One way of changing a person's plans.
///
/// `Send + Sync` so one instance serves every replanning worker.
pub trait PlanStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, person: &mut Person, ctx: &mut StrategyContext<'_>) -> ReplanningResult<()>;
}

/// Picks one unscored plan at random.  New plans get executed once before
/// the score-based selectors compare them.
fn random_unscored(person: &Person, rng: &mut AgentRng) -> Option<usize> {
    let unscored: Vec<usize> = person
        .plans()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.score.is_none())
        .map(|(i, _)| i)
        .collect();
    (!unscored.is_empty()).then(|| unscored[rng.gen_range(0..unscored.len())])
}

// ── KeepLastSelected ──────────────────────────────────────────────────────────

/// Leaves the selection unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepLastSelected;

impl PlanStrategy for KeepLastSelected {
    fn name(&self) -> &str {
        "keep_last_selected"
    }

    fn run(&self, _person: &mut Person, _ctx: &mut StrategyContext<'_>) -> ReplanningResult<()> {
        Ok(())
    }
}

// ── BestScore ─────────────────────────────────────────────────────────────────

/// Selects the highest-scored plan.  Ties go to the earlier plan.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestScore;

impl PlanStrategy for BestScore {
    fn name(&self) -> &str {
        "best_score"
    }

    fn run(&self, person: &mut Person, ctx: &mut StrategyContext<'_>) -> ReplanningResult<()> {
        let choice = random_unscored(person, &mut ctx.rng).or_else(|| {
            person
                .plans()
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.score.map(|s| (i, s)))
                .fold(None, |best: Option<(usize, f64)>, (i, s)| match best {
                    Some((_, b)) if b >= s => best,
                    _ => Some((i, s)),
                })
                .map(|(i, _)| i)
        });
        if let Some(i) = choice {
            person.select_plan(i);
        }
        Ok(())
    }
}

// ── ExpBetaSelector ───────────────────────────────────────────────────────────

/// Logit selection: plan `i` is chosen with probability proportional to
/// `exp(beta · score_i)`.
#[derive(Debug, Clone, Copy)]
pub struct ExpBetaSelector {
    pub beta: f64,
}

impl ExpBetaSelector {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Selection weights for `scores`, shifted by the maximum so the
    /// exponentials stay finite.
    pub fn weights(&self, scores: &[f64]) -> Vec<f64> {
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        scores.iter().map(|s| (self.beta * (s - max)).exp()).collect()
    }
}

impl Default for ExpBetaSelector {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PlanStrategy for ExpBetaSelector {
    fn name(&self) -> &str {
        "exp_beta"
    }

    fn run(&self, person: &mut Person, ctx: &mut StrategyContext<'_>) -> ReplanningResult<()> {
        if let Some(i) = random_unscored(person, &mut ctx.rng) {
            person.select_plan(i);
            return Ok(());
        }
        let scores: Vec<f64> = person.plans().iter().map(|p| p.score.unwrap_or_default()).collect();
        if let Some(i) = ctx.rng.choose_weighted(&self.weights(&scores)) {
            person.select_plan(i);
        }
        Ok(())
    }
}
