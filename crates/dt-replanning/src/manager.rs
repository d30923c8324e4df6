//! `StrategyManager`: weighted strategy choice per agent.

use dt_config::Config;
use dt_core::AgentRng;
use dt_population::{Person, Population};
use dt_spatial::{LeastCostPathCalculator, RoadNetwork};

use crate::{
    BestScore, ExpBetaSelector, KeepLastSelected, PlanStrategy, ReRoute, ReplanningError,
    ReplanningResult, StrategyContext,
};

/// What one replanning pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplanningSummary {
    /// Agents handled per strategy, in registration order.
    pub per_strategy:  Vec<(String, usize)>,
    /// Plans dropped to respect the plan memory size.
    pub removed_plans: usize,
}

pub struct StrategyManager {
    strategies: Vec<Box<dyn PlanStrategy>>,
    weights:    Vec<f64>,
    /// Plan memory per agent.  Zero means unlimited.
    max_plans:  usize,
    seed:       u64,
}

impl StrategyManager {
    pub fn new(seed: u64, max_plans: usize) -> Self {
        Self { strategies: Vec::new(), weights: Vec::new(), max_plans, seed }
    }

    /// Builds the strategies named in `config.replanning`.
    pub fn from_config(config: &Config) -> ReplanningResult<Self> {
        let mut manager = Self::new(config.global.random_seed, config.replanning.max_agent_plan_memory_size);
        for s in &config.replanning.strategies {
            let strategy: Box<dyn PlanStrategy> = match s.name.as_str() {
                "best_score" => Box::new(BestScore),
                "exp_beta" => Box::new(ExpBetaSelector::new(config.scoring.brain_exp_beta)),
                "keep_last_selected" => Box::new(KeepLastSelected),
                "reroute" => Box::new(ReRoute),
                other => return Err(ReplanningError::UnknownStrategy(other.to_owned())),
            };
            manager.add_strategy(strategy, s.weight);
        }
        Ok(manager)
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn PlanStrategy>, weight: f64) {
        self.strategies.push(strategy);
        self.weights.push(weight);
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    pub fn max_plans(&self) -> usize {
        self.max_plans
    }

    /// Replans every person of `population` for `iteration`.
    pub fn run(
        &self,
        population: &mut Population,
        network:    &RoadNetwork,
        router:     &dyn LeastCostPathCalculator,
        iteration:  u32,
    ) -> ReplanningResult<ReplanningSummary> {
        let persons = population.persons_mut();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(Option<usize>, usize)> = persons
            .iter_mut()
            .map(|p| self.replan_person(p, network, router, iteration))
            .collect::<ReplanningResult<_>>()?;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(Option<usize>, usize)> = {
            use rayon::prelude::*;

            persons
                .par_iter_mut()
                .map(|p| self.replan_person(p, network, router, iteration))
                .collect::<ReplanningResult<_>>()?
        };

        let mut summary = ReplanningSummary {
            per_strategy: self.strategies.iter().map(|s| (s.name().to_owned(), 0)).collect(),
            removed_plans: 0,
        };
        for (chosen, removed) in outcomes {
            if let Some(i) = chosen {
                summary.per_strategy[i].1 += 1;
            }
            summary.removed_plans += removed;
        }
        Ok(summary)
    }

    /// Returns the chosen strategy's index and the number of plans removed.
    fn replan_person(
        &self,
        person:    &mut Person,
        network:   &RoadNetwork,
        router:    &dyn LeastCostPathCalculator,
        iteration: u32,
    ) -> ReplanningResult<(Option<usize>, usize)> {
        let removed = remove_surplus_plans(person, self.max_plans);
        let mut rng = AgentRng::for_iteration(self.seed, person.id, iteration);
        let Some(chosen) = rng.choose_weighted(&self.weights) else {
            return Ok((None, removed));
        };
        let mut ctx = StrategyContext { network, router, rng, iteration };
        self.strategies[chosen].run(person, &mut ctx)?;
        Ok((Some(chosen), removed))
    }
}

/// Drops the worst plans until at most `max_plans` remain.  Unscored plans
/// count as worst; the selected plan is never dropped.
pub(crate) fn remove_surplus_plans(person: &mut Person, max_plans: usize) -> usize {
    if max_plans == 0 {
        return 0;
    }
    let mut removed = 0;
    while person.plan_count() > max_plans {
        let selected = person.selected_index();
        let worst = person
            .plans()
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != selected)
            .map(|(i, p)| (i, p.score.unwrap_or(f64::NEG_INFINITY)))
            .fold(None, |worst: Option<(usize, f64)>, (i, s)| match worst {
                Some((_, w)) if w <= s => worst,
                _ => Some((i, s)),
            });
        let Some((index, _)) = worst else { break };
        person.remove_plan(index);
        removed += 1;
    }
    removed
}
