//! Listeners the controller registers itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dt_core::SinkExt;
use dt_events::{EventHandler, HandlerId};
use dt_output::{CsvWriter, EventsCsvWriter, OutputWriter, PlanRow, ScoreStatsRow};
use dt_replanning::StrategyManager;
use dt_scoring::{EventsToScore, ScoringFunctionFactory};

use crate::{ControllerContext, ControllerListener, ControllerResult};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── EventsHandling ────────────────────────────────────────────────────────────

/// Resets the events manager before the mobsim, delivers the buffered
/// events after it, and manages the events file on events iterations.
#[derive(Default)]
pub(crate) struct EventsHandling {
    writer: Option<(HandlerId, Arc<Mutex<EventsCsvWriter>>)>,
}

impl ControllerListener for EventsHandling {
    fn name(&self) -> &str {
        "events_handling"
    }

    fn notify_before_mobsim(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        ctx.events.reset(ctx.iteration);
        if ctx.config.controller.writes_events(ctx.iteration) {
            let path = ctx.output.iteration_file(ctx.iteration, "events.csv");
            let writer = Arc::new(Mutex::new(EventsCsvWriter::create(&path)?));
            let id = ctx.events.add_handler(writer.clone());
            self.writer = Some((id, writer));
        }
        Ok(())
    }

    fn notify_after_mobsim(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let n = ctx.events.flush();
        ctx.sink.info("events", format!("iteration {}: {n} events delivered", ctx.iteration));
        Ok(())
    }

    fn notify_iteration_ends(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        if let Some((id, writer)) = self.writer.take() {
            ctx.events.remove_handler(id);
            lock(&writer).finish()?;
        }
        Ok(())
    }
}

// ── PlansScoring ──────────────────────────────────────────────────────────────

/// Scores the executed plans from the iteration's events.
pub(crate) struct PlansScoring {
    factory:       Arc<dyn ScoringFunctionFactory>,
    learning_rate: f64,
    current:       Option<(HandlerId, Arc<Mutex<EventsToScore>>)>,
}

impl PlansScoring {
    pub(crate) fn new(factory: Arc<dyn ScoringFunctionFactory>, learning_rate: f64) -> Self {
        Self { factory, learning_rate, current: None }
    }
}

/// Blends a fresh score into the stored one.  A plan scored for the first
/// time takes the fresh score as is.
pub fn learn_score(old: Option<f64>, executed: f64, learning_rate: f64) -> f64 {
    match old {
        Some(old) => (1.0 - learning_rate) * old + learning_rate * executed,
        None => executed,
    }
}

impl ControllerListener for PlansScoring {
    fn name(&self) -> &str {
        "plans_scoring"
    }

    fn notify_iteration_starts(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let agents = ctx.scenario.population().iter().map(|p| p.id);
        let handler = Arc::new(Mutex::new(EventsToScore::new(self.factory.clone(), agents)));
        let id = ctx.events.add_handler(handler.clone());
        if let Some((stale, _)) = self.current.replace((id, handler)) {
            ctx.events.remove_handler(stale);
        }
        Ok(())
    }

    fn notify_scoring(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let Some((id, handler)) = self.current.take() else {
            return Ok(());
        };
        ctx.events.remove_handler(id);

        let scores = {
            let mut events_to_score = lock(&handler);
            events_to_score.finish_scoring();
            events_to_score.scores()?
        };
        let population = ctx.scenario.population_mut();
        for (agent, score) in scores {
            if let Some(plan) = population.get_mut(agent).and_then(|p| p.selected_plan_mut()) {
                plan.score = Some(learn_score(plan.score, score, self.learning_rate));
            }
        }

        let stats = ScoreStatsRow::from_population(ctx.iteration, ctx.scenario.population());
        if let Some(avg) = stats.avg_executed {
            ctx.sink.info("scoring", format!("iteration {}: average executed score {avg:.3}", ctx.iteration));
        }
        ctx.score_history.push(stats);
        Ok(())
    }
}

// ── PlansReplanning ───────────────────────────────────────────────────────────

/// Runs the strategy manager, except in the first iteration.
pub(crate) struct PlansReplanning {
    manager: StrategyManager,
}

impl PlansReplanning {
    pub(crate) fn new(manager: StrategyManager) -> Self {
        Self { manager }
    }
}

impl ControllerListener for PlansReplanning {
    fn name(&self) -> &str {
        "plans_replanning"
    }

    fn notify_replanning(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        if ctx.iteration == ctx.config.controller.first_iteration {
            return Ok(());
        }
        let (network, _, population) = ctx.scenario.split_mut();
        let summary = self.manager.run(population, network, ctx.router, ctx.iteration)?;
        let chosen: Vec<String> = summary.per_strategy.iter().map(|(name, n)| format!("{name}={n}")).collect();
        ctx.sink.info(
            "replanning",
            format!(
                "iteration {}: {} ({} plans removed)",
                ctx.iteration,
                chosen.join(" "),
                summary.removed_plans
            ),
        );
        Ok(())
    }
}

// ── PlansDumping ──────────────────────────────────────────────────────────────

/// Writes `ITERS/it.N/N.plans.csv` on plan-writing iterations.
#[derive(Default)]
pub(crate) struct PlansDumping;

impl ControllerListener for PlansDumping {
    fn name(&self) -> &str {
        "plans_dumping"
    }

    fn notify_iteration_persist(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        if !ctx.config.controller.writes_plans(ctx.iteration) {
            return Ok(());
        }
        let dir = ctx.output.create_iteration_dir(ctx.iteration)?;
        let mut writer = CsvWriter::new(&dir, ctx.output.iteration_prefix(ctx.iteration));
        writer.write_plans(&PlanRow::from_population(ctx.iteration, ctx.scenario.population()))?;
        writer.finish()?;
        Ok(())
    }
}

// ── DumpDataAtEnd ─────────────────────────────────────────────────────────────

/// Writes final plans, the score history and the effective configuration.
#[derive(Default)]
pub(crate) struct DumpDataAtEnd;

impl ControllerListener for DumpDataAtEnd {
    fn name(&self) -> &str {
        "dump_data_at_end"
    }

    fn notify_shutdown(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let root = ctx.output.root();
        let rows = PlanRow::from_population(ctx.iteration, ctx.scenario.population());

        let mut writer = CsvWriter::new(root, ctx.output.output_prefix());
        writer.write_plans(&rows)?;
        for stats in ctx.score_history.iter() {
            writer.write_score_stats(stats)?;
        }
        writer.finish()?;

        #[cfg(feature = "sqlite")]
        {
            let mut db = dt_output::SqliteWriter::new(root)?;
            db.write_plans(&rows)?;
            for stats in ctx.score_history.iter() {
                db.write_score_stats(stats)?;
            }
            db.finish()?;
        }

        std::fs::write(ctx.output.output_file("config.toml"), ctx.config.to_toml_string()?)?;
        ctx.sink.info("output", format!("final output written to {}", root.display()));
        Ok(())
    }
}
