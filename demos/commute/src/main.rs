//! commute: a small morning-commute scenario run through the iterative
//! controller.
//!
//! Eight persons commute or go shopping along a six-node corridor.  Every
//! iteration the teleportation mobsim executes the selected plans, the
//! plans are scored, and some agents switch plans or re-route.
//!
//! ```text
//! cargo run -p commute                  # embedded scenario
//! cargo run -p commute -- path/to/input # nodes.csv, links.csv, … and config.toml
//! RUST_LOG=debug cargo run -p commute
//! ```

mod input;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dt_config::Config;
use dt_controller::{ControllerBuilder, ControllerContext, ControllerListener, ControllerResult};
use dt_core::{Sink, SimTime, TracingSink};
use dt_mobsim::MobsimListener;
use dt_population::{load_facilities_reader, load_plans_reader};
use dt_scenario::{load_network_reader, Scenario, ScenarioLoader};

// ── Listeners ─────────────────────────────────────────────────────────────────

/// Counts mobsim steps across all iterations.
struct StepCounter(Arc<AtomicUsize>);

impl MobsimListener for StepCounter {
    fn on_after_step(&mut self, _time: SimTime) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Prints one line per iteration.
struct IterationReport;

impl ControllerListener for IterationReport {
    fn name(&self) -> &str {
        "iteration_report"
    }

    fn notify_iteration_ends(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let population = ctx.scenario.population();
        let plans: usize = population.iter().map(|p| p.plan_count()).sum();
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"));
        if let Some(stats) = ctx.score_history.last() {
            println!(
                "{:>4}  {:>9}  {:>9}  {:>9}  {:>6}",
                ctx.iteration,
                fmt(stats.avg_executed),
                fmt(stats.avg_worst),
                fmt(stats.avg_best),
                plans
            );
        }
        Ok(())
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn embedded(sink: Sink) -> Result<(Config, Scenario)> {
    let config = Config::from_toml_str(input::CONFIG_TOML)?;
    let mut scenario = Scenario::from_config(&config, sink);

    let (network, nodes) =
        load_network_reader(Cursor::new(input::NODES_CSV), Cursor::new(input::LINKS_CSV))?;
    let (facilities, facility_ids) = load_facilities_reader(Cursor::new(input::FACILITIES_CSV), &nodes)?;
    let population = load_plans_reader(Cursor::new(input::PLANS_CSV), &nodes, &facility_ids)?;

    scenario.set_network(network)?;
    scenario.set_facilities(facilities)?;
    scenario.set_population(population)?;
    Ok((config, scenario))
}

fn from_dir(dir: &Path, sink: Sink) -> Result<(Config, Scenario)> {
    let config_path = dir.join("config.toml");
    let config = if config_path.is_file() {
        Config::from_toml_file(&config_path).with_context(|| format!("reading {}", config_path.display()))?
    } else {
        Config::default()
    };
    let scenario = ScenarioLoader::new(dir)
        .load(&config, sink)
        .with_context(|| format!("loading scenario from {}", dir.display()))?;
    Ok((config, scenario))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let sink = TracingSink::shared();

    let (config, scenario) = match std::env::args_os().nth(1) {
        Some(dir) => from_dir(Path::new(&dir), sink.clone())?,
        None => embedded(sink.clone())?,
    };

    println!("=== commute ===");
    println!(
        "Scenario: {} persons, {} nodes, {} links, {} facilities",
        scenario.population().len(),
        scenario.network().node_count(),
        scenario.network().link_count(),
        scenario.facilities().len()
    );
    println!(
        "Iterations {}..={}, output in {}",
        config.controller.first_iteration,
        config.controller.last_iteration,
        config.controller.output_directory.display()
    );
    println!();
    println!("{:>4}  {:>9}  {:>9}  {:>9}  {:>6}", "it", "executed", "worst", "best", "plans");

    let steps = Arc::new(AtomicUsize::new(0));
    let counter = steps.clone();
    let mut controller = ControllerBuilder::new(config, scenario, sink)
        .extension(Box::new(IterationReport))
        .mobsim_listener_provider(Box::new(move || {
            Box::new(StepCounter(counter.clone())) as Box<dyn MobsimListener>
        }))
        .build()?;

    let t0 = Instant::now();
    let summary = controller.run()?;
    let elapsed = t0.elapsed();

    println!();
    println!(
        "{} iterations in {:.3} s ({} mobsim steps)",
        summary.iterations_run,
        elapsed.as_secs_f64(),
        steps.load(Ordering::Relaxed)
    );
    println!();

    println!("{:<8} {:>6} {:>10}", "Person", "Plans", "Score");
    println!("{}", "-".repeat(26));
    for person in controller.scenario().population().iter() {
        let score = person.selected_plan().and_then(|p| p.score);
        println!(
            "{:<8} {:>6} {:>10}",
            person.label,
            person.plan_count(),
            score.map_or_else(|| "-".to_owned(), |s| format!("{s:.2}"))
        );
    }

    Ok(())
}
