//! The iteration loop.

use std::sync::Arc;

use dt_config::{Config, ConfigError};
use dt_core::{Sink, SinkExt};
use dt_events::EventsManager;
use dt_mobsim::{MobsimContext, MobsimFactory, MobsimListenerProvider, TeleportationMobsimFactory};
use dt_output::ScoreStatsRow;
use dt_replanning::StrategyManager;
use dt_scenario::Scenario;
use dt_scoring::{ScoringFunctionFactory, TypicalDurationScoringFactory};
use dt_spatial::{Dijkstra, LeastCostPathCalculator};

use crate::core_listeners::{DumpDataAtEnd, EventsHandling, PlansDumping, PlansReplanning, PlansScoring};
use crate::setup::{prepare_for_sim, preprocess_config};
use crate::{
    ActivityParamsChecker, ConfigConsistencyChecker, ControllerContext, ControllerError, ControllerListener,
    ControllerResult, FixedIterations, ListenerRegistry, OutputDirectoryHierarchy, Phase,
    StrategyWeightsChecker, TerminationCriterion,
};

const COMPONENT: &str = "controller";

// ── ControllerState ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerState {
    Uninitialized,
    Initializing,
    IterationStart,
    MobsimRunning,
    Scoring,
    Replanning,
    IterationPersist,
    IterationEnd,
    Shutdown,
    Terminated,
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Returned by [`Controller::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub iterations_run: u32,
    /// `None` when the termination criterion stopped before the first one.
    pub last_iteration: Option<u32>,
    pub score_history:  Vec<ScoreStatsRow>,
}

// ── ControllerBuilder ─────────────────────────────────────────────────────────

/// Assembles a [`Controller`].
///
/// # Defaults
///
/// | Method                  | Default                                         |
/// |-------------------------|-------------------------------------------------|
/// | `.mobsim_factory(f)`    | [`TeleportationMobsimFactory`]                  |
/// | `.termination(t)`       | [`FixedIterations`] up to `last_iteration`      |
/// | `.scoring_factory(f)`   | [`TypicalDurationScoringFactory`]               |
/// | `.strategy_manager(m)`  | `StrategyManager::from_config`                  |
/// | `.router(r)`            | [`Dijkstra`] on free-speed travel times         |
/// | `.consistency_checker`  | [`ActivityParamsChecker`], [`StrategyWeightsChecker`] (always on) |
///
/// # Example
///
/// ```rust,ignore
/// let scenario = ScenarioLoader::new("input").load(&config, sink.clone())?;
/// let mut controller = ControllerBuilder::new(config, scenario, sink)
///     .extension(Box::new(MyListener::default()))
///     .build()?;
/// let summary = controller.run()?;
/// ```
pub struct ControllerBuilder {
    config:      Config,
    scenario:    Scenario,
    sink:        Sink,
    mobsim:      Option<Box<dyn MobsimFactory>>,
    termination: Option<Box<dyn TerminationCriterion>>,
    scoring:     Option<Arc<dyn ScoringFunctionFactory>>,
    strategies:  Option<StrategyManager>,
    router:      Option<Box<dyn LeastCostPathCalculator>>,
    extensions:  Vec<Box<dyn ControllerListener>>,
    providers:   Vec<Box<dyn MobsimListenerProvider>>,
    checkers:    Vec<Box<dyn ConfigConsistencyChecker>>,
}

impl ControllerBuilder {
    pub fn new(config: Config, scenario: Scenario, sink: Sink) -> Self {
        Self {
            config,
            scenario,
            sink,
            mobsim:      None,
            termination: None,
            scoring:     None,
            strategies:  None,
            router:      None,
            extensions:  Vec::new(),
            providers:   Vec::new(),
            checkers:    Vec::new(),
        }
    }

    pub fn mobsim_factory(mut self, factory: Box<dyn MobsimFactory>) -> Self {
        self.mobsim = Some(factory);
        self
    }

    pub fn termination(mut self, criterion: Box<dyn TerminationCriterion>) -> Self {
        self.termination = Some(criterion);
        self
    }

    pub fn scoring_factory(mut self, factory: Arc<dyn ScoringFunctionFactory>) -> Self {
        self.scoring = Some(factory);
        self
    }

    pub fn strategy_manager(mut self, manager: StrategyManager) -> Self {
        self.strategies = Some(manager);
        self
    }

    pub fn router(mut self, router: Box<dyn LeastCostPathCalculator>) -> Self {
        self.router = Some(router);
        self
    }

    /// Adds an extension listener.  Extensions run after the core
    /// listeners, in the order added.
    pub fn extension(mut self, listener: Box<dyn ControllerListener>) -> Self {
        self.extensions.push(listener);
        self
    }

    /// Adds a source of mobsim listeners.  Each iteration's mobsim gets a
    /// fresh listener from every provider.
    pub fn mobsim_listener_provider(mut self, provider: Box<dyn MobsimListenerProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Adds a check to the built-in ones.
    pub fn consistency_checker(mut self, checker: Box<dyn ConfigConsistencyChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub fn build(self) -> ControllerResult<Controller> {
        let strategies = match self.strategies {
            Some(m) => m,
            None => StrategyManager::from_config(&self.config)?,
        };
        let termination = self
            .termination
            .unwrap_or_else(|| Box::new(FixedIterations::from_config(&self.config.controller)));

        let mut checkers: Vec<Box<dyn ConfigConsistencyChecker>> =
            vec![Box::new(ActivityParamsChecker), Box::new(StrategyWeightsChecker)];
        checkers.extend(self.checkers);

        let mut listeners = ListenerRegistry::new();
        for l in self.extensions {
            listeners.add_extension(l)?;
        }

        Ok(Controller {
            output:        OutputDirectoryHierarchy::from_config(&self.config.controller),
            config:        self.config,
            scenario:      self.scenario,
            sink:          self.sink,
            events:        EventsManager::new(),
            mobsim:        self.mobsim.unwrap_or_else(|| Box::new(TeleportationMobsimFactory)),
            termination,
            scoring:       self.scoring,
            strategies:    Some(strategies),
            router:        self.router.unwrap_or_else(|| Box::new(Dijkstra::new())),
            listeners,
            providers:     self.providers,
            checkers,
            state:         ControllerState::Uninitialized,
            score_history: Vec::new(),
        })
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Runs `simulate → score → replan` over a locked scenario.
///
/// ```text
/// Uninitialized → Initializing
///   → (IterationStart → MobsimRunning → Scoring → Replanning
///      → IterationPersist → IterationEnd)*
///   → Shutdown → Terminated
/// ```
///
/// A controller runs once.  Errors from listeners and the mobsim abort the
/// run where they occur.
pub struct Controller {
    config:        Config,
    scenario:      Scenario,
    sink:          Sink,
    events:        EventsManager,
    output:        OutputDirectoryHierarchy,
    mobsim:        Box<dyn MobsimFactory>,
    termination:   Box<dyn TerminationCriterion>,
    /// Taken when the core listeners are built.
    scoring:       Option<Arc<dyn ScoringFunctionFactory>>,
    strategies:    Option<StrategyManager>,
    router:        Box<dyn LeastCostPathCalculator>,
    listeners:     ListenerRegistry,
    providers:     Vec<Box<dyn MobsimListenerProvider>>,
    checkers:      Vec<Box<dyn ConfigConsistencyChecker>>,
    state:         ControllerState,
    score_history: Vec<ScoreStatsRow>,
}

impl Controller {
    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn output(&self) -> &OutputDirectoryHierarchy {
        &self.output
    }

    /// Adds an extension listener.  Fails once the first iteration has
    /// started.
    pub fn add_extension(&mut self, listener: Box<dyn ControllerListener>) -> ControllerResult<()> {
        self.listeners.add_extension(listener)
    }

    /// Listener names in call order.
    pub fn listener_names(&self) -> Vec<&str> {
        self.listeners.names()
    }

    fn set_state(&mut self, state: ControllerState) {
        self.state = state;
        self.sink.info(COMPONENT, format!("state: {state:?}"));
    }

    fn dispatch(&mut self, phase: Phase, iteration: u32) -> ControllerResult<()> {
        let mut ctx = ControllerContext {
            config:        &self.config,
            scenario:      &mut self.scenario,
            events:        &mut self.events,
            output:        &self.output,
            router:        self.router.as_ref(),
            score_history: &mut self.score_history,
            iteration,
            sink:          &self.sink,
        };
        self.listeners.dispatch(phase, &mut ctx)
    }

    /// Runs every iteration the termination criterion allows, then shuts
    /// down.
    pub fn run(&mut self) -> ControllerResult<RunSummary> {
        if self.state != ControllerState::Uninitialized {
            return Err(ControllerError::AlreadyRun);
        }
        self.initialize()?;

        let first = self.config.controller.first_iteration;
        let mut iteration = first;
        let mut last = None;
        while self.termination.continue_iterations(iteration) {
            self.run_iteration(iteration)?;
            last = Some(iteration);
            iteration += 1;
        }

        self.set_state(ControllerState::Shutdown);
        self.dispatch(Phase::Shutdown, last.unwrap_or(first))?;
        self.set_state(ControllerState::Terminated);

        let iterations_run = last.map_or(0, |l| l - first + 1);
        self.sink.info(COMPONENT, format!("run finished after {iterations_run} iterations"));
        Ok(RunSummary { iterations_run, last_iteration: last, score_history: self.score_history.clone() })
    }

    fn initialize(&mut self) -> ControllerResult<()> {
        self.set_state(ControllerState::Initializing);
        self.output.prepare(&self.sink)?;

        if preprocess_config(&mut self.config, &self.sink) {
            self.sink.info(COMPONENT, "added transit interaction activity parameters");
        }

        let problems: Vec<String> = self
            .checkers
            .iter()
            .flat_map(|c| c.check(&self.config, &self.scenario))
            .collect();
        if !problems.is_empty() {
            return Err(ConfigError::Inconsistent(problems).into());
        }

        self.add_core_listeners();
        let first = self.config.controller.first_iteration;
        self.dispatch(Phase::Startup, first)?;

        prepare_for_sim(&mut self.scenario, self.router.as_ref(), &self.sink)?;
        self.scenario.lock();
        Ok(())
    }

    /// Declares the core listeners.  They are called in reverse.
    fn add_core_listeners(&mut self) {
        let scoring = self
            .scoring
            .take()
            .unwrap_or_else(|| Arc::new(TypicalDurationScoringFactory::new(&self.config.scoring)));

        if self.config.controller.dump_data_at_end {
            self.listeners.add_core(Box::new(DumpDataAtEnd));
        }
        self.listeners.add_core(Box::new(PlansScoring::new(scoring, self.config.scoring.learning_rate)));
        if let Some(manager) = self.strategies.take() {
            self.listeners.add_core(Box::new(PlansReplanning::new(manager)));
        }
        self.listeners.add_core(Box::new(PlansDumping));
        self.listeners.add_core(Box::new(EventsHandling::default()));
    }

    fn run_iteration(&mut self, iteration: u32) -> ControllerResult<()> {
        self.set_state(ControllerState::IterationStart);
        self.sink.info(COMPONENT, format!("iteration {iteration} starts"));
        self.listeners.seal();
        self.output.create_iteration_dir(iteration)?;
        self.dispatch(Phase::IterationStarts, iteration)?;

        self.set_state(ControllerState::MobsimRunning);
        self.dispatch(Phase::BeforeMobsim, iteration)?;
        self.run_mobsim(iteration)?;
        self.dispatch(Phase::AfterMobsim, iteration)?;

        self.set_state(ControllerState::Scoring);
        self.dispatch(Phase::Scoring, iteration)?;

        self.set_state(ControllerState::Replanning);
        self.dispatch(Phase::Replanning, iteration)?;

        self.set_state(ControllerState::IterationPersist);
        self.dispatch(Phase::IterationPersist, iteration)?;

        self.set_state(ControllerState::IterationEnd);
        self.dispatch(Phase::IterationEnds, iteration)?;
        Ok(())
    }

    fn run_mobsim(&mut self, iteration: u32) -> ControllerResult<()> {
        let ctx = MobsimContext {
            scenario:  &self.scenario,
            events:    &mut self.events,
            config:    &self.config,
            router:    self.router.as_ref(),
            iteration,
            sink:      self.sink.clone(),
        };
        let mut mobsim = self.mobsim.create(ctx)?;

        match mobsim.as_observable() {
            Some(observable) => {
                for provider in &self.providers {
                    observable.add_listener(provider.provide())?;
                }
            }
            None if !self.providers.is_empty() => self.sink.warn(
                COMPONENT,
                format!("mobsim is not observable; {} listener providers ignored", self.providers.len()),
            ),
            None => {}
        }

        mobsim.run()?;
        Ok(())
    }
}
