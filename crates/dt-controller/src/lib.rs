//! `dt-controller`: iterates `simulate → score → replan` over a scenario.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                           |
//! |-----------------|--------------------------------------------------------------------|
//! | [`controller`]  | `Controller`, `ControllerBuilder`, `ControllerState`, `RunSummary` |
//! | [`listener`]    | `ControllerListener`, `ListenerRegistry`, `Phase`, `dispatch_order` |
//! | [`termination`] | `TerminationCriterion`, `FixedIterations`, `WallClockBudget`       |
//! | [`setup`]       | config preprocessing, consistency checkers, `prepare_for_sim`      |
//! | [`output`]      | `OutputDirectoryHierarchy`                                         |
//! | [`error`]       | `ControllerError`, `ControllerResult<T>`                           |
//!
//! # One iteration
//!
//! ```text
//! IterationStarts ─► BeforeMobsim ─► mobsim.run() ─► AfterMobsim ─► Scoring
//!   ─► Replanning ─► IterationPersist ─► IterationEnds
//! ```
//!
//! Each phase goes to the core listeners (events handling, plans dumping,
//! replanning, scoring, dump at end, in that order) and then to the
//! extension listeners in the order they were added.

pub mod controller;
mod core_listeners;
pub mod error;
pub mod listener;
pub mod output;
pub mod setup;
pub mod termination;


pub use controller::{Controller, ControllerBuilder, ControllerState, RunSummary};
pub use core_listeners::learn_score;
pub use error::{ControllerError, ControllerResult};
pub use listener::{dispatch_order, ControllerContext, ControllerListener, ListenerRegistry, Phase};
pub use output::OutputDirectoryHierarchy;
pub use setup::{
    prepare_for_sim, preprocess_config, ActivityParamsChecker, ConfigConsistencyChecker,
    PrepareSummary, StrategyWeightsChecker, TRANSIT_INTERACTION_DURATION,
};
pub use termination::{FixedIterations, TerminationCriterion, WallClockBudget};
