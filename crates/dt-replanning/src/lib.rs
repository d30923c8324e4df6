//! `dt-replanning`: changes agents' plans between iterations.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`strategy`] | `PlanStrategy`, `StrategyContext`, `KeepLastSelected`, `BestScore`, `ExpBetaSelector` |
//! | [`reroute`]  | `ReRoute`, `route_all_legs`, `route_missing_legs`               |
//! | [`manager`]  | `StrategyManager`, `ReplanningSummary`                         |
//! | [`error`]    | `ReplanningError`, `ReplanningResult<T>`                       |
//!
//! # Per-agent step
//!
//! ```text
//! drop worst plans above memory size ──► draw strategy by weight ──► run it
//! ```
//!
//! Every draw comes from `AgentRng::for_iteration(seed, agent, iteration)`,
//! so results are identical with and without the `parallel` feature.

pub mod error;
pub mod manager;
pub mod reroute;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use error::{ReplanningError, ReplanningResult};
pub use manager::{ReplanningSummary, StrategyManager};
pub use reroute::{route_all_legs, route_missing_legs, ReRoute};
pub use strategy::{BestScore, ExpBetaSelector, KeepLastSelected, PlanStrategy, StrategyContext};
