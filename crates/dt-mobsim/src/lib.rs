//! `dt-mobsim`: the simulation engine run once per iteration.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`mobsim`]     | `Mobsim`, `ObservableMobsim`, `MobsimFactory`, `MobsimContext` |
//! | [`listener`]   | `MobsimListener`, `MobsimListenerProvider`, `NoopListener`    |
//! | [`wake_queue`] | `WakeQueue` (second → agents due)                             |
//! | [`teleport`]   | `TeleportationMobsim`, `TeleportationMobsimFactory`           |
//! | [`error`]      | `MobsimError`, `MobsimResult<T>`                              |
//!
//! # Lifecycle
//!
//! ```text
//! factory.create(ctx) ──► add_listener(..)* ──► run() ──► dropped
//! ```
//!
//! A mobsim instance lives for exactly one iteration.  Listeners are an
//! injection point before `run()` only; attaching one afterwards fails with
//! [`MobsimError::AlreadyStarted`].

pub mod error;
pub mod listener;
pub mod mobsim;
pub mod teleport;
pub mod wake_queue;

#[cfg(test)]
mod tests;

pub use error::{MobsimError, MobsimResult};
pub use listener::{MobsimListener, MobsimListenerProvider, NoopListener};
pub use mobsim::{Mobsim, MobsimContext, MobsimFactory, ObservableMobsim};
pub use teleport::{TeleportationMobsim, TeleportationMobsimFactory};
pub use wake_queue::WakeQueue;
