//! `dt-events`: what the mobsim reports, and who gets to hear it.
//!
//! The mobsim pushes [`Event`]s into the [`EventsManager`] while it runs.
//! Events are buffered and delivered to every registered [`EventHandler`]
//! when the controller flushes the manager after the mobsim returns, so
//! handlers observe a complete, ordered stream before scoring starts.

pub mod error;
pub mod event;
pub mod manager;

#[cfg(test)]
mod tests;

pub use error::{EventsError, EventsResult};
pub use event::Event;
pub use manager::{EventHandler, EventsManager, HandlerId, SharedHandler};
