//! `dt-scoring`: turning an executed day into one number per agent.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                         |
//! |----------------|------------------------------------------------------------------|
//! | [`function`]   | `ScoringFunction`, `ScoringFunctionFactory`, `ActivityRecord`, `LegRecord` |
//! | [`typical`]    | `TypicalDurationScoring`, `TypicalDurationScoringFactory`, `ScoringParameters` |
//! | [`events`]     | `EventsToScore` (an `EventHandler` feeding scoring functions)    |
//! | [`error`]      | `ScoringError`, `ScoringResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                             |
//! |-----------|----------------------------------------------------|
//! | `fx-hash` | Uses `rustc-hash` maps for per-agent state.        |

pub mod error;
pub mod events;
pub mod function;
pub mod typical;


pub use error::{ScoringError, ScoringResult};
pub use events::EventsToScore;
pub use function::{ActivityRecord, LegRecord, ScoringFunction, ScoringFunctionFactory};
pub use typical::{ScoringParameters, TypicalDurationScoring, TypicalDurationScoringFactory};

#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;
