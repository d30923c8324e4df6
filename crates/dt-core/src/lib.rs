//! `dt-core`: value types shared by the scenario, mobsim and controller
//! crates.
//!
//! Ids, coordinates, clock times and modes are defined once here.  So is
//! the diagnostic sink that every stage reports warnings through.  No other
//! `dt-*` crate is a dependency.
//!
//! # Modules
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `FacilityId`, …            |
//! | [`geo`]         | `GeoPoint`, haversine distance                            |
//! | [`time`]        | `SimTime` (seconds since simulation midnight)             |
//! | [`rng`]         | `AgentRng` (per-agent, per-iteration)                     |
//! | [`transport`]   | `TransportMode` enum                                      |
//! | [`diagnostics`] | `DiagnosticSink` trait, `TracingSink`, `MemorySink`       |
//! | [`error`]       | `DtError` (mode and time parsing)                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod diagnostics;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diagnostics::{
    Diagnostic, DiagnosticSink, Level, MemorySink, NoopSink, Sink, SinkExt, TracingSink,
};
pub use error::{DtError, DtResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, EdgeId, FacilityId, HouseholdId, NodeId, TransitLineId, TransitStopId, VehicleId};
pub use rng::AgentRng;
pub use time::SimTime;
pub use transport::TransportMode;
