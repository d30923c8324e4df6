//! `dt-spatial`: road network, node snapping, and least-cost paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`                |
//! | [`router`]  | `LeastCostPathCalculator`, `LeastCostPath`, `Dijkstra`, `TravelTime` |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{Dijkstra, FreeSpeedTravelTime, LeastCostPath, LeastCostPathCalculator, TravelTime};
