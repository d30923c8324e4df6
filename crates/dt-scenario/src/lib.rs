//! `dt-scenario`: the scenario container shared by every controller phase.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`scenario`]   | `Scenario`, `ScenarioFlags`, `Element`                     |
//! | [`containers`] | `OptionalContainer`, `ContainerPolicy`, `OptionalKind`, `Households`, `Vehicles`, `TransitSchedule` |
//! | [`loader`]     | `ScenarioLoader`, `load_network_reader`, `load_households_reader` |
//! | [`error`]      | `ScenarioError`, `ScenarioResult<T>`                       |
//!
//! # Optional containers
//!
//! Two ways in, on purpose asymmetric:
//!
//! | Call                           | Absent + flag on | Absent + flag off         |
//! |--------------------------------|------------------|---------------------------|
//! | `create_optional(kind)`        | create, `true`   | warn, create, `true`      |
//! | `households()` / `vehicles()` … | create           | warn, `None`              |
//!
//! Both return the existing instance untouched when one is present.

pub mod containers;
pub mod error;
pub mod loader;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use containers::{
    ContainerPolicy, Household, Households, OptionalContainer, OptionalKind, TransitLine,
    TransitSchedule, TransitStop, Vehicle, VehicleType, Vehicles,
};
pub use error::{ScenarioError, ScenarioResult};
pub use loader::{load_households_reader, load_network_reader, ScenarioLoader};
pub use scenario::{Element, Scenario, ScenarioFlags};
