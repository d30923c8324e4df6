//! `dt-population`: persons, plans and facilities.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`plan`]     | `Activity`, `Leg`, `Route`, `PlanElement`, `Plan`           |
//! | [`person`]   | `Person`, `Population`                                     |
//! | [`facility`] | `Facility`, `ActivityFacilities`                           |
//! | [`loader`]   | `load_plans_reader`, `load_facilities_reader`, `IdIndex`   |
//! | [`error`]    | `PopulationError`, `PopulationResult<T>`                   |
//!
//! # Plan model (summary)
//!
//! A plan alternates activities and legs, starting and ending with an
//! activity:
//!
//! ```text
//! home ─car→ work ─walk→ shop ─car→ home
//! ```
//!
//! Every person holds one or more plans and exactly one of them is
//! *selected*; the mobsim executes the selected plan, scoring writes its
//! score and replanning chooses which plan is selected next.

pub mod error;
pub mod facility;
pub mod loader;
pub mod person;
pub mod plan;


pub use error::{PopulationError, PopulationResult};
pub use facility::{ActivityFacilities, Facility};
pub use loader::{load_facilities_reader, load_plans_reader, IdIndex};
pub use person::{Person, Population};
pub use plan::{Activity, Leg, Plan, PlanElement, Route};
