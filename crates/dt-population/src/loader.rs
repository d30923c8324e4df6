//! CSV population and facility loaders.
//!
//! # `plans.csv`
//!
//! One row per plan element, in plan order.  A row with an `activity_type`
//! is an activity; a row with a `mode` is a leg.  Rows of one person need
//! not be contiguous, but their relative order is the plan order.
//!
//! ```csv
//! person,activity_type,mode,node,facility,lat,lon,end_time,max_duration
//! p1,home,,n1,,,,07:30,
//! p1,,car,,,,,,
//! p1,work,,,office,,,,08:00:00
//! p1,,car,,,,,,
//! p1,home,,n1,,,,,
//! ```
//!
//! `node` and `facility` refer to labels from `nodes.csv` and
//! `facilities.csv`; `lat`/`lon` give a bare coordinate.  Times accept
//! seconds or `hh:mm[:ss]`.
//!
//! # `facilities.csv`
//!
//! ```csv
//! id,lat,lon,node,activity_types
//! office,47.38,8.55,n2,work;shop
//! ```
//!
//! `node` is optional; `activity_types` is `;`-separated.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use dt_core::{FacilityId, GeoPoint, NodeId, SimTime, TransportMode};

use crate::facility::ActivityFacilities;
use crate::person::Population;
use crate::plan::{Activity, Leg, Plan};
use crate::{PopulationError, PopulationResult};

// ── IdIndex ───────────────────────────────────────────────────────────────────

/// Maps external string labels to dense typed ids.
#[derive(Clone, Debug)]
pub struct IdIndex<I> {
    map: HashMap<String, I>,
}

impl<I: Copy> IdIndex<I> {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Binds `label`; returns the previous id if the label was already bound.
    pub fn insert(&mut self, label: impl Into<String>, id: I) -> Option<I> {
        self.map.insert(label.into(), id)
    }

    pub fn get(&self, label: &str) -> Option<I> {
        self.map.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<I: Copy> Default for IdIndex<I> {
    fn default() -> Self {
        Self::new()
    }
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlanRecord {
    person:        String,
    #[serde(default)]
    activity_type: Option<String>,
    #[serde(default)]
    mode:          Option<String>,
    #[serde(default)]
    node:          Option<String>,
    #[serde(default)]
    facility:      Option<String>,
    #[serde(default)]
    lat:           Option<f32>,
    #[serde(default)]
    lon:           Option<f32>,
    #[serde(default)]
    end_time:      Option<String>,
    #[serde(default)]
    max_duration:  Option<String>,
}

#[derive(Deserialize)]
struct FacilityRecord {
    id:             String,
    lat:            f32,
    lon:            f32,
    #[serde(default)]
    node:           Option<String>,
    #[serde(default)]
    activity_types: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Loads persons with one selected plan each from `plans.csv` rows.
///
/// Persons receive ids in order of first appearance.  Every plan is
/// validated for activity/leg alternation.
pub fn load_plans_reader<R: Read>(
    reader: R,
    nodes: &IdIndex<NodeId>,
    facilities: &IdIndex<FacilityId>,
) -> PopulationResult<Population> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut order: Vec<(String, Plan)> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();

    for result in csv_reader.deserialize::<PlanRecord>() {
        let row = result?;
        let slot = *slot_of.entry(row.person.clone()).or_insert_with(|| {
            order.push((row.person.clone(), Plan::new()));
            order.len() - 1
        });
        let plan = &mut order[slot].1;

        match (non_blank(&row.activity_type), non_blank(&row.mode)) {
            (Some(activity_type), None) => {
                plan.push_activity(parse_activity(activity_type, &row, nodes, facilities)?);
            }
            (None, Some(mode)) => {
                plan.push_leg(Leg::new(mode.parse::<TransportMode>()?));
            }
            _ => {
                return Err(PopulationError::MalformedPlan {
                    person: row.person,
                    reason: "row must set exactly one of activity_type and mode".into(),
                });
            }
        }
    }

    let mut population = Population::new();
    for (label, plan) in order {
        plan.validate()
            .map_err(|reason| PopulationError::MalformedPlan { person: label.clone(), reason })?;
        population.add_person(label, plan);
    }
    Ok(population)
}

/// Loads facilities and returns them with their label index.
pub fn load_facilities_reader<R: Read>(
    reader: R,
    nodes: &IdIndex<NodeId>,
) -> PopulationResult<(ActivityFacilities, IdIndex<FacilityId>)> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut facilities = ActivityFacilities::new();
    let mut index = IdIndex::new();

    for result in csv_reader.deserialize::<FacilityRecord>() {
        let row = result?;
        let node = non_blank(&row.node).map(|n| resolve_node(n, nodes)).transpose()?;
        let activity_types = non_blank(&row.activity_types)
            .map(|s| {
                s.split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let id = facilities.add(row.id.clone(), GeoPoint::new(row.lat, row.lon), node, activity_types);
        if index.insert(row.id.clone(), id).is_some() {
            return Err(PopulationError::Parse(format!("duplicate facility id {:?}", row.id)));
        }
    }
    Ok((facilities, index))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn resolve_node(label: &str, nodes: &IdIndex<NodeId>) -> PopulationResult<NodeId> {
    nodes.get(label).ok_or_else(|| PopulationError::UnknownNode(label.to_owned()))
}

fn parse_activity(
    activity_type: &str,
    row: &PlanRecord,
    nodes: &IdIndex<NodeId>,
    facilities: &IdIndex<FacilityId>,
) -> PopulationResult<Activity> {
    let mut activity = Activity::new(activity_type);
    if let Some(n) = non_blank(&row.node) {
        activity.node = Some(resolve_node(n, nodes)?);
    }
    if let Some(f) = non_blank(&row.facility) {
        let id = facilities
            .get(f)
            .ok_or_else(|| PopulationError::UnknownFacility(f.to_owned()))?;
        activity.facility = Some(id);
    }
    if let (Some(lat), Some(lon)) = (row.lat, row.lon) {
        activity.coord = Some(GeoPoint::new(lat, lon));
    }
    if let Some(t) = non_blank(&row.end_time) {
        activity.end_time = Some(t.parse::<SimTime>()?);
    }
    if let Some(d) = non_blank(&row.max_duration) {
        activity.max_duration = Some(d.parse::<SimTime>()?.seconds());
    }
    if activity.node.is_none() && activity.facility.is_none() && activity.coord.is_none() {
        return Err(PopulationError::MalformedPlan {
            person: row.person.clone(),
            reason: format!("activity {activity_type:?} has no location"),
        });
    }
    Ok(activity)
}
