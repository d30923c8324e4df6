//! Loads a [`Scenario`] from a directory of CSV files.
//!
//! | File             | Required | Columns                                         |
//! |------------------|----------|-------------------------------------------------|
//! | `nodes.csv`      | yes      | `id,lat,lon`                                    |
//! | `links.csv`      | yes      | `from,to,length_m,freespeed_mps`                |
//! | `facilities.csv` | no       | `id,lat,lon,node,activity_types`                |
//! | `plans.csv`      | no       | see `dt_population::loader`                     |
//! | `households.csv` | no       | `id,members` (`;`-separated person ids)         |
//!
//! Links are directed; list both directions for a two-way road.  Missing
//! optional files leave the corresponding sub-model empty and are reported
//! as warnings.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use dt_config::Config;
use dt_core::{AgentId, GeoPoint, NodeId, Sink, SinkExt};
use dt_population::{load_facilities_reader, load_plans_reader, IdIndex};
use dt_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::containers::Households;
use crate::scenario::Scenario;
use crate::{ScenarioError, ScenarioResult};

const COMPONENT: &str = "scenario-loader";

#[derive(Deserialize)]
struct NodeRecord {
    id:  String,
    lat: f32,
    lon: f32,
}

#[derive(Deserialize)]
struct LinkRecord {
    from:          String,
    to:            String,
    length_m:      f32,
    freespeed_mps: f32,
}

#[derive(Deserialize)]
struct HouseholdRecord {
    id:      String,
    #[serde(default)]
    members: Option<String>,
}

/// Reads the scenario input files from one directory.
#[derive(Debug, Clone)]
pub struct ScenarioLoader {
    dir: PathBuf,
}

impl ScenarioLoader {
    pub const NODES:      &'static str = "nodes.csv";
    pub const LINKS:      &'static str = "links.csv";
    pub const FACILITIES: &'static str = "facilities.csv";
    pub const PLANS:      &'static str = "plans.csv";
    pub const HOUSEHOLDS: &'static str = "households.csv";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Builds an unlocked scenario from the files in the directory.
    pub fn load(&self, config: &Config, sink: Sink) -> ScenarioResult<Scenario> {
        let mut scenario = Scenario::from_config(config, sink.clone());

        let (network, nodes) =
            load_network_reader(self.open_required(Self::NODES)?, self.open_required(Self::LINKS)?)?;
        scenario.set_network(network)?;

        let facility_index = match self.open_optional(Self::FACILITIES, &sink)? {
            Some(file) => {
                let (facilities, index) = load_facilities_reader(file, &nodes)?;
                scenario.set_facilities(facilities)?;
                index
            }
            None => IdIndex::new(),
        };

        if let Some(file) = self.open_optional(Self::PLANS, &sink)? {
            scenario.set_population(load_plans_reader(file, &nodes, &facility_index)?)?;
        }

        if config.scenario.use_households {
            if let Some(file) = self.open_optional(Self::HOUSEHOLDS, &sink)? {
                let persons: HashMap<&str, AgentId> = scenario
                    .population()
                    .iter()
                    .map(|p| (p.label.as_str(), p.id))
                    .collect();
                let loaded = load_households_reader(file, &persons, &sink)?;
                if let Some(households) = scenario.households() {
                    *households = loaded;
                }
            }
        }

        sink.info(
            COMPONENT,
            format!(
                "loaded scenario from {}: {} nodes, {} links, {} facilities, {} persons",
                self.dir.display(),
                scenario.network().node_count(),
                scenario.network().link_count(),
                scenario.facilities().len(),
                scenario.population().len()
            ),
        );
        Ok(scenario)
    }

    fn open_required(&self, name: &str) -> ScenarioResult<File> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(ScenarioError::MissingInput(path));
        }
        Ok(File::open(path)?)
    }

    fn open_optional(&self, name: &str, sink: &Sink) -> ScenarioResult<Option<File>> {
        let path = self.dir.join(name);
        if !path.is_file() {
            sink.warn(COMPONENT, format!("{} not found; continuing without it", path.display()));
            return Ok(None);
        }
        Ok(Some(File::open(path)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Builds a network from `nodes.csv` and `links.csv` contents.
pub fn load_network_reader<N: Read, L: Read>(
    nodes: N,
    links: L,
) -> ScenarioResult<(RoadNetwork, IdIndex<NodeId>)> {
    let mut builder = RoadNetworkBuilder::new();
    let mut index = IdIndex::new();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result?;
        let id = builder.add_node(GeoPoint::new(row.lat, row.lon));
        if index.insert(row.id.clone(), id).is_some() {
            return Err(ScenarioError::Network(format!("duplicate node id {:?}", row.id)));
        }
    }

    for result in csv::Reader::from_reader(links).deserialize::<LinkRecord>() {
        let row = result?;
        let lookup = |label: &str| {
            index
                .get(label)
                .ok_or_else(|| ScenarioError::Network(format!("link references unknown node {label:?}")))
        };
        let (from, to) = (lookup(&row.from)?, lookup(&row.to)?);
        builder.add_link(from, to, row.length_m, row.freespeed_mps)?;
    }

    Ok((builder.build(), index))
}

/// Reads households; unknown member ids are skipped with a warning.
pub fn load_households_reader<R: Read>(
    reader: R,
    persons: &HashMap<&str, AgentId>,
    sink: &Sink,
) -> ScenarioResult<Households> {
    let mut households = Households::default();
    for result in csv::Reader::from_reader(reader).deserialize::<HouseholdRecord>() {
        let row = result?;
        let mut members = Vec::new();
        for label in row.members.as_deref().unwrap_or("").split(';').map(str::trim) {
            if label.is_empty() {
                continue;
            }
            match persons.get(label) {
                Some(&agent) => members.push(agent),
                None => sink.warn(
                    COMPONENT,
                    format!("household {:?} lists unknown person {label:?}", row.id),
                ),
            }
        }
        households.add(row.id, members);
    }
    Ok(households)
}
