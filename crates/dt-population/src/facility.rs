//! Activity facilities: places where activities can be performed.

use dt_core::{FacilityId, GeoPoint, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub struct Facility {
    pub id:             FacilityId,
    pub label:          String,
    pub coord:          GeoPoint,
    /// Access node on the road network; resolved by snapping when absent.
    pub node:           Option<NodeId>,
    pub activity_types: Vec<String>,
}

impl Facility {
    pub fn offers(&self, activity_type: &str) -> bool {
        self.activity_types.iter().any(|t| t == activity_type)
    }
}

/// All facilities, stored densely by `FacilityId`.
#[derive(Clone, Debug, Default)]
pub struct ActivityFacilities {
    facilities: Vec<Facility>,
}

impl ActivityFacilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        label: impl Into<String>,
        coord: GeoPoint,
        node: Option<NodeId>,
        activity_types: Vec<String>,
    ) -> FacilityId {
        let id = FacilityId(self.facilities.len() as u32);
        self.facilities.push(Facility { id, label: label.into(), coord, node, activity_types });
        id
    }

    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(id.index())
    }

    pub fn get_mut(&mut self, id: FacilityId) -> Option<&mut Facility> {
        self.facilities.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Facility> {
        self.facilities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}
