//! `Person` with its plan memory, and the `Population` holding all persons.

use dt_core::AgentId;

use crate::plan::Plan;

// ── Person ────────────────────────────────────────────────────────────────────

/// One agent.  Holds every plan it remembers and which one is selected.
#[derive(Clone, Debug)]
pub struct Person {
    pub id:    AgentId,
    /// Identifier from the input files, used again in output.
    pub label: String,
    plans:     Vec<Plan>,
    selected:  usize,
}

impl Person {
    pub fn new(id: AgentId, label: impl Into<String>) -> Self {
        Self { id, label: label.into(), plans: Vec::new(), selected: 0 }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn plans_mut(&mut self) -> &mut [Plan] {
        &mut self.plans
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.plans.is_empty()).then_some(self.selected)
    }

    pub fn selected_plan(&self) -> Option<&Plan> {
        self.plans.get(self.selected)
    }

    pub fn selected_plan_mut(&mut self) -> Option<&mut Plan> {
        self.plans.get_mut(self.selected)
    }

    /// Selects plan `index`.  Returns `false` when out of range.
    pub fn select_plan(&mut self, index: usize) -> bool {
        if index < self.plans.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Adds a plan and returns its index.  The first plan added becomes the
    /// selected one.
    pub fn add_plan(&mut self, plan: Plan) -> usize {
        self.plans.push(plan);
        self.plans.len() - 1
    }

    /// Clones the selected plan, score included, and selects the copy.
    pub fn copy_selected_plan(&mut self) -> Option<usize> {
        let copy = self.selected_plan()?.clone();
        let index = self.add_plan(copy);
        self.selected = index;
        Some(index)
    }

    /// Removes plan `index`.  The selection stays on the same plan; removing
    /// the selected plan selects the first remaining one.
    pub fn remove_plan(&mut self, index: usize) -> Option<Plan> {
        if index >= self.plans.len() {
            return None;
        }
        let plan = self.plans.remove(index);
        if index < self.selected {
            self.selected -= 1;
        } else if index == self.selected {
            self.selected = 0;
        }
        Some(plan)
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// All persons, stored densely by `AgentId`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    persons: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person with a single plan and returns its id.
    pub fn add_person(&mut self, label: impl Into<String>, plan: Plan) -> AgentId {
        let id = AgentId(self.persons.len() as u32);
        let mut person = Person::new(id, label);
        person.add_plan(plan);
        self.persons.push(person);
        id
    }

    pub fn get(&self, id: AgentId) -> Option<&Person> {
        self.persons.get(id.index())
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Person> {
        self.persons.get_mut(id.index())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.persons.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Person> {
        self.persons.iter_mut()
    }

    /// All persons as one slice, for splitting work across threads.
    pub fn persons_mut(&mut self) -> &mut [Person] {
        &mut self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Mean of the selected plans' scores, ignoring unscored plans.
    pub fn average_selected_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .persons
            .iter()
            .filter_map(|p| p.selected_plan().and_then(|plan| plan.score))
            .collect();
        (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.persons.iter()
    }
}
