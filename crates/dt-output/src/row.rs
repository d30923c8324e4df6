//! Plain data row types written by output backends.

use dt_population::{PlanElement, Population};

/// One element of one plan of one person.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub iteration:   u32,
    /// Person label from the input files.
    pub person:      String,
    pub plan:        u32,
    pub selected:    bool,
    pub score:       Option<f64>,
    /// Position within the plan.
    pub element:     u32,
    /// `"activity"` or `"leg"`.
    pub kind:        &'static str,
    /// Activity type or mode.
    pub label:       String,
    pub node:        Option<u32>,
    pub end_time:    Option<u32>,
    pub travel_time: Option<u32>,
    /// Link ids separated by spaces; empty for activities and unrouted legs.
    pub route:       String,
}

impl PlanRow {
    /// Flattens every plan of every person.
    pub fn from_population(iteration: u32, population: &Population) -> Vec<PlanRow> {
        let mut rows = Vec::new();
        for person in population {
            let selected = person.selected_index();
            for (p, plan) in person.plans().iter().enumerate() {
                for (e, element) in plan.elements.iter().enumerate() {
                    let mut row = PlanRow {
                        iteration,
                        person:      person.label.clone(),
                        plan:        p as u32,
                        selected:    selected == Some(p),
                        score:       plan.score,
                        element:     e as u32,
                        kind:        "activity",
                        label:       String::new(),
                        node:        None,
                        end_time:    None,
                        travel_time: None,
                        route:       String::new(),
                    };
                    match element {
                        PlanElement::Activity(a) => {
                            row.label = a.activity_type.clone();
                            row.node = a.node.map(|n| n.0);
                            row.end_time = a.end_time.map(|t| t.seconds());
                        }
                        PlanElement::Leg(l) => {
                            row.kind = "leg";
                            row.label = l.mode.as_str().to_owned();
                            if let Some(route) = &l.route {
                                row.travel_time = Some(route.travel_time);
                                row.route = route
                                    .links
                                    .iter()
                                    .map(|link| link.0.to_string())
                                    .collect::<Vec<_>>()
                                    .join(" ");
                            }
                        }
                    }
                    rows.push(row);
                }
            }
        }
        rows
    }
}

/// Average plan scores after one iteration.  Each column averages, over
/// persons with at least one scored plan, that person's executed (selected),
/// worst, mean and best score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreStatsRow {
    pub iteration:    u32,
    pub avg_executed: Option<f64>,
    pub avg_worst:    Option<f64>,
    pub avg_average:  Option<f64>,
    pub avg_best:     Option<f64>,
}

impl ScoreStatsRow {
    pub fn from_population(iteration: u32, population: &Population) -> Self {
        let mut sums = [0.0f64; 4];
        let mut scored_persons = 0usize;
        let mut executed_count = 0usize;

        for person in population {
            let scores: Vec<f64> = person.plans().iter().filter_map(|p| p.score).collect();
            if scores.is_empty() {
                continue;
            }
            scored_persons += 1;
            if let Some(s) = person.selected_plan().and_then(|p| p.score) {
                sums[0] += s;
                executed_count += 1;
            }
            sums[1] += scores.iter().copied().fold(f64::INFINITY, f64::min);
            sums[2] += scores.iter().sum::<f64>() / scores.len() as f64;
            sums[3] += scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }

        let avg = |sum: f64, n: usize| (n > 0).then(|| sum / n as f64);
        Self {
            iteration,
            avg_executed: avg(sums[0], executed_count),
            avg_worst:    avg(sums[1], scored_persons),
            avg_average:  avg(sums[2], scored_persons),
            avg_best:     avg(sums[3], scored_persons),
        }
    }
}
