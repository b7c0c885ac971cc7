//! # Validation Engine
//!
//! Inspects a [`Garden`] (or a single [`Bed`]) and reports every spatial or
//! temporal inconsistency as a [`ValidationIssue`]. Nothing here mutates state;
//! the commit policy in [`crate::policy`] decides what to do with the issues.
//!
//! Three checks:
//!
//! - **Spacing**: two plantings in the same bed conflict when their distance is
//!   below the larger of their spacing radii (a missing radius counts as 0).
//! - **Boundary**: a planting must sit inside `[0, width] x [0, length]` of its
//!   bed, bounds inclusive, regardless of where the bed sits in the garden.
//! - **Task dates**: a task tied to a planting may not precede that planting's
//!   `planted_on`; an untied task may not precede the garden's creation date.
//!   A planting reference that does not resolve exempts the task.
//!
//! Pairwise spacing is O(n²) per bed. Beds hold tens of plantings at most.

use crate::model::{Bed, Garden, Planting, Task};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SpacingConflict,
    BedBoundary,
    TaskDate,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::SpacingConflict => "spacing_conflict",
            IssueKind::BedBoundary => "bed_boundary",
            IssueKind::TaskDate => "task_date",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub bed_name: Option<String>,
    pub planting1_id: Option<Uuid>,
    pub planting2_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
}

impl ValidationIssue {
    fn spacing_conflict(bed: &Bed, p1: &Planting, p2: &Planting) -> Self {
        Self {
            kind: IssueKind::SpacingConflict,
            message: format!(
                "Plantings {} and {} are too close together in bed '{}'.",
                p1.species, p2.species, bed.name
            ),
            bed_name: Some(bed.name.clone()),
            planting1_id: Some(p1.id),
            planting2_id: Some(p2.id),
            task_id: None,
        }
    }

    fn bed_boundary(bed: &Bed, planting: &Planting) -> Self {
        Self {
            kind: IssueKind::BedBoundary,
            message: format!(
                "Planting {} at position {} is outside the boundaries of bed '{}'.",
                planting.species, planting.position, bed.name
            ),
            bed_name: Some(bed.name.clone()),
            planting1_id: Some(planting.id),
            planting2_id: None,
            task_id: None,
        }
    }

    fn task_date(task: &Task) -> Self {
        match task.related_planting_id {
            Some(planting_id) => Self {
                kind: IssueKind::TaskDate,
                message: format!("Task '{}' is scheduled before planting date.", task.title),
                bed_name: None,
                planting1_id: Some(planting_id),
                planting2_id: None,
                task_id: Some(task.id),
            },
            None => Self {
                kind: IssueKind::TaskDate,
                message: format!("Task '{}' is scheduled before garden creation.", task.title),
                bed_name: None,
                planting1_id: None,
                planting2_id: None,
                task_id: Some(task.id),
            },
        }
    }

    /// Whether this issue names the given planting in either slot.
    pub fn references_planting(&self, id: &Uuid) -> bool {
        self.planting1_id.as_ref() == Some(id) || self.planting2_id.as_ref() == Some(id)
    }
}

/// Pairs of plantings in `bed` that sit closer than the larger of their
/// spacing radii, in `(i, j)` enumeration order with `i < j`.
pub fn spacing_conflicts(bed: &Bed) -> Vec<(&Planting, &Planting)> {
    let mut conflicts = Vec::new();
    for (i, p1) in bed.plantings.iter().enumerate() {
        for p2 in &bed.plantings[i + 1..] {
            let min_distance = p1.spacing_or_zero().max(p2.spacing_or_zero());
            if p1.position.distance_to(&p2.position) < min_distance {
                conflicts.push((p1, p2));
            }
        }
    }
    conflicts
}

/// Plantings whose position falls outside the bed's local rectangle.
pub fn boundary_violations(bed: &Bed) -> Vec<&Planting> {
    bed.plantings
        .iter()
        .filter(|p| !bed.dimensions.contains(&p.position))
        .collect()
}

/// Tasks scheduled before the date they depend on.
pub fn task_date_violations(garden: &Garden) -> Vec<&Task> {
    let plantings_by_id: HashMap<Uuid, &Planting> =
        garden.plantings().map(|p| (p.id, p)).collect();
    let created_on = garden.created_at.date_naive();

    garden
        .tasks
        .iter()
        .filter(|task| match task.related_planting_id {
            Some(planting_id) => plantings_by_id
                .get(&planting_id)
                .and_then(|p| p.planted_on)
                .is_some_and(|planted_on| task.target_date < planted_on),
            None => task.target_date < created_on,
        })
        .collect()
}

/// Spacing then boundary issues for a single bed.
pub fn validate_bed(bed: &Bed) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = spacing_conflicts(bed)
        .into_iter()
        .map(|(p1, p2)| ValidationIssue::spacing_conflict(bed, p1, p2))
        .collect();
    issues.extend(
        boundary_violations(bed)
            .into_iter()
            .map(|p| ValidationIssue::bed_boundary(bed, p)),
    );
    issues
}

/// Every issue in the garden: all spacing conflicts (bed order), then all
/// boundary violations (bed order), then all task-date violations (task order).
pub fn validate_garden(garden: &Garden) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for bed in &garden.beds {
        for (p1, p2) in spacing_conflicts(bed) {
            issues.push(ValidationIssue::spacing_conflict(bed, p1, p2));
        }
    }
    let spacing = issues.len();

    for bed in &garden.beds {
        for planting in boundary_violations(bed) {
            issues.push(ValidationIssue::bed_boundary(bed, planting));
        }
    }
    let boundary = issues.len() - spacing;

    issues.extend(
        task_date_violations(garden)
            .into_iter()
            .map(ValidationIssue::task_date),
    );
    let task_date = issues.len() - spacing - boundary;

    tracing::debug!(
        garden = %garden.id,
        spacing,
        boundary,
        task_date,
        "validated garden"
    );
    issues
}
