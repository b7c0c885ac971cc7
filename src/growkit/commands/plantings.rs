use crate::commands::helpers::{find_bed_mut, optional_non_empty};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GrowkitError, Result};
use crate::model::{positive, Garden, Planting, Position};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPlantingParams {
    pub bed_id: Uuid,
    pub species: String,
    pub variety: Option<String>,
    pub planted_on: Option<NaiveDate>,
    pub expected_harvest: Option<NaiveDate>,
    pub spacing: Option<f64>,
    pub position: Position,
    pub notes: Option<String>,
}

pub fn add(garden: &mut Garden, params: &AddPlantingParams) -> Result<CmdResult> {
    optional_non_empty("variety", &params.variety)?;
    optional_non_empty("notes", &params.notes)?;
    if let Some(spacing) = params.spacing {
        positive("spacing", spacing)?;
    }
    let mut planting = Planting::new(params.species.clone(), params.position)?;
    let bed = find_bed_mut(garden, &params.bed_id)?;

    planting.variety = params.variety.clone();
    planting.planted_on = params.planted_on;
    planting.expected_harvest = params.expected_harvest;
    planting.spacing = params.spacing;
    planting.notes = params.notes.clone();

    let id = planting.id;
    let message = CmdMessage::success(format!(
        "Planting added: {} in {} at {}",
        planting.species, bed.name, planting.position
    ));
    bed.plantings.push(planting);

    Ok(CmdResult::default().with_affected(id).with_message(message))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovePlantingParams {
    pub bed_id: Uuid,
    pub planting_index: usize,
}

pub fn remove(garden: &mut Garden, params: &RemovePlantingParams) -> Result<CmdResult> {
    let bed = find_bed_mut(garden, &params.bed_id)?;
    if params.planting_index >= bed.plantings.len() {
        return Err(GrowkitError::PlantingIndexOutOfRange {
            bed_id: bed.id,
            index: params.planting_index,
            len: bed.plantings.len(),
        });
    }
    let planting = bed.plantings.remove(params.planting_index);
    Ok(CmdResult::default()
        .with_affected(planting.id)
        .with_message(CmdMessage::success(format!(
            "Planting removed ({}): {} from {}",
            params.planting_index, planting.species, bed.name
        ))))
}

/// Removes several plantings addressed by index against the *current* state.
///
/// Every bed and index is checked first, so a bad reference leaves the garden
/// untouched. Repeated pairs collapse to one removal. Within each bed the
/// removals run from the highest index down, so earlier removals never shift
/// the indexes of later ones.
pub fn remove_batch(garden: &mut Garden, removals: &[RemovePlantingParams]) -> Result<CmdResult> {
    let mut by_bed: BTreeMap<Uuid, BTreeSet<usize>> = BTreeMap::new();
    for removal in removals {
        let bed = garden
            .bed(&removal.bed_id)
            .ok_or_else(|| GrowkitError::BedNotFound(removal.bed_id.to_string()))?;
        if removal.planting_index >= bed.plantings.len() {
            return Err(GrowkitError::PlantingIndexOutOfRange {
                bed_id: bed.id,
                index: removal.planting_index,
                len: bed.plantings.len(),
            });
        }
        by_bed
            .entry(removal.bed_id)
            .or_default()
            .insert(removal.planting_index);
    }

    let mut result = CmdResult::default();
    // Keep bed order stable in the messages.
    let bed_order: Vec<Uuid> = garden
        .beds
        .iter()
        .map(|b| b.id)
        .filter(|id| by_bed.contains_key(id))
        .collect();
    for bed_id in bed_order {
        for &index in by_bed[&bed_id].iter().rev() {
            result.merge(remove(
                garden,
                &RemovePlantingParams {
                    bed_id,
                    planting_index: index,
                },
            )?);
        }
    }
    Ok(result)
}
