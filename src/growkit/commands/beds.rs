use crate::commands::helpers::{find_bed_mut, optional_non_empty};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Bed, Dimensions, Garden, Position, UnitLength};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBedParams {
    pub name: String,
    pub position: Option<Position>,
    pub width: f64,
    pub length: f64,
    pub depth: Option<f64>,
    #[serde(default)]
    pub unit: UnitLength,
    pub soil_type: Option<String>,
}

pub fn add(garden: &mut Garden, params: &AddBedParams) -> Result<CmdResult> {
    let dimensions = Dimensions::new(params.width, params.length, params.depth, params.unit)?;
    optional_non_empty("soil type", &params.soil_type)?;
    if let Some(position) = &params.position {
        position.check("bed position")?;
    }

    let mut bed = Bed::new(params.name.clone(), dimensions)?;
    bed.position = params.position;
    bed.soil_type = params.soil_type.clone();

    let id = bed.id;
    let message = CmdMessage::success(format!("Bed added: {}", bed.name));
    garden.beds.push(bed);

    Ok(CmdResult::default().with_affected(id).with_message(message))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveBedParams {
    pub bed_id: Uuid,
}

/// Drops the bed and its plantings. Tasks pointing at it keep their reference.
/// An unknown id changes nothing and reports a warning.
pub fn remove(garden: &mut Garden, params: &RemoveBedParams) -> Result<CmdResult> {
    let before = garden.beds.len();
    garden.beds.retain(|b| b.id != params.bed_id);

    let result = CmdResult::default();
    if garden.beds.len() == before {
        tracing::warn!(bed = %params.bed_id, "remove_bed: no such bed");
        return Ok(result.with_message(CmdMessage::warning(format!(
            "No bed with id '{}' to remove",
            params.bed_id
        ))));
    }
    Ok(result
        .with_affected(params.bed_id)
        .with_message(CmdMessage::success("Bed removed")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveBedParams {
    pub bed_id: Uuid,
    pub new_position: Position,
}

pub fn move_bed(garden: &mut Garden, params: &MoveBedParams) -> Result<CmdResult> {
    params.new_position.check("bed position")?;
    let bed = find_bed_mut(garden, &params.bed_id)?;
    bed.position = Some(params.new_position);
    Ok(CmdResult::default()
        .with_affected(bed.id)
        .with_message(CmdMessage::success(format!(
            "Bed moved: {} to {}",
            bed.name, params.new_position
        ))))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBedDimensionsParams {
    pub bed_id: Uuid,
    pub width: f64,
    pub length: f64,
    pub depth: Option<f64>,
    #[serde(default)]
    pub unit: UnitLength,
}

pub fn update_dimensions(garden: &mut Garden, params: &UpdateBedDimensionsParams) -> Result<CmdResult> {
    let dimensions = Dimensions::new(params.width, params.length, params.depth, params.unit)?;
    let bed = find_bed_mut(garden, &params.bed_id)?;
    bed.dimensions = dimensions;
    Ok(CmdResult::default()
        .with_affected(bed.id)
        .with_message(CmdMessage::success(format!(
            "Bed resized: {} ({} x {} {})",
            bed.name, params.width, params.length, params.unit
        ))))
}
