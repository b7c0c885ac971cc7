use crate::commands::helpers::optional_non_empty;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{AgentComment, Coordinates, Garden};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGardenParams {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Builds a fresh garden. Location is set only when both coordinates are given.
pub fn create(params: &CreateGardenParams) -> Result<Garden> {
    let mut garden = Garden::new(params.name.clone())?;
    if let (Some(latitude), Some(longitude)) = (params.latitude, params.longitude) {
        garden.location = Some(Coordinates::new(latitude, longitude)?);
    }
    tracing::info!(garden = %garden.id, name = %garden.name, "created garden");
    Ok(garden)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGardenMetadataParams {
    pub name: Option<String>,
    pub location: Option<Coordinates>,
    pub average_last_frost: Option<NaiveDate>,
    pub average_first_frost: Option<NaiveDate>,
}

impl UpdateGardenMetadataParams {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.average_last_frost.is_none()
            && self.average_first_frost.is_none()
    }
}

pub fn update_metadata(garden: &mut Garden, params: &UpdateGardenMetadataParams) -> Result<CmdResult> {
    optional_non_empty("garden name", &params.name)?;
    if let Some(location) = &params.location {
        Coordinates::new(location.latitude, location.longitude)?;
    }

    if let Some(name) = &params.name {
        garden.name = name.clone();
    }
    if let Some(location) = params.location {
        garden.location = Some(location);
    }
    if let Some(date) = params.average_last_frost {
        garden.average_last_frost = Some(date);
    }
    if let Some(date) = params.average_first_frost {
        garden.average_first_frost = Some(date);
    }

    let message = if params.is_empty() {
        CmdMessage::info("Nothing to update")
    } else {
        CmdMessage::success(format!("Garden updated: {}", garden.name))
    };
    Ok(CmdResult::default()
        .with_affected(garden.id)
        .with_message(message))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAgentCommentParams {
    pub comment: String,
}

pub fn add_agent_comment(garden: &mut Garden, params: &AddAgentCommentParams) -> Result<CmdResult> {
    let comment = AgentComment::new(params.comment.clone())?;
    let id = comment.id;
    garden.agent_comments.push(comment);
    Ok(CmdResult::default()
        .with_affected(id)
        .with_message(CmdMessage::success("Comment added")))
}
