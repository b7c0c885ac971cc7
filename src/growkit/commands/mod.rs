//! # Mutation Operations
//!
//! Each submodule holds the business logic for one group of garden edits. A
//! command takes the garden by mutable reference plus a parameter record, and
//! either applies the change or fails with a structural error *before* touching
//! any field. Commands never validate placement; that is the commit policy's
//! job (see [`crate::policy`]).
//!
//! [`Mutation`] wraps every parameter record so edits can be queued, batched,
//! or read from a JSON batch file and applied uniformly.

use crate::config::GrowkitConfig;
use crate::error::Result;
use crate::model::Garden;
use crate::validate::ValidationIssue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod beds;
pub mod config;
pub mod garden;
pub mod helpers;
pub mod plantings;
pub mod tasks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Ids of entities created or touched by the command.
    pub affected_ids: Vec<Uuid>,
    pub issues: Vec<ValidationIssue>,
    pub garden: Option<Garden>,
    pub schema: Option<serde_json::Value>,
    pub config: Option<GrowkitConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, id: Uuid) -> Self {
        self.affected_ids.push(id);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_issues(mut self, issues: Vec<ValidationIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_garden(mut self, garden: Garden) -> Self {
        self.garden = Some(garden);
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_config(mut self, config: GrowkitConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Folds another result into this one, keeping order.
    pub fn merge(&mut self, other: CmdResult) {
        self.affected_ids.extend(other.affected_ids);
        self.issues.extend(other.issues);
        self.messages.extend(other.messages);
        if other.garden.is_some() {
            self.garden = other.garden;
        }
    }
}

/// A single garden edit, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    UpdateGardenMetadata(garden::UpdateGardenMetadataParams),
    AddAgentComment(garden::AddAgentCommentParams),
    AddBed(beds::AddBedParams),
    RemoveBed(beds::RemoveBedParams),
    MoveBed(beds::MoveBedParams),
    UpdateBedDimensions(beds::UpdateBedDimensionsParams),
    AddPlanting(plantings::AddPlantingParams),
    RemovePlanting(plantings::RemovePlantingParams),
    AddTask(tasks::AddTaskParams),
    AddPlantingTask(tasks::AddPlantingTaskParams),
    SetTaskStatus(tasks::SetTaskStatusParams),
    RemoveTask(tasks::RemoveTaskParams),
}

impl Mutation {
    pub fn apply(&self, garden: &mut Garden) -> Result<CmdResult> {
        tracing::debug!(op = self.name(), garden = %garden.id, "applying mutation");
        match self {
            Mutation::UpdateGardenMetadata(p) => garden::update_metadata(garden, p),
            Mutation::AddAgentComment(p) => garden::add_agent_comment(garden, p),
            Mutation::AddBed(p) => beds::add(garden, p),
            Mutation::RemoveBed(p) => beds::remove(garden, p),
            Mutation::MoveBed(p) => beds::move_bed(garden, p),
            Mutation::UpdateBedDimensions(p) => beds::update_dimensions(garden, p),
            Mutation::AddPlanting(p) => plantings::add(garden, p),
            Mutation::RemovePlanting(p) => plantings::remove(garden, p),
            Mutation::AddTask(p) => tasks::add(garden, p),
            Mutation::AddPlantingTask(p) => tasks::add_for_planting(garden, p),
            Mutation::SetTaskStatus(p) => tasks::set_status(garden, p),
            Mutation::RemoveTask(p) => tasks::remove(garden, p),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::UpdateGardenMetadata(_) => "update_garden_metadata",
            Mutation::AddAgentComment(_) => "add_agent_comment",
            Mutation::AddBed(_) => "add_bed",
            Mutation::RemoveBed(_) => "remove_bed",
            Mutation::MoveBed(_) => "move_bed",
            Mutation::UpdateBedDimensions(_) => "update_bed_dimensions",
            Mutation::AddPlanting(_) => "add_planting",
            Mutation::RemovePlanting(_) => "remove_planting",
            Mutation::AddTask(_) => "add_task",
            Mutation::AddPlantingTask(_) => "add_planting_task",
            Mutation::SetTaskStatus(_) => "set_task_status",
            Mutation::RemoveTask(_) => "remove_task",
        }
    }
}
