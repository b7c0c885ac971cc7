use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GrowkitError, Result};
use crate::model::{Garden, Task, TaskStatus};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTaskParams {
    pub title: String,
    pub target_date: NaiveDate,
    pub description: Option<String>,
    pub related_planting_id: Option<Uuid>,
    pub related_bed_id: Option<Uuid>,
}

/// Appends a pending task. Back-references are stored as given; they are
/// lookups and are not required to resolve.
pub fn add(garden: &mut Garden, params: &AddTaskParams) -> Result<CmdResult> {
    let mut task = Task::new(params.title.clone(), params.target_date)?;
    task.description = params.description.clone();
    task.related_planting_id = params.related_planting_id;
    task.related_bed_id = params.related_bed_id;

    let id = task.id;
    let message = CmdMessage::success(format!(
        "Task added: {} on {}",
        task.title, task.target_date
    ));
    garden.tasks.push(task);
    Ok(CmdResult::default().with_affected(id).with_message(message))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPlantingTaskParams {
    pub planting_id: Uuid,
    pub title: String,
    pub target_date: NaiveDate,
    pub description: Option<String>,
}

/// Adds a task tied to a planting, filling in the bed that holds it.
pub fn add_for_planting(garden: &mut Garden, params: &AddPlantingTaskParams) -> Result<CmdResult> {
    let bed_id = garden.bed_of_planting(&params.planting_id).map(|b| b.id);
    add(
        garden,
        &AddTaskParams {
            title: params.title.clone(),
            target_date: params.target_date,
            description: params.description.clone(),
            related_planting_id: Some(params.planting_id),
            related_bed_id: bed_id,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTaskStatusParams {
    pub task_id: Uuid,
    pub status: TaskStatus,
    /// Completion date for `completed`; today (UTC) when absent.
    pub completed_on: Option<NaiveDate>,
}

pub fn set_status(garden: &mut Garden, params: &SetTaskStatusParams) -> Result<CmdResult> {
    let task = garden
        .task_mut(&params.task_id)
        .ok_or(GrowkitError::TaskNotFound(params.task_id))?;

    task.status = params.status;
    task.completed_on = match params.status {
        TaskStatus::Completed => Some(
            params
                .completed_on
                .unwrap_or_else(|| Utc::now().date_naive()),
        ),
        TaskStatus::Pending | TaskStatus::Skipped => None,
    };

    Ok(CmdResult::default()
        .with_affected(task.id)
        .with_message(CmdMessage::success(format!(
            "Task {}: {}",
            task.status, task.title
        ))))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveTaskParams {
    pub task_id: Uuid,
}

pub fn remove(garden: &mut Garden, params: &RemoveTaskParams) -> Result<CmdResult> {
    let index = garden
        .tasks
        .iter()
        .position(|t| t.id == params.task_id)
        .ok_or(GrowkitError::TaskNotFound(params.task_id))?;
    let task = garden.tasks.remove(index);
    Ok(CmdResult::default()
        .with_affected(task.id)
        .with_message(CmdMessage::success(format!("Task removed: {}", task.title))))
}
