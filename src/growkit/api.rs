//! # API Facade
//!
//! The API layer is a **thin facade** over the command and policy layers. It is
//! the single entry point for garden edits, whatever the front end.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Loads and saves** the garden through a [`DataStore`]
//! - **Normalizes inputs** (bed names, id prefixes) into ids
//! - **Routes every edit** through the commit policy in the configured mode
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! A rejected commit never reaches the store: the document on disk is only
//! replaced when the policy accepts the edit.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: No stdout, stderr, or colors
//!
//! ## Generic Over DataStore
//!
//! `GardenApi<S: DataStore>` is generic over the storage backend:
//! - Production: `GardenApi<FileStore>`
//! - Testing: `GardenApi<InMemoryStore>`

use crate::commands::beds::{
    AddBedParams, MoveBedParams, RemoveBedParams, UpdateBedDimensionsParams,
};
use crate::commands::garden::{
    self, AddAgentCommentParams, CreateGardenParams, UpdateGardenMetadataParams,
};
use crate::commands::config::{self, ConfigAction};
use crate::commands::helpers::{self, BedSelector};
use crate::commands::plantings::{AddPlantingParams, RemovePlantingParams};
use crate::commands::tasks::{
    AddPlantingTaskParams, AddTaskParams, RemoveTaskParams, SetTaskStatusParams,
};
use crate::commands::{CmdMessage, CmdResult, Mutation};
use crate::error::{GrowkitError, Result};
use crate::model::{Garden, Position};
use crate::policy::{self, CommitMode};
use crate::schema;
use crate::store::DataStore;
use crate::validate::validate_garden;
use uuid::Uuid;

/// The main API facade for garden operations.
pub struct GardenApi<S: DataStore> {
    store: S,
    mode: CommitMode,
}

impl<S: DataStore> GardenApi<S> {
    pub fn new(store: S, mode: CommitMode) -> Self {
        Self { store, mode }
    }

    pub fn with_mode(mut self, mode: CommitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_garden(&mut self, params: &CreateGardenParams) -> Result<CmdResult> {
        if self.store.has_garden() {
            let at = self
                .store
                .garden_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "store".to_string());
            return Err(GrowkitError::GardenExists(at));
        }
        let garden = garden::create(params)?;
        self.store.save_garden(&garden)?;
        Ok(CmdResult::default()
            .with_affected(garden.id)
            .with_message(CmdMessage::success(format!(
                "Garden created: {}",
                garden.name
            )))
            .with_garden(garden))
    }

    pub fn garden(&self) -> Result<Garden> {
        self.store.load_garden()
    }

    pub fn show(&self) -> Result<CmdResult> {
        Ok(CmdResult::default().with_garden(self.garden()?))
    }

    pub fn resolve_bed(&self, selector: &BedSelector) -> Result<Uuid> {
        helpers::resolve_bed(&self.garden()?, selector)
    }

    pub fn resolve_task(&self, prefix: &str) -> Result<Uuid> {
        helpers::resolve_task(&self.garden()?, prefix)
    }

    pub fn resolve_planting(&self, prefix: &str) -> Result<Uuid> {
        helpers::resolve_planting(&self.garden()?, prefix)
    }

    /// Commits one mutation in the configured mode.
    pub fn apply(&mut self, mutation: Mutation) -> Result<CmdResult> {
        let mode = self.mode;
        self.mutate(mutation.name(), |garden| {
            policy::commit(garden, &mutation, mode)
        })
    }

    pub fn update_metadata(&mut self, params: UpdateGardenMetadataParams) -> Result<CmdResult> {
        if params.is_empty() {
            return Err(GrowkitError::Api(
                "Provide at least one field to update".to_string(),
            ));
        }
        self.apply(Mutation::UpdateGardenMetadata(params))
    }

    pub fn add_comment(&mut self, comment: &str) -> Result<CmdResult> {
        self.apply(Mutation::AddAgentComment(AddAgentCommentParams {
            comment: comment.to_string(),
        }))
    }

    pub fn add_bed(&mut self, params: AddBedParams) -> Result<CmdResult> {
        self.apply(Mutation::AddBed(params))
    }

    /// Removes a bed by id or name. Unlike the raw command, a bed that does
    /// not exist is an error here.
    pub fn remove_bed(&mut self, selector: &BedSelector) -> Result<CmdResult> {
        let bed_id = self.resolve_bed(selector)?;
        self.apply(Mutation::RemoveBed(RemoveBedParams { bed_id }))
    }

    pub fn move_bed(&mut self, selector: &BedSelector, new_position: Position) -> Result<CmdResult> {
        let bed_id = self.resolve_bed(selector)?;
        self.apply(Mutation::MoveBed(MoveBedParams {
            bed_id,
            new_position,
        }))
    }

    pub fn resize_bed(
        &mut self,
        selector: &BedSelector,
        mut params: UpdateBedDimensionsParams,
    ) -> Result<CmdResult> {
        params.bed_id = self.resolve_bed(selector)?;
        self.apply(Mutation::UpdateBedDimensions(params))
    }

    pub fn add_planting(
        &mut self,
        selector: &BedSelector,
        mut params: AddPlantingParams,
    ) -> Result<CmdResult> {
        params.bed_id = self.resolve_bed(selector)?;
        self.apply(Mutation::AddPlanting(params))
    }

    /// Removes plantings from one bed by their positions in the current list.
    pub fn remove_plantings(
        &mut self,
        selector: &BedSelector,
        indexes: &[usize],
    ) -> Result<CmdResult> {
        let bed_id = self.resolve_bed(selector)?;
        let removals: Vec<RemovePlantingParams> = indexes
            .iter()
            .map(|&planting_index| RemovePlantingParams {
                bed_id,
                planting_index,
            })
            .collect();
        let mode = self.mode;
        self.mutate("remove_plantings", |garden| {
            policy::remove_plantings(garden, &removals, mode)
        })
    }

    pub fn add_task(&mut self, params: AddTaskParams) -> Result<CmdResult> {
        self.apply(Mutation::AddTask(params))
    }

    /// Adds a task for an existing planting, addressed by id or id prefix.
    pub fn add_planting_task(
        &mut self,
        planting: &str,
        mut params: AddPlantingTaskParams,
    ) -> Result<CmdResult> {
        params.planting_id = self.resolve_planting(planting)?;
        self.apply(Mutation::AddPlantingTask(params))
    }

    pub fn set_task_status(
        &mut self,
        task: &str,
        mut params: SetTaskStatusParams,
    ) -> Result<CmdResult> {
        params.task_id = self.resolve_task(task)?;
        self.apply(Mutation::SetTaskStatus(params))
    }

    pub fn remove_task(&mut self, task: &str) -> Result<CmdResult> {
        let task_id = self.resolve_task(task)?;
        self.apply(Mutation::RemoveTask(RemoveTaskParams { task_id }))
    }

    /// Applies every mutation, then validates once. With validation on, a
    /// failing batch is not saved; with it off the batch is saved regardless
    /// and the issues come back on the result.
    pub fn apply_batch(&mut self, mutations: &[Mutation]) -> Result<CmdResult> {
        let mut garden = self.store.load_garden()?;
        match policy::commit_batch(&mut garden, mutations) {
            Ok(result) => {
                self.store.save_garden(&garden)?;
                Ok(result)
            }
            Err(GrowkitError::Validation(issues)) if self.mode == CommitMode::Unvalidated => {
                self.store.save_garden(&garden)?;
                tracing::info!(
                    mutations = mutations.len(),
                    "saved batch without validation"
                );
                Ok(CmdResult::default()
                    .with_message(CmdMessage::warning(format!(
                        "Batch saved with {} validation issue(s)",
                        issues.len()
                    )))
                    .with_issues(issues))
            }
            Err(e) => Err(e),
        }
    }

    /// Runs the validation engine over the stored garden.
    pub fn validate(&self) -> Result<CmdResult> {
        let garden = self.garden()?;
        let issues = validate_garden(&garden);
        let message = if issues.is_empty() {
            CmdMessage::success("Garden is valid")
        } else {
            CmdMessage::warning(format!("{} validation issue(s)", issues.len()))
        };
        Ok(CmdResult::default()
            .with_issues(issues)
            .with_message(message))
    }

    pub fn schema(&self) -> Result<CmdResult> {
        Ok(CmdResult::default().with_schema(schema::garden_schema()?))
    }

    /// Reads or changes the config stored next to the garden document.
    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        let dir = self
            .store
            .garden_path()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .ok_or_else(|| GrowkitError::Api("This store has no config directory".to_string()))?;
        config::run(&dir, action)
    }

    fn mutate<F>(&mut self, op: &'static str, apply: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut Garden) -> Result<CmdResult>,
    {
        let mut garden = self.store.load_garden()?;
        let result = apply(&mut garden)?;
        self.store.save_garden(&garden)?;
        tracing::info!(op, mode = ?self.mode, "saved garden");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskStatus, UnitLength};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::validate::IssueKind;
    use chrono::NaiveDate;

    fn api_with_bed() -> GardenApi<InMemoryStore> {
        let store = StoreFixture::new().with_bed("North", 1.0, 1.0).build();
        GardenApi::new(store, CommitMode::Validated)
    }

    fn north() -> BedSelector {
        BedSelector::Name("North".into())
    }

    fn planting(species: &str, x: f64, y: f64, spacing: f64) -> AddPlantingParams {
        AddPlantingParams {
            bed_id: Uuid::nil(),
            species: species.into(),
            variety: None,
            planted_on: None,
            expected_harvest: None,
            spacing: Some(spacing),
            position: Position(x, y),
            notes: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_garden_refuses_to_overwrite() {
        let mut api = GardenApi::new(InMemoryStore::new(), CommitMode::Validated);
        let params = CreateGardenParams {
            name: "Home".into(),
            latitude: Some(51.5),
            longitude: Some(-0.1),
        };
        api.create_garden(&params).unwrap();
        assert_eq!(api.garden().unwrap().name, "Home");
        assert!(matches!(
            api.create_garden(&params),
            Err(GrowkitError::GardenExists(_))
        ));
    }

    #[test]
    fn add_planting_resolves_bed_name() {
        let mut api = api_with_bed();
        let result = api.add_planting(&north(), planting("Kale", 0.5, 0.5, 0.2)).unwrap();
        let garden = api.garden().unwrap();
        assert_eq!(garden.beds[0].plantings[0].id, result.affected_ids[0]);
    }

    #[test]
    fn rejected_edit_is_not_saved() {
        let mut api = api_with_bed();
        api.add_planting(&north(), planting("A", 0.1, 0.1, 0.2)).unwrap();
        let err = api
            .add_planting(&north(), planting("B", 0.15, 0.15, 0.2))
            .unwrap_err();
        assert_eq!(err.issues().unwrap()[0].kind, IssueKind::SpacingConflict);
        assert_eq!(api.garden().unwrap().beds[0].plantings.len(), 1);
    }

    #[test]
    fn unvalidated_mode_saves_conflicts() {
        let mut api = api_with_bed().with_mode(CommitMode::Unvalidated);
        api.add_planting(&north(), planting("Out", 2.0, 2.0, 0.1)).unwrap();
        let result = api.validate().unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::BedBoundary);
    }

    #[test]
    fn remove_unknown_bed_is_an_error() {
        let mut api = api_with_bed();
        let err = api.remove_bed(&BedSelector::Name("South".into())).unwrap_err();
        assert!(matches!(err, GrowkitError::BedNotFound(_)));
    }

    #[test]
    fn empty_metadata_update_is_refused() {
        let mut api = api_with_bed();
        let err = api
            .update_metadata(UpdateGardenMetadataParams::default())
            .unwrap_err();
        assert!(matches!(err, GrowkitError::Api(_)));
    }

    #[test]
    fn remove_plantings_uses_current_indexes() {
        let mut api = api_with_bed();
        for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
            api.add_planting(&north(), planting(name, 0.2 + 0.3 * i as f64, 0.5, 0.1))
                .unwrap();
        }
        api.remove_plantings(&north(), &[2, 0]).unwrap();
        let garden = api.garden().unwrap();
        assert_eq!(garden.beds[0].plantings.len(), 1);
        assert_eq!(garden.beds[0].plantings[0].species, "B");
    }

    #[test]
    fn planting_task_lifecycle_by_prefix() {
        let mut api = api_with_bed();
        let mut params = planting("Tomato", 0.5, 0.5, 0.3);
        params.planted_on = Some(date(2030, 5, 1));
        let planting_id = api.add_planting(&north(), params).unwrap().affected_ids[0];

        let prefix = &planting_id.to_string()[..8];
        let task_id = api
            .add_planting_task(
                prefix,
                AddPlantingTaskParams {
                    planting_id: Uuid::nil(),
                    title: "Stake".into(),
                    target_date: date(2030, 6, 1),
                    description: None,
                },
            )
            .unwrap()
            .affected_ids[0];

        let garden = api.garden().unwrap();
        assert_eq!(garden.tasks[0].related_bed_id, Some(garden.beds[0].id));

        api.set_task_status(
            &task_id.to_string()[..8],
            SetTaskStatusParams {
                task_id: Uuid::nil(),
                status: TaskStatus::Completed,
                completed_on: Some(date(2030, 6, 2)),
            },
        )
        .unwrap();
        let task = &api.garden().unwrap().tasks[0];
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_on, Some(date(2030, 6, 2)));

        api.remove_task(&task_id.to_string()).unwrap();
        assert!(api.garden().unwrap().tasks.is_empty());
    }

    #[test]
    fn task_before_planting_is_rejected() {
        let mut api = api_with_bed();
        let mut params = planting("Tomato", 0.5, 0.5, 0.3);
        params.planted_on = Some(date(2030, 5, 1));
        let planting_id = api.add_planting(&north(), params).unwrap().affected_ids[0];

        let err = api
            .add_planting_task(
                &planting_id.to_string(),
                AddPlantingTaskParams {
                    planting_id: Uuid::nil(),
                    title: "Too soon".into(),
                    target_date: date(2030, 4, 1),
                    description: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.issues().unwrap()[0].kind, IssueKind::TaskDate);
        assert!(api.garden().unwrap().tasks.is_empty());
    }

    #[test]
    fn failing_batch_is_not_saved_when_validating() {
        let mut api = api_with_bed();
        let bed_id = api.resolve_bed(&north()).unwrap();
        let mut a = planting("A", 0.1, 0.1, 0.2);
        a.bed_id = bed_id;
        let mut b = planting("B", 0.15, 0.15, 0.2);
        b.bed_id = bed_id;

        let batch = vec![Mutation::AddPlanting(a), Mutation::AddPlanting(b)];
        assert!(api.apply_batch(&batch).is_err());
        assert!(api.garden().unwrap().beds[0].plantings.is_empty());

        let mut api = api.with_mode(CommitMode::Unvalidated);
        let result = api.apply_batch(&batch).unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(api.garden().unwrap().beds[0].plantings.len(), 2);
    }

    #[test]
    fn resize_and_move_bed() {
        let mut api = api_with_bed();
        api.resize_bed(
            &north(),
            UpdateBedDimensionsParams {
                bed_id: Uuid::nil(),
                width: 2.0,
                length: 3.0,
                depth: Some(0.3),
                unit: UnitLength::Feet,
            },
        )
        .unwrap();
        api.move_bed(&north(), Position(4.0, 5.0)).unwrap();

        let bed = &api.garden().unwrap().beds[0];
        assert_eq!(bed.dimensions.length, 3.0);
        assert_eq!(bed.dimensions.unit, UnitLength::Feet);
        assert_eq!(bed.position, Some(Position(4.0, 5.0)));
    }

    #[test]
    fn non_finite_positions_never_reach_the_store() {
        for mode in [CommitMode::Validated, CommitMode::Unvalidated] {
            let mut api = api_with_bed().with_mode(mode);
            let err = api.move_bed(&north(), Position(f64::NAN, 0.0)).unwrap_err();
            assert!(matches!(err, GrowkitError::NonFinitePosition { .. }));
            let err = api
                .add_planting(&north(), planting("Kale", f64::INFINITY, 0.5, 0.2))
                .unwrap_err();
            assert!(err.is_structural());

            let garden = api.garden().unwrap();
            assert_eq!(garden.beds[0].position, None);
            assert!(garden.beds[0].plantings.is_empty());
        }
    }

    #[test]
    fn memory_store_has_no_config() {
        let api = api_with_bed();
        assert!(matches!(
            api.config(ConfigAction::ShowAll),
            Err(GrowkitError::Api(_))
        ));
    }

    #[test]
    fn schema_is_returned() {
        let api = api_with_bed();
        let schema = api.schema().unwrap().schema.unwrap();
        assert!(schema.get("properties").is_some());
    }
}
