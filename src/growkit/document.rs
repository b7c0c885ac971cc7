//! # Garden Documents
//!
//! A garden is persisted as one UTF-8 JSON document whose field names match the
//! model exactly. Absent optionals are written as `null`, so a saved document
//! always shows the full shape.
//!
//! ## Schema versions
//!
//! - `0.0.2` (current): plantings with spacing and dates, a task list, frost
//!   dates, agent comments.
//! - `0.0.1` (legacy): beds hold `plants` and there are no tasks. Documents
//!   with this version, or with no `schema_version` at all, are migrated on
//!   load. Plants without a position land at the bed origin.
//!
//! Every loaded document goes through [`Garden::check_structure`].

use crate::error::{GrowkitError, Result};
use crate::model::{
    Bed, Coordinates, Dimensions, Garden, Metadata, Planting, Position, SCHEMA_VERSION,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub const LEGACY_SCHEMA_VERSION: &str = "0.0.1";

pub fn to_json(garden: &Garden) -> Result<String> {
    Ok(serde_json::to_string_pretty(garden)?)
}

pub fn from_json(content: &str) -> Result<Garden> {
    let raw: Value = serde_json::from_str(content)?;
    let version = raw
        .get("schema_version")
        .and_then(Value::as_str)
        .map(str::to_string);

    let garden = match version.as_deref() {
        Some(SCHEMA_VERSION) => serde_json::from_value::<Garden>(raw)?,
        Some(LEGACY_SCHEMA_VERSION) | None => {
            tracing::info!("migrating legacy garden document");
            migrate_legacy(serde_json::from_value(raw)?)
        }
        Some(other) => return Err(GrowkitError::UnsupportedSchemaVersion(other.to_string())),
    };

    garden.check_structure()?;
    Ok(garden)
}

pub fn load_garden<P: AsRef<Path>>(path: P) -> Result<Garden> {
    let content = fs::read_to_string(path.as_ref()).map_err(GrowkitError::Io)?;
    from_json(&content)
}

pub fn save_garden<P: AsRef<Path>>(garden: &Garden, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(GrowkitError::Io)?;
        }
    }
    fs::write(path, to_json(garden)?).map_err(GrowkitError::Io)?;
    tracing::debug!(path = %path.display(), "saved garden");
    Ok(())
}

#[derive(Deserialize)]
struct LegacyGarden {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    name: String,
    location: Option<Coordinates>,
    #[serde(default)]
    beds: Vec<LegacyBed>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Deserialize)]
struct LegacyBed {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    name: String,
    position: Option<Position>,
    dimensions: Dimensions,
    soil_type: Option<String>,
    #[serde(default)]
    plants: Vec<LegacyPlant>,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Deserialize)]
struct LegacyPlant {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    species: String,
    variety: Option<String>,
    planted_on: Option<NaiveDate>,
    position: Option<Position>,
    notes: Option<String>,
}

fn migrate_legacy(legacy: LegacyGarden) -> Garden {
    let beds = legacy
        .beds
        .into_iter()
        .map(|bed| Bed {
            id: bed.id,
            name: bed.name,
            position: bed.position,
            dimensions: bed.dimensions,
            soil_type: bed.soil_type,
            plantings: bed
                .plants
                .into_iter()
                .map(|plant| Planting {
                    id: plant.id,
                    species: plant.species,
                    variety: plant.variety,
                    planted_on: plant.planted_on,
                    expected_harvest: None,
                    position: plant.position.unwrap_or(Position(0.0, 0.0)),
                    spacing: None,
                    notes: plant.notes,
                    metadata: Metadata::new(),
                })
                .collect(),
            metadata: bed.metadata,
        })
        .collect();

    Garden {
        schema_version: SCHEMA_VERSION.to_string(),
        id: legacy.id,
        name: legacy.name,
        location: legacy.location,
        beds,
        tasks: Vec::new(),
        created_at: legacy.created_at,
        average_last_frost: None,
        average_first_frost: None,
        agent_comments: Vec::new(),
        metadata: legacy.metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgentComment, Task, TaskStatus, UnitLength};
    use serde_json::json;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_garden() -> Garden {
        let mut planting = Planting::new("Carrot", Position(0.1, 0.1))
            .unwrap()
            .with_spacing(0.05)
            .with_planted_on(date(2025, 4, 1));
        planting.variety = Some("Nantes".into());
        planting.expected_harvest = Some(date(2025, 6, 1));
        planting
            .metadata
            .insert("source".into(), json!({"seed_bank": "local"}));
        let planting_id = planting.id;

        let dims = Dimensions::new(1.0, 2.0, Some(0.3), UnitLength::Feet).unwrap();
        let mut bed = Bed::new("Root Bed", dims)
            .unwrap()
            .with_plantings(vec![planting]);
        bed.position = Some(Position(1.0, 2.0));

        let mut task = Task::new("Thin", date(2025, 4, 20))
            .unwrap()
            .for_planting(planting_id);
        task.status = TaskStatus::Completed;
        task.completed_on = Some(date(2025, 4, 21));
        task.related_bed_id = Some(bed.id);

        let mut garden = Garden::new("My Garden").unwrap();
        garden.location = Some(Coordinates::new(41.0, -96.0).unwrap());
        garden.average_last_frost = Some(date(2025, 4, 15));
        garden.beds.push(bed);
        garden.tasks.push(task);
        garden
            .agent_comments
            .push(AgentComment::new("Consider a trellis.").unwrap());
        garden
    }

    #[test]
    fn round_trip_is_lossless() {
        let garden = sample_garden();
        let loaded = from_json(&to_json(&garden).unwrap()).unwrap();
        assert_eq!(loaded, garden);
    }

    #[test]
    fn round_trip_empty_garden() {
        let garden = Garden::new("Empty").unwrap();
        let loaded = from_json(&to_json(&garden).unwrap()).unwrap();
        assert_eq!(loaded, garden);
    }

    #[test]
    fn writes_nulls_and_field_names() {
        let garden = Garden::new("Empty").unwrap();
        let value: Value = serde_json::from_str(&to_json(&garden).unwrap()).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert!(value["location"].is_null());
        assert_eq!(value["beds"], json!([]));
        assert_eq!(value["tasks"], json!([]));
    }

    #[test]
    fn file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("garden.json");
        let garden = sample_garden();
        save_garden(&garden, &path).unwrap();

        let loaded = load_garden(&path).unwrap();
        assert_eq!(loaded.beds[0].plantings[0].species, "Carrot");
        assert_eq!(loaded.beds[0].dimensions.width, 1.0);
    }

    #[test]
    fn migrates_legacy_document() {
        let doc = json!({
            "schema_version": "0.0.1",
            "id": "2c6f0f76-9a53-4d55-a2cf-6a8b1a5a2f10",
            "name": "Old Garden",
            "location": null,
            "created_at": "2024-03-01T10:00:00Z",
            "beds": [{
                "id": "5f1e0c1e-3c55-4f44-8a3a-2b2d0f1c9e01",
                "name": "Bed X",
                "position": [0.0, 0.0],
                "dimensions": {"width": 1.0, "length": 1.0, "depth": null, "unit": "m"},
                "soil_type": null,
                "plants": [
                    {"id": "8a1b5d4e-2f0c-4c3b-9e7d-6a5b4c3d2e1f", "species": "Lettuce", "variety": "Romaine"}
                ]
            }]
        });
        let garden = from_json(&doc.to_string()).unwrap();
        assert_eq!(garden.schema_version, SCHEMA_VERSION);
        assert!(garden.tasks.is_empty());
        let planting = &garden.beds[0].plantings[0];
        assert_eq!(planting.species, "Lettuce");
        assert_eq!(planting.position, Position(0.0, 0.0));
        assert!(planting.spacing.is_none());
    }

    #[test]
    fn missing_version_is_legacy() {
        let doc = json!({"name": "Unversioned", "beds": []});
        let garden = from_json(&doc.to_string()).unwrap();
        assert_eq!(garden.name, "Unversioned");
        assert_eq!(garden.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let doc = json!({"schema_version": "9.9.9", "name": "Future"});
        assert!(matches!(
            from_json(&doc.to_string()),
            Err(GrowkitError::UnsupportedSchemaVersion(v)) if v == "9.9.9"
        ));
    }

    #[test]
    fn structurally_invalid_document_is_rejected() {
        let mut garden = sample_garden();
        garden.beds[0].dimensions.width = -1.0;
        let err = from_json(&to_json(&garden).unwrap()).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            from_json("{not json"),
            Err(GrowkitError::Serialization(_))
        ));
    }
}
