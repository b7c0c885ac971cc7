use crate::error::{GrowkitError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "0.0.2";

pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum UnitLength {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "in")]
    Inches,
}

impl UnitLength {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnitLength::Meters => "m",
            UnitLength::Feet => "ft",
            UnitLength::Inches => "in",
        }
    }
}

impl fmt::Display for UnitLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for UnitLength {
    type Err = GrowkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "m" | "meters" => Ok(UnitLength::Meters),
            "ft" | "feet" => Ok(UnitLength::Feet),
            "in" | "inches" => Ok(UnitLength::Inches),
            other => Err(GrowkitError::Api(format!("Unknown unit: {}", other))),
        }
    }
}

/// A point as `[x, y]`. Garden-relative for beds, bed-relative for plantings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position(pub f64, pub f64);

impl Position {
    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    /// Both coordinates must be finite; JSON has no encoding for NaN or infinity.
    pub fn check(&self, field: &'static str) -> Result<()> {
        if !(self.0.is_finite() && self.1.is_finite()) {
            return Err(GrowkitError::NonFinitePosition {
                field,
                position: *self,
            });
        }
        Ok(())
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.0 - other.0).hypot(self.1 - other.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
    pub depth: Option<f64>,
    #[serde(default)]
    pub unit: UnitLength,
}

impl Dimensions {
    pub fn new(width: f64, length: f64, depth: Option<f64>, unit: UnitLength) -> Result<Self> {
        let dims = Self {
            width,
            length,
            depth,
            unit,
        };
        dims.check()?;
        Ok(dims)
    }

    pub fn check(&self) -> Result<()> {
        positive("width", self.width)?;
        positive("length", self.length)?;
        if let Some(depth) = self.depth {
            positive("depth", depth)?;
        }
        Ok(())
    }

    /// Whether a bed-relative point lies in `[0, width] x [0, length]`.
    pub fn contains(&self, position: &Position) -> bool {
        (0.0..=self.width).contains(&position.x()) && (0.0..=self.length).contains(&position.y())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GrowkitError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Planting {
    pub id: Uuid,
    pub species: String,
    pub variety: Option<String>,
    pub planted_on: Option<NaiveDate>,
    pub expected_harvest: Option<NaiveDate>,
    pub position: Position,
    /// Spacing radius, in the unit of the owning bed.
    pub spacing: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Planting {
    pub fn new(species: impl Into<String>, position: Position) -> Result<Self> {
        let species = species.into();
        non_empty("species", &species)?;
        position.check("planting position")?;
        Ok(Self {
            id: Uuid::new_v4(),
            species,
            variety: None,
            planted_on: None,
            expected_harvest: None,
            position,
            spacing: None,
            notes: None,
            metadata: Metadata::new(),
        })
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_planted_on(mut self, date: NaiveDate) -> Self {
        self.planted_on = Some(date);
        self
    }

    pub fn spacing_or_zero(&self) -> f64 {
        self.spacing.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Bed {
    pub id: Uuid,
    pub name: String,
    pub position: Option<Position>,
    pub dimensions: Dimensions,
    pub soil_type: Option<String>,
    #[serde(default)]
    pub plantings: Vec<Planting>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Bed {
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Result<Self> {
        let name = name.into();
        non_empty("bed name", &name)?;
        dimensions.check()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            position: None,
            dimensions,
            soil_type: None,
            plantings: Vec::new(),
            metadata: Metadata::new(),
        })
    }

    pub fn with_plantings(mut self, plantings: Vec<Planting>) -> Self {
        self.plantings = plantings;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_date: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    pub related_planting_id: Option<Uuid>,
    pub related_bed_id: Option<Uuid>,
}

impl Task {
    pub fn new(title: impl Into<String>, target_date: NaiveDate) -> Result<Self> {
        let title = title.into();
        non_empty("task title", &title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            target_date,
            completed_on: None,
            status: TaskStatus::Pending,
            related_planting_id: None,
            related_bed_id: None,
        })
    }

    pub fn for_planting(mut self, planting_id: Uuid) -> Self {
        self.related_planting_id = Some(planting_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgentComment {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub comment: String,
}

impl AgentComment {
    pub fn new(comment: impl Into<String>) -> Result<Self> {
        let comment = comment.into();
        non_empty("comment", &comment)?;
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            comment,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Garden {
    pub schema_version: String,
    pub id: Uuid,
    pub name: String,
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub beds: Vec<Bed>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub average_last_frost: Option<NaiveDate>,
    pub average_first_frost: Option<NaiveDate>,
    #[serde(default)]
    pub agent_comments: Vec<AgentComment>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Garden {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        non_empty("garden name", &name)?;
        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            name,
            location: None,
            beds: Vec::new(),
            tasks: Vec::new(),
            created_at: Utc::now(),
            average_last_frost: None,
            average_first_frost: None,
            agent_comments: Vec::new(),
            metadata: Metadata::new(),
        })
    }

    pub fn bed(&self, id: &Uuid) -> Option<&Bed> {
        self.beds.iter().find(|b| &b.id == id)
    }

    pub fn bed_mut(&mut self, id: &Uuid) -> Option<&mut Bed> {
        self.beds.iter_mut().find(|b| &b.id == id)
    }

    /// Every planting, bed by bed in list order.
    pub fn plantings(&self) -> impl Iterator<Item = &Planting> {
        self.beds.iter().flat_map(|b| b.plantings.iter())
    }

    pub fn planting(&self, id: &Uuid) -> Option<&Planting> {
        self.plantings().find(|p| &p.id == id)
    }

    /// The bed holding the given planting.
    pub fn bed_of_planting(&self, id: &Uuid) -> Option<&Bed> {
        self.beds
            .iter()
            .find(|b| b.plantings.iter().any(|p| &p.id == id))
    }

    pub fn task_mut(&mut self, id: &Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    pub fn planting_count(&self) -> usize {
        self.plantings().count()
    }

    /// Checks the well-formedness rules that constructors enforce, for
    /// documents that did not come through them (e.g. loaded from disk).
    pub fn check_structure(&self) -> Result<()> {
        non_empty("garden name", &self.name)?;

        let mut bed_ids = HashSet::new();
        let mut planting_ids = HashSet::new();
        for bed in &self.beds {
            if !bed_ids.insert(bed.id) {
                return Err(GrowkitError::DuplicateId {
                    kind: "bed",
                    id: bed.id,
                });
            }
            non_empty("bed name", &bed.name)?;
            bed.dimensions.check()?;
            if let Some(position) = &bed.position {
                position.check("bed position")?;
            }

            for planting in &bed.plantings {
                if !planting_ids.insert(planting.id) {
                    return Err(GrowkitError::DuplicateId {
                        kind: "planting",
                        id: planting.id,
                    });
                }
                non_empty("species", &planting.species)?;
                planting.position.check("planting position")?;
                if let Some(spacing) = planting.spacing {
                    if spacing.is_nan() || spacing < 0.0 {
                        return Err(GrowkitError::NonPositive {
                            field: "spacing",
                            value: spacing,
                        });
                    }
                }
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if !task_ids.insert(task.id) {
                return Err(GrowkitError::DuplicateId {
                    kind: "task",
                    id: task.id,
                });
            }
            non_empty("task title", &task.title)?;
        }

        Ok(())
    }
}

pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GrowkitError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(GrowkitError::NonPositive { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_garden_is_empty() {
        let garden = Garden::new("Backyard").unwrap();
        assert_eq!(garden.schema_version, SCHEMA_VERSION);
        assert!(garden.location.is_none());
        assert!(garden.beds.is_empty());
        assert!(garden.tasks.is_empty());
    }

    #[test]
    fn rejects_blank_names() {
        assert!(matches!(
            Garden::new("  "),
            Err(GrowkitError::EmptyField("garden name"))
        ));
        let dims = Dimensions::new(1.0, 1.0, None, UnitLength::Meters).unwrap();
        assert!(Bed::new("", dims).is_err());
        assert!(Planting::new("", Position(0.0, 0.0)).is_err());
    }

    #[test]
    fn dimensions_must_be_positive() {
        assert!(Dimensions::new(0.0, 1.0, None, UnitLength::Meters).is_err());
        assert!(Dimensions::new(1.0, -2.0, None, UnitLength::Meters).is_err());
        assert!(Dimensions::new(1.0, 1.0, Some(0.0), UnitLength::Meters).is_err());
        assert!(Dimensions::new(f64::NAN, 1.0, None, UnitLength::Meters).is_err());
        assert!(Dimensions::new(1.5, 3.0, Some(0.3), UnitLength::Feet).is_ok());
    }

    #[test]
    fn contains_is_inclusive() {
        let dims = Dimensions::new(1.0, 2.0, None, UnitLength::Meters).unwrap();
        assert!(dims.contains(&Position(0.0, 0.0)));
        assert!(dims.contains(&Position(1.0, 2.0)));
        assert!(!dims.contains(&Position(1.0001, 1.0)));
        assert!(!dims.contains(&Position(0.5, -0.1)));
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(Coordinates::new(41.0, -96.0).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 181.0).is_err());
    }

    #[test]
    fn unit_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&UnitLength::Feet).unwrap(), "\"ft\"");
        let unit: UnitLength = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(unit, UnitLength::Inches);
    }

    #[test]
    fn position_serializes_as_pair() {
        assert_eq!(
            serde_json::to_string(&Position(0.5, 1.25)).unwrap(),
            "[0.5,1.25]"
        );
    }

    #[test]
    fn check_structure_rejects_duplicate_ids() {
        let mut garden = Garden::new("G").unwrap();
        let dims = Dimensions::new(1.0, 1.0, None, UnitLength::Meters).unwrap();
        let bed = Bed::new("A", dims).unwrap();
        garden.beds.push(bed.clone());
        garden.beds.push(bed);
        assert!(matches!(
            garden.check_structure(),
            Err(GrowkitError::DuplicateId { kind: "bed", .. })
        ));
    }

    #[test]
    fn check_structure_rejects_negative_spacing() {
        let mut garden = Garden::new("G").unwrap();
        let dims = Dimensions::new(1.0, 1.0, None, UnitLength::Meters).unwrap();
        let planting = Planting::new("Kale", Position(0.5, 0.5))
            .unwrap()
            .with_spacing(-0.1);
        garden
            .beds
            .push(Bed::new("A", dims).unwrap().with_plantings(vec![planting]));
        assert!(garden.check_structure().is_err());
    }

    #[test]
    fn check_structure_rejects_non_finite_positions() {
        let dims = Dimensions::new(1.0, 1.0, None, UnitLength::Meters).unwrap();

        let mut garden = Garden::new("G").unwrap();
        let mut bed = Bed::new("A", dims.clone()).unwrap();
        bed.position = Some(Position(f64::NEG_INFINITY, 0.0));
        garden.beds.push(bed);
        assert!(matches!(
            garden.check_structure(),
            Err(GrowkitError::NonFinitePosition { field: "bed position", .. })
        ));

        let mut garden = Garden::new("G").unwrap();
        let mut planting = Planting::new("Kale", Position(0.5, 0.5)).unwrap();
        planting.position = Position(0.5, f64::NAN);
        garden
            .beds
            .push(Bed::new("A", dims).unwrap().with_plantings(vec![planting]));
        assert!(matches!(
            garden.check_structure(),
            Err(GrowkitError::NonFinitePosition {
                field: "planting position",
                ..
            })
        ));
    }

    #[test]
    fn finds_bed_of_planting() {
        let mut garden = Garden::new("G").unwrap();
        let dims = Dimensions::new(1.0, 1.0, None, UnitLength::Meters).unwrap();
        let planting = Planting::new("Kale", Position(0.5, 0.5)).unwrap();
        let planting_id = planting.id;
        garden.beds.push(Bed::new("A", dims.clone()).unwrap());
        garden
            .beds
            .push(Bed::new("B", dims).unwrap().with_plantings(vec![planting]));

        assert_eq!(garden.bed_of_planting(&planting_id).unwrap().name, "B");
        assert_eq!(garden.planting(&planting_id).unwrap().species, "Kale");
        assert_eq!(garden.planting_count(), 1);
    }
}
