use crate::validate::ValidationIssue;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GrowkitError {
    #[error("No bed found with id '{0}'")]
    BedNotFound(String),

    #[error("No task found with id '{0}'")]
    TaskNotFound(Uuid),

    #[error("No {kind} matches '{prefix}'")]
    NoMatch { kind: &'static str, prefix: String },

    #[error("'{prefix}' matches more than one {kind}")]
    AmbiguousPrefix { kind: &'static str, prefix: String },

    #[error("Planting index {index} is out of bounds for bed '{bed_id}' ({len} plantings)")]
    PlantingIndexOutOfRange {
        bed_id: Uuid,
        index: usize,
        len: usize,
    },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must have finite coordinates (got {position})")]
    NonFinitePosition {
        field: &'static str,
        position: crate::model::Position,
    },

    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: Uuid },

    #[error("A garden already exists at {0}")]
    GardenExists(String),

    #[error("No garden found at {0} (run `growkit init` first)")]
    GardenMissing(String),

    #[error("Unsupported schema version '{0}'")]
    UnsupportedSchemaVersion(String),

    #[error("Garden validation failed:\n{}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl GrowkitError {
    /// True for errors raised before any state change: a missing entity or a
    /// malformed field. Validation failures are judgments about applied state.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            GrowkitError::Validation(_)
                | GrowkitError::Io(_)
                | GrowkitError::Serialization(_)
                | GrowkitError::Api(_)
        )
    }

    /// The issue list carried by a validation failure.
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            GrowkitError::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, GrowkitError>;
