use crate::error::{GrowkitError, Result};
use crate::model::{non_empty, Bed, Garden};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How a caller names a bed: by id, or by its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BedSelector {
    Id(Uuid),
    Name(String),
}

impl FromStr for BedSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match Uuid::parse_str(s) {
            Ok(id) => BedSelector::Id(id),
            Err(_) => BedSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for BedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedSelector::Id(id) => write!(f, "{}", id),
            BedSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Resolves a selector to a bed id. Names match exactly; first match wins.
pub fn resolve_bed(garden: &Garden, selector: &BedSelector) -> Result<Uuid> {
    let found = match selector {
        BedSelector::Id(id) => garden.bed(id),
        BedSelector::Name(name) => garden.beds.iter().find(|b| &b.name == name),
    };
    found
        .map(|b| b.id)
        .ok_or_else(|| GrowkitError::BedNotFound(selector.to_string()))
}

/// Finds the single id among `ids` whose string form starts with `prefix`.
fn unique_prefix<I>(kind: &'static str, prefix: &str, ids: I) -> Result<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Err(GrowkitError::EmptyField("id"));
    }
    let mut matches = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(GrowkitError::NoMatch {
            kind,
            prefix: prefix.to_string(),
        }),
        (Some(_), Some(_)) => Err(GrowkitError::AmbiguousPrefix {
            kind,
            prefix: prefix.to_string(),
        }),
    }
}

/// Resolves a full id or unique id prefix to a task id.
pub fn resolve_task(garden: &Garden, prefix: &str) -> Result<Uuid> {
    unique_prefix("task", prefix, garden.tasks.iter().map(|t| t.id))
}

/// Resolves a full id or unique id prefix to a planting id.
pub fn resolve_planting(garden: &Garden, prefix: &str) -> Result<Uuid> {
    unique_prefix("planting", prefix, garden.plantings().map(|p| p.id))
}

pub fn find_bed_mut<'a>(garden: &'a mut Garden, id: &Uuid) -> Result<&'a mut Bed> {
    garden
        .bed_mut(id)
        .ok_or_else(|| GrowkitError::BedNotFound(id.to_string()))
}

/// Optional text fields may be absent, but not present-and-blank.
pub fn optional_non_empty(field: &'static str, value: &Option<String>) -> Result<()> {
    match value {
        Some(v) => non_empty(field, v),
        None => Ok(()),
    }
}
