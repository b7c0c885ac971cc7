use crate::error::{GrowkitError, Result};
use crate::model::{Garden, SCHEMA_VERSION};
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// JSON Schema of the garden document, tagged with the schema version it
/// describes. External tools can check untrusted documents against it before
/// handing them to [`crate::document::from_json`].
pub fn garden_schema() -> Result<Value> {
    let mut schema = serde_json::to_value(schema_for!(Garden))?;
    if let Value::Object(map) = &mut schema {
        map.insert(
            "schema_version".to_string(),
            Value::String(SCHEMA_VERSION.to_string()),
        );
    }
    Ok(schema)
}

pub fn save_garden_schema<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(GrowkitError::Io)?;
    }
    let content = serde_json::to_string_pretty(&garden_schema()?)?;
    fs::write(path, content).map_err(GrowkitError::Io)?;
    Ok(())
}
