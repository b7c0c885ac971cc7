use crate::error::{GrowkitError, Result};
use crate::model::UnitLength;
use crate::policy::CommitMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_GARDEN_FILE: &str = "garden.json";

/// Configuration for growkit, stored in .growkit/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrowkitConfig {
    /// Validate the whole garden before accepting each edit
    #[serde(default = "default_validate")]
    pub validate_on_commit: bool,

    /// Unit used for new beds when none is given
    #[serde(default)]
    pub default_unit: UnitLength,

    /// File name of the garden document inside the store directory
    #[serde(default = "default_garden_file")]
    pub garden_file: String,
}

fn default_validate() -> bool {
    true
}

fn default_garden_file() -> String {
    DEFAULT_GARDEN_FILE.to_string()
}

impl Default for GrowkitConfig {
    fn default() -> Self {
        Self {
            validate_on_commit: true,
            default_unit: UnitLength::Meters,
            garden_file: DEFAULT_GARDEN_FILE.to_string(),
        }
    }
}

impl GrowkitConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(GrowkitError::Io)?;
        let config: GrowkitConfig =
            serde_json::from_str(&content).map_err(GrowkitError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(GrowkitError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(GrowkitError::Serialization)?;
        fs::write(config_path, content).map_err(GrowkitError::Io)?;
        Ok(())
    }

    pub fn commit_mode(&self) -> CommitMode {
        CommitMode::from_flag(self.validate_on_commit)
    }

    /// Set the garden file name (normalizes to end in .json)
    pub fn set_garden_file(&mut self, name: &str) {
        if name.ends_with(".json") {
            self.garden_file = name.to_string();
        } else {
            self.garden_file = format!("{}.json", name);
        }
    }

    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set).
    pub const KEYS: [&'static str; 3] = ["validate", "unit", "garden-file"];

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "validate" => Some(self.validate_on_commit.to_string()),
            "unit" => Some(self.default_unit.to_string()),
            "garden-file" => Some(self.garden_file.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "validate" => {
                self.validate_on_commit = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    other => return Err(format!("Invalid value for validate: {}", other)),
                };
            }
            "unit" => {
                self.default_unit = value.parse().map_err(|e: GrowkitError| e.to_string())?;
            }
            "garden-file" => {
                if value.trim().is_empty() {
                    return Err("garden-file must not be empty".to_string());
                }
                self.set_garden_file(value.trim());
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GrowkitConfig::default();
        assert!(config.validate_on_commit);
        assert_eq!(config.garden_file, "garden.json");
        assert_eq!(config.commit_mode(), CommitMode::Validated);
    }

    #[test]
    fn test_set_garden_file_normalizes() {
        let mut config = GrowkitConfig::default();
        config.set_garden_file("allotment");
        assert_eq!(config.garden_file, "allotment.json");
        config.set_garden_file("plot.json");
        assert_eq!(config.garden_file, "plot.json");
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = GrowkitConfig::load(temp.path().join("missing")).unwrap();
        assert_eq!(config, GrowkitConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();

        let config = GrowkitConfig {
            validate_on_commit: false,
            default_unit: UnitLength::Feet,
            ..Default::default()
        };
        config.save(temp.path()).unwrap();

        let loaded = GrowkitConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.commit_mode(), CommitMode::Unvalidated);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"{"default_unit": "in"}"#,
        )
        .unwrap();

        let loaded = GrowkitConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.default_unit, UnitLength::Inches);
        assert!(loaded.validate_on_commit);
        assert_eq!(loaded.garden_file, "garden.json");
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = GrowkitConfig::default();
        assert_eq!(config.get("validate").as_deref(), Some("true"));
        assert_eq!(config.get("unit").as_deref(), Some("m"));

        config.set("validate", "off").unwrap();
        config.set("unit", "ft").unwrap();
        config.set("garden-file", "allotment").unwrap();
        assert_eq!(config.commit_mode(), CommitMode::Unvalidated);
        assert_eq!(config.default_unit, UnitLength::Feet);
        assert_eq!(config.get("garden-file").as_deref(), Some("allotment.json"));

        assert!(config.set("validate", "maybe").is_err());
        assert!(config.set("unit", "yards").is_err());
        assert!(config.set("colour", "green").is_err());
        assert_eq!(config.get("colour"), None);
    }
}
