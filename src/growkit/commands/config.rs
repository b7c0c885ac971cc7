use crate::commands::{CmdMessage, CmdResult};
use crate::config::GrowkitConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = GrowkitConfig::load(config_dir)?;
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let message = match config.get(&key) {
                Some(value) => CmdMessage::info(value),
                None => CmdMessage::error(format!("Unknown config key: {}", key)),
            };
            Ok(CmdResult::default().with_message(message))
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                return Ok(CmdResult::default().with_message(CmdMessage::error(e)));
            }
            config.save(config_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            tracing::info!(key = %key, value = %shown, "config updated");
            Ok(CmdResult::default()
                .with_message(CmdMessage::success(format!("{} set to {}", key, shown)))
                .with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::TempDir;

    #[test]
    fn set_persists_and_show_reads_back() {
        let temp = TempDir::new().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("validate".into(), "false".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);

        let shown = run(temp.path(), ConfigAction::ShowKey("validate".into())).unwrap();
        assert_eq!(shown.messages[0].content, "false");

        let all = run(temp.path(), ConfigAction::ShowAll).unwrap();
        assert!(!all.config.unwrap().validate_on_commit);
    }

    #[test]
    fn bad_value_is_reported_not_saved() {
        let temp = TempDir::new().unwrap();
        let result = run(temp.path(), ConfigAction::Set("unit".into(), "yd".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!temp.path().join("config.json").exists());
    }
}
