use crate::api::GardenApi;
use crate::config::GrowkitConfig;
use crate::error::{GrowkitError, Result};
use crate::store::fs::FileStore;
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Name of the per-project store directory.
pub const STORE_DIR: &str = ".growkit";

/// Overrides the global data directory (used by tests and scripted setups).
pub const GLOBAL_DATA_ENV: &str = "GROWKIT_GLOBAL_DATA";

pub struct GrowkitContext {
    pub api: GardenApi<FileStore>,
    pub config: GrowkitConfig,
    /// Directory holding the garden document and config.json
    pub store_dir: PathBuf,
}

/// Find the project root by walking up from cwd looking for a `.growkit`
/// directory. Stops at the home directory or the filesystem root.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(STORE_DIR).is_dir() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

pub fn global_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(GLOBAL_DATA_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "growkit", "growkit")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| GrowkitError::Api("Could not determine data directory".to_string()))
}

/// Picks the store directory: an explicit `dir` wins, then the global store
/// when asked for, then the nearest project store, then `cwd/.growkit`.
pub fn store_dir(cwd: &Path, dir: Option<&Path>, use_global: bool) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.to_path_buf());
    }
    if use_global {
        return global_data_dir();
    }
    Ok(find_project_root(cwd)
        .unwrap_or_else(|| cwd.to_path_buf())
        .join(STORE_DIR))
}

pub fn initialize(cwd: &Path, dir: Option<&Path>, use_global: bool) -> Result<GrowkitContext> {
    let store_dir = store_dir(cwd, dir, use_global)?;
    let config = GrowkitConfig::load(&store_dir)?;

    let store = FileStore::new(store_dir.clone()).with_file_name(&config.garden_file);
    let api = GardenApi::new(store, config.commit_mode());
    tracing::debug!(store = %store_dir.display(), mode = ?config.commit_mode(), "initialized context");

    Ok(GrowkitContext {
        api,
        config,
        store_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CommitMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_store_in_cwd() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(STORE_DIR)).unwrap();

        assert_eq!(find_project_root(root), Some(root.to_path_buf()));
    }

    #[test]
    fn walks_up_to_nearest_store() {
        let temp = TempDir::new().unwrap();
        let outer = temp.path();
        let inner = outer.join("plots").join("north");
        fs::create_dir_all(&inner).unwrap();
        fs::create_dir(outer.join(STORE_DIR)).unwrap();
        fs::create_dir(outer.join("plots").join(STORE_DIR)).unwrap();

        assert_eq!(find_project_root(&inner), Some(outer.join("plots")));
    }

    #[test]
    fn no_store_anywhere() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(find_project_root(&dir), None);
        assert_eq!(
            store_dir(&dir, None, false).unwrap(),
            dir.join(STORE_DIR)
        );
    }

    #[test]
    fn explicit_dir_wins() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(STORE_DIR)).unwrap();
        let custom = temp.path().join("elsewhere");

        assert_eq!(store_dir(temp.path(), Some(&custom), true).unwrap(), custom);
    }

    #[test]
    fn initialize_reads_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(STORE_DIR);
        let config = GrowkitConfig {
            validate_on_commit: false,
            garden_file: "plot.json".to_string(),
            ..GrowkitConfig::default()
        };
        config.save(&dir).unwrap();

        let ctx = initialize(temp.path(), None, false).unwrap();
        assert_eq!(ctx.store_dir, dir);
        assert_eq!(ctx.api.mode(), CommitMode::Unvalidated);
        assert_eq!(ctx.config.garden_file, "plot.json");
    }
}
