use super::DataStore;
use crate::document;
use crate::error::{GrowkitError, Result};
use crate::model::Garden;
use std::fs;
use std::path::PathBuf;

pub struct FileStore {
    root: PathBuf,
    file_name: String,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_name: "garden.json".to_string(),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    fn document_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(GrowkitError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load_garden(&self) -> Result<Garden> {
        let path = self.document_path();
        if !path.exists() {
            return Err(GrowkitError::GardenMissing(path.display().to_string()));
        }
        document::load_garden(path)
    }

    fn save_garden(&mut self, garden: &Garden) -> Result<()> {
        self.ensure_dir()?;
        document::save_garden(garden, self.document_path())
    }

    fn has_garden(&self) -> bool {
        self.document_path().exists()
    }

    fn garden_path(&self) -> Option<PathBuf> {
        Some(self.document_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_garden_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join(".growkit"));
        assert!(!store.has_garden());
        assert!(matches!(
            store.load_garden(),
            Err(GrowkitError::GardenMissing(_))
        ));
    }

    #[test]
    fn saves_into_created_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".growkit");
        let mut store = FileStore::new(root.clone()).with_file_name("plot.json");
        let garden = Garden::new("Plot").unwrap();

        store.save_garden(&garden).unwrap();

        assert!(root.join("plot.json").exists());
        assert_eq!(store.load_garden().unwrap(), garden);
        assert_eq!(store.garden_path(), Some(root.join("plot.json")));
    }
}
