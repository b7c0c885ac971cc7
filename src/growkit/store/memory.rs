use super::DataStore;
use crate::document;
use crate::error::{GrowkitError, Result};
use crate::model::Garden;
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data. The garden is kept as its serialized document so
/// every load exercises the same codec as the file store.
#[derive(Default)]
pub struct InMemoryStore {
    document: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for InMemoryStore {
    fn load_garden(&self) -> Result<Garden> {
        match &self.document {
            Some(doc) => document::from_json(doc),
            None => Err(GrowkitError::GardenMissing("memory".to_string())),
        }
    }

    fn save_garden(&mut self, garden: &Garden) -> Result<()> {
        self.document = Some(document::to_json(garden)?);
        Ok(())
    }

    fn has_garden(&self) -> bool {
        self.document.is_some()
    }

    fn garden_path(&self) -> Option<PathBuf> {
        None
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Bed, Dimensions, Planting, Position, UnitLength};

    pub struct StoreFixture {
        pub store: InMemoryStore,
        garden: Garden,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                garden: Garden::new("Fixture Garden").unwrap(),
            }
        }

        pub fn with_bed(mut self, name: &str, width: f64, length: f64) -> Self {
            let dims = Dimensions::new(width, length, None, UnitLength::Meters).unwrap();
            self.garden.beds.push(Bed::new(name, dims).unwrap());
            self
        }

        /// Adds a planting to the most recently added bed.
        pub fn with_planting(mut self, species: &str, x: f64, y: f64, spacing: f64) -> Self {
            let planting = Planting::new(species, Position(x, y))
                .unwrap()
                .with_spacing(spacing);
            self.garden
                .beds
                .last_mut()
                .expect("with_planting needs a bed")
                .plantings
                .push(planting);
            self
        }

        pub fn build(mut self) -> InMemoryStore {
            self.store.save_garden(&self.garden).unwrap();
            self.store
        }
    }
}
