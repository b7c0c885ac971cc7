//! # Storage Layer
//!
//! The [`DataStore`] trait hides where the garden document lives, so the API
//! facade and its tests do not care about the filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON document per store directory
//! - [`memory::InMemoryStore`]: keeps the serialized document in memory, for tests
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! .growkit/
//! ├── garden.json         # The garden document (see `document`)
//! └── config.json         # Store configuration
//! ```

use crate::error::Result;
use crate::model::Garden;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for garden storage.
pub trait DataStore {
    /// Load the stored garden
    fn load_garden(&self) -> Result<Garden>;

    /// Save the garden (create or replace)
    fn save_garden(&mut self, garden: &Garden) -> Result<()>;

    /// Whether a garden has been saved yet
    fn has_garden(&self) -> bool;

    /// Where the garden lives, for file-based stores
    fn garden_path(&self) -> Option<PathBuf>;
}
