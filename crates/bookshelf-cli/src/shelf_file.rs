//! TOML shelf files.
//!
//! A shelf file holds the items of one shelf and, optionally, the geometry
//! it was laid out for:
//!
//! ```toml
//! [geometry]
//! row_width = 300.0
//! row_count = 2
//!
//! [[items]]
//! id = "berserk-1"
//! row_index = 0
//! position_x = 10.0
//! series_id = "berserk"
//! ```
//!
//! Item records are handed to the engine unvalidated; see
//! [`ShelfState::load`](bookshelf::state::ShelfState::load).

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use bookshelf::{
    ShelfError,
    config::ShelfConfig,
    item::{RawShelfItem, ShelfItem},
    state::ShelfStore,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ShelfDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<ShelfConfig>,

    #[serde(default)]
    items: Vec<RawShelfItem>,
}

/// A shelf file on disk, acting as the [`ShelfStore`] of the CLI.
#[derive(Debug)]
pub struct ShelfFile {
    path: PathBuf,
    document: ShelfDocument,
}

impl ShelfFile {
    /// Reads and parses the shelf file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Io`] if the file cannot be read and
    /// [`ShelfError::Parse`] if it is not a valid shelf document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShelfError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Reading shelf file");

        let source = fs::read_to_string(path)?;
        let document: ShelfDocument = toml::from_str(&source)
            .map_err(|err| ShelfError::new_parse_error(err.message(), err.span(), &source))?;
        debug!(items = document.items.len(); "Shelf file parsed");

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the geometry stored in the file, if any
    pub fn geometry(&self) -> Option<&ShelfConfig> {
        self.document.geometry.as_ref()
    }
}

impl ShelfStore for ShelfFile {
    fn load(&self) -> Result<Vec<RawShelfItem>, ShelfError> {
        Ok(self.document.items.clone())
    }

    fn save(&mut self, items: &[ShelfItem]) -> Result<(), ShelfError> {
        let document = ShelfDocument {
            geometry: self.document.geometry.clone(),
            items: items.iter().map(RawShelfItem::from).collect(),
        };
        let content = toml::to_string_pretty(&document)
            .map_err(|err| ShelfError::Store(err.to_string()))?;
        fs::write(&self.path, content)?;
        info!(path:% = self.path.display(), items = items.len(); "Shelf file written");

        self.document = document;
        Ok(())
    }
}
