//! Level documents
//!
//! A level is stored as a RON document made of parallel 3D layers, one per W
//! coordinate. [`LevelDocument`] is the serialized form; [`Level`] is the
//! loaded, validated form owning a [`Grid4D`].

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use slice4d_math::{IVec4, Vec4};

use crate::{ContentRegistry, Grid4D};

/// Serialized 4D level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    /// Where the player starts, in grid coordinates
    pub start_player_position: Vec4,
    /// Legacy end-of-level marker, kept for compatibility but never used
    #[serde(default)]
    pub end_level_position: Vec4,
    /// Number of collectibles needed to finish the level
    #[serde(default)]
    pub collectible_count_to_next_level: u32,
    /// File name of the level that follows this one
    #[serde(default)]
    pub next_level_file_name: String,
    /// 3D layers, each at its own W coordinate
    pub levels: Vec<LayerDocument>,
}

/// One 3D layer of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDocument {
    pub w_coordinate: i32,
    pub cells: Vec<CellDocument>,
}

/// One cell of a 3D layer; W comes from the enclosing layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDocument {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub content: String,
    #[serde(default)]
    pub info_text: Option<String>,
}

impl LevelDocument {
    /// Load a level document from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse a level document from RON text
    pub fn from_ron_str(contents: &str) -> Result<Self, LevelLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize to pretty-printed RON
    pub fn to_ron_string(&self) -> Result<String, LevelSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save the level document to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LevelSaveError> {
        let contents = self.to_ron_string()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Total number of cells across all layers
    pub fn cell_count(&self) -> usize {
        self.levels.iter().map(|layer| layer.cells.len()).sum()
    }
}

/// A malformed level
///
/// Every variant is fatal: the session must be aborted rather than run with a
/// partially loaded or empty grid.
#[derive(Debug)]
pub enum LevelLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax or structure)
    Parse(ron::error::SpannedError),
    /// A cell names content the renderer does not know
    UnknownContent {
        content: String,
        position: IVec4,
    },
    /// The document holds no cells at all
    Empty,
}

impl LevelLoadError {
    /// Load failures never leave a usable level behind
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl From<io::Error> for LevelLoadError {
    fn from(e: io::Error) -> Self {
        LevelLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelLoadError::Parse(e)
    }
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::Io(e) => write!(f, "Malformed level: IO error: {}", e),
            LevelLoadError::Parse(e) => write!(f, "Malformed level: parse error: {}", e),
            LevelLoadError::UnknownContent { content, position } => write!(
                f,
                "Malformed level: unknown content '{}' at {}",
                content, position
            ),
            LevelLoadError::Empty => write!(f, "Malformed level: level is empty"),
        }
    }
}

impl std::error::Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelLoadError::Io(e) => Some(e),
            LevelLoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Error saving a level
#[derive(Debug)]
pub enum LevelSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for LevelSaveError {
    fn from(e: io::Error) -> Self {
        LevelSaveError::Io(e)
    }
}

impl From<ron::Error> for LevelSaveError {
    fn from(e: ron::Error) -> Self {
        LevelSaveError::Serialize(e)
    }
}

impl std::fmt::Display for LevelSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelSaveError::Io(e) => write!(f, "IO error: {}", e),
            LevelSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LevelSaveError {}

/// A loaded level: the grid plus its gameplay metadata
#[derive(Debug, Clone)]
pub struct Level {
    pub grid: Grid4D,
    pub start_position: Vec4,
    /// Carried through save/load untouched
    pub end_position: Vec4,
    pub collectible_target: u32,
    pub next_level: String,
}

impl Level {
    /// Validate a document against the registry and build the grid
    pub fn from_document(
        document: &LevelDocument,
        registry: &ContentRegistry,
    ) -> Result<Self, LevelLoadError> {
        let grid = Grid4D::load(&document.levels, registry)?;
        Ok(Self {
            grid,
            start_position: document.start_player_position,
            end_position: document.end_level_position,
            collectible_target: document.collectible_count_to_next_level,
            next_level: document.next_level_file_name.clone(),
        })
    }

    /// Load and validate a level file
    pub fn load<P: AsRef<Path>>(path: P, registry: &ContentRegistry) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        let document = LevelDocument::load(path)?;
        let level = Self::from_document(&document, registry)?;
        log::info!(
            "Loaded level {:?}: {} cells, {} collectible(s) to finish",
            path,
            level.grid.len(),
            level.collectible_target
        );
        Ok(level)
    }

    /// Convert back to a document
    pub fn to_document(&self) -> LevelDocument {
        LevelDocument {
            start_player_position: self.start_position,
            end_level_position: self.end_position,
            collectible_count_to_next_level: self.collectible_target,
            next_level_file_name: self.next_level.clone(),
            levels: self.grid.dump(),
        }
    }
}
