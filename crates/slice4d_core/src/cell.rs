//! Grid cell contents

use serde::{Serialize, Deserialize};

/// What occupies one integer coordinate of the 4D grid
///
/// A cell's identity is its coordinate, which the [`Grid4D`](crate::Grid4D)
/// holds as the map key; the cell itself only carries content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Content identifier naming a renderable kind (looked up in the [`ContentRegistry`](crate::ContentRegistry))
    pub content: String,
    /// Text shown to the player by interactive question-mark cells
    #[serde(default)]
    pub info_text: Option<String>,
}

impl Cell {
    /// Create a cell with the given content identifier
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            info_text: None,
        }
    }

    /// Attach info text to this cell
    pub fn with_info_text(mut self, text: impl Into<String>) -> Self {
        self.info_text = Some(text.into());
        self
    }
}
