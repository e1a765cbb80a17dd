//! Sparse 4D cell grid
//!
//! Cells are stored in a map keyed by their integer coordinate, so levels may
//! use negative or widely spread coordinates without sizing a dense array.

use std::collections::{BTreeMap, HashMap};

use slice4d_math::{Axis, IVec4};

use crate::level::{CellDocument, LayerDocument, LevelLoadError};
use crate::{Cell, ContentRegistry};

/// Inclusive axis-aligned bounding box of the occupied cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds4D {
    pub min: IVec4,
    pub max: IVec4,
}

impl Bounds4D {
    /// Bounds of a single coordinate
    pub fn from_point(p: IVec4) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the bounds to include `p`
    pub fn include(&mut self, p: IVec4) {
        self.min = self.min.min_components(p);
        self.max = self.max.max_components(p);
    }

    /// Number of cells spanned along each axis
    pub fn extent(&self) -> IVec4 {
        self.max - self.min + IVec4::new(1, 1, 1, 1)
    }

    /// Largest extent over all four axes
    ///
    /// This is the side of the cubic window a section is cut from.
    pub fn world_size(&self) -> i32 {
        let extent = self.extent();
        Axis::ALL
            .into_iter()
            .map(|axis| extent.get(axis))
            .max()
            .unwrap_or(0)
    }

    /// Check whether a coordinate lies inside the bounds
    pub fn contains(&self, p: IVec4) -> bool {
        Axis::ALL
            .into_iter()
            .all(|axis| p.get(axis) >= self.min.get(axis) && p.get(axis) <= self.max.get(axis))
    }
}

/// The 4D world: at most one [`Cell`] per integer coordinate
#[derive(Clone, Debug, Default)]
pub struct Grid4D {
    cells: HashMap<IVec4, Cell>,
}

impl Grid4D {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell at a coordinate
    #[inline]
    pub fn get(&self, position: IVec4) -> Option<&Cell> {
        self.cells.get(&position)
    }

    /// Insert or overwrite the cell at a coordinate, returning the old one
    pub fn set(&mut self, position: IVec4, cell: Cell) -> Option<Cell> {
        self.cells.insert(position, cell)
    }

    /// Remove the cell at a coordinate
    pub fn clear(&mut self, position: IVec4) -> Option<Cell> {
        self.cells.remove(&position)
    }

    /// Number of stored cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over `(coordinate, cell)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (IVec4, &Cell)> {
        self.cells.iter().map(|(p, c)| (*p, c))
    }

    /// Bounding box of all stored cells, or `None` when the grid is empty
    pub fn bounds(&self) -> Option<Bounds4D> {
        let mut positions = self.cells.keys().copied();
        let first = positions.next()?;
        let mut bounds = Bounds4D::from_point(first);
        for p in positions {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Build a grid from serialized layers
    ///
    /// Fails on content unknown to `registry` and on a document with no cells.
    /// A later cell at an already occupied coordinate replaces the earlier one.
    pub fn load(layers: &[LayerDocument], registry: &ContentRegistry) -> Result<Self, LevelLoadError> {
        let mut grid = Self::new();
        for layer in layers {
            for cell in &layer.cells {
                let position = IVec4::new(cell.x, cell.y, cell.z, layer.w_coordinate);
                if !registry.contains(&cell.content) {
                    return Err(LevelLoadError::UnknownContent {
                        content: cell.content.clone(),
                        position,
                    });
                }
                let new_cell = Cell {
                    content: cell.content.clone(),
                    info_text: cell.info_text.clone(),
                };
                if let Some(old) = grid.set(position, new_cell) {
                    log::warn!(
                        "Duplicate cell at {}: '{}' replaced by '{}'",
                        position, old.content, cell.content
                    );
                }
            }
        }
        if grid.is_empty() {
            return Err(LevelLoadError::Empty);
        }
        Ok(grid)
    }

    /// Serialize into layers
    ///
    /// Layers come out in ascending W, and cells within a layer ordered by
    /// y, then x, then z, so dumps are stable across runs.
    pub fn dump(&self) -> Vec<LayerDocument> {
        let mut layers: BTreeMap<i32, Vec<(IVec4, &Cell)>> = BTreeMap::new();
        for (p, cell) in self.iter() {
            layers.entry(p.w).or_default().push((p, cell));
        }
        layers
            .into_iter()
            .map(|(w, mut cells)| {
                cells.sort_by_key(|(p, _)| (p.y, p.x, p.z));
                LayerDocument {
                    w_coordinate: w,
                    cells: cells
                        .into_iter()
                        .map(|(p, cell)| CellDocument {
                            x: p.x,
                            y: p.y,
                            z: p.z,
                            content: cell.content.clone(),
                            info_text: cell.info_text.clone(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid4D {
        let mut grid = Grid4D::new();
        grid.set(IVec4::new(0, 0, 0, 0), Cell::new("greenCube"));
        grid.set(IVec4::new(2, 0, 1, 0), Cell::new("redCube"));
        grid.set(IVec4::new(1, 1, 0, 3), Cell::new("questionMark").with_info_text("hi"));
        grid
    }

    #[test]
    fn test_get_set_clear() {
        let mut grid = Grid4D::new();
        let p = IVec4::new(1, 2, 3, 4);
        assert!(grid.get(p).is_none());

        assert!(grid.set(p, Cell::new("greenCube")).is_none());
        assert_eq!(grid.get(p).unwrap().content, "greenCube");

        let old = grid.set(p, Cell::new("redCube"));
        assert_eq!(old.unwrap().content, "greenCube");
        assert_eq!(grid.len(), 1);

        assert_eq!(grid.clear(p).unwrap().content, "redCube");
        assert!(grid.is_empty());
        assert!(grid.clear(p).is_none());
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Grid4D::new().bounds().is_none());
    }

    #[test]
    fn test_bounds_and_world_size() {
        let bounds = sample_grid().bounds().unwrap();
        assert_eq!(bounds.min, IVec4::new(0, 0, 0, 0));
        assert_eq!(bounds.max, IVec4::new(2, 1, 1, 3));
        assert_eq!(bounds.extent(), IVec4::new(3, 2, 2, 4));
        assert_eq!(bounds.world_size(), 4);
    }

    #[test]
    fn test_bounds_with_negative_coordinates() {
        let mut grid = Grid4D::new();
        grid.set(IVec4::new(-2, 0, 0, 0), Cell::new("greenCube"));
        grid.set(IVec4::new(1, 0, -1, 0), Cell::new("greenCube"));
        let bounds = grid.bounds().unwrap();
        assert_eq!(bounds.min, IVec4::new(-2, 0, -1, 0));
        assert!(bounds.contains(IVec4::new(0, 0, 0, 0)));
        assert!(!bounds.contains(IVec4::new(0, 1, 0, 0)));
        assert_eq!(bounds.world_size(), 4);
    }

    #[test]
    fn test_dump_order_is_stable() {
        let layers = sample_grid().dump();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].w_coordinate, 0);
        assert_eq!(layers[1].w_coordinate, 3);
        let contents: Vec<_> = layers[0].cells.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["greenCube", "redCube"]);
        assert_eq!(layers[1].cells[0].info_text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_load_of_dump_preserves_cells() {
        let grid = sample_grid();
        let reloaded = Grid4D::load(&grid.dump(), &ContentRegistry::standard()).unwrap();
        assert_eq!(reloaded.len(), grid.len());
        for (p, cell) in grid.iter() {
            assert_eq!(reloaded.get(p), Some(cell));
        }
    }

    #[test]
    fn test_load_later_duplicate_wins() {
        let layers = vec![LayerDocument {
            w_coordinate: 0,
            cells: vec![
                CellDocument { x: 0, y: 0, z: 0, content: "greenCube".into(), info_text: None },
                CellDocument { x: 0, y: 0, z: 0, content: "redCube".into(), info_text: None },
            ],
        }];
        let grid = Grid4D::load(&layers, &ContentRegistry::standard()).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(IVec4::ZERO).unwrap().content, "redCube");
    }

    #[test]
    fn test_load_empty_fails() {
        let err = Grid4D::load(&[], &ContentRegistry::standard()).unwrap_err();
        assert!(matches!(err, LevelLoadError::Empty));
    }
}
