//! Map entity tree
//!
//! The `Map` exclusively owns its `Cell`s, and each `Cell` owns its
//! attached `EventObject`s (which may nest to arbitrary depth). A
//! coordinate index over two disjoint namespaces (center-anchored and
//! edge-anchored) is maintained incrementally on every insert and remove;
//! it is only ever rebuilt wholesale when a saved document is decoded.
//!
//! Every mutation is total: it either fully succeeds or leaves the tree
//! untouched.

use std::collections::HashMap;

use crate::grid::{CellCoord, Grid, Point, Side};
use crate::profile::{EventCategoryId, TileCategoryId};

/// Identifier value meaning "not assigned yet".
pub const UNSET_ID: i64 = -1;

/// Where a cell sits on the grid.
///
/// The two variants form disjoint coordinate namespaces: a wall on the
/// north edge of (0, 0) never collides with a floor at (0, 0), or with a
/// wall on any other edge of the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellAnchor {
    /// Anchored at the center of the cell at this coordinate.
    Center(CellCoord),
    /// Anchored at the midpoint of one edge of the cell at `base`.
    Edge { base: CellCoord, side: Side },
}

impl CellAnchor {
    /// The anchored world position under the given grid.
    pub fn world_position(&self, grid: &Grid) -> Point {
        match *self {
            CellAnchor::Center(coord) => grid.cell_center(coord),
            CellAnchor::Edge { base, side } => grid.edge_anchor(base, side),
        }
    }

    /// Orientation angle in degrees, present only for edge anchors.
    pub fn orientation(&self) -> Option<f32> {
        match self {
            CellAnchor::Center(_) => None,
            CellAnchor::Edge { side, .. } => Some(side.orientation_degrees()),
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, CellAnchor::Edge { .. })
    }
}

/// An entity attached under a cell: enemy, item, stairs, trap, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct EventObject {
    pub category: EventCategoryId,
    /// Application-assigned identifier; carries no structural meaning.
    pub inter_id: i64,
    /// Offset from the owning cell's center, preserved through the codec.
    pub offset: Point,
    /// Reduced footprint, applied when the shrink rule matched at placement
    /// time. Presentation state; never serialized.
    pub shrunk: bool,
    children: Vec<EventObject>,
}

impl EventObject {
    pub fn new(category: EventCategoryId) -> Self {
        Self {
            category,
            inter_id: UNSET_ID,
            offset: Point::ZERO,
            shrunk: false,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[EventObject] {
        &self.children
    }

    /// Attach a nested child, after any existing ones.
    pub fn attach(&mut self, child: EventObject) {
        self.children.push(child);
    }

    /// Detach the most recently attached child, if any.
    pub fn detach_last(&mut self) -> Option<EventObject> {
        self.children.pop()
    }
}

/// A grid-anchored placement unit that may own attached event objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub category: TileCategoryId,
    pub anchor: CellAnchor,
    /// Application-assigned identifier; carries no structural meaning.
    pub inter_id: i64,
    children: Vec<EventObject>,
}

impl Cell {
    pub fn new(category: TileCategoryId, anchor: CellAnchor) -> Self {
        Self {
            category,
            anchor,
            inter_id: UNSET_ID,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[EventObject] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut EventObject> {
        self.children.get_mut(index)
    }

    /// Categories of the direct children, for constraint checks.
    pub fn child_categories(&self) -> impl Iterator<Item = EventCategoryId> + '_ {
        self.children.iter().map(|c| c.category)
    }

    /// Attach an event object, after any existing ones.
    pub fn attach(&mut self, obj: EventObject) {
        self.children.push(obj);
    }

    /// Detach the most recently attached event object, if any.
    pub fn detach_last(&mut self) -> Option<EventObject> {
        self.children.pop()
    }

    /// Destructively recreate this cell under a new category.
    ///
    /// All children are reparented onto the new cell in order; anchor and
    /// identifier carry over unchanged.
    pub fn replace_category(&mut self, category: TileCategoryId) {
        let mut next = Cell::new(category, self.anchor);
        next.inter_id = self.inter_id;
        next.children = std::mem::take(&mut self.children);
        *self = next;
    }
}

/// Error raised by direct tree mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A cell already occupies that anchored position.
    DuplicateCoordinate(CellAnchor),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::DuplicateCoordinate(anchor) => {
                write!(f, "a cell already occupies {:?}", anchor)
            }
        }
    }
}

impl std::error::Error for MapError {}

/// The root ownership boundary: all placed cells, in insertion order, plus
/// the coordinate index.
#[derive(Debug, Clone, Default)]
pub struct Map {
    cells: Vec<Cell>,
    index: HashMap<CellAnchor, usize>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cells, in insertion order. This order is what the codec
    /// serializes, so it is part of the persistence contract.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, anchor: CellAnchor) -> bool {
        self.index.contains_key(&anchor)
    }

    /// Look up the center-anchored cell at a discrete coordinate.
    pub fn find_cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.find_anchor(CellAnchor::Center(coord))
    }

    pub fn find_cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.find_anchor_mut(CellAnchor::Center(coord))
    }

    pub fn find_anchor(&self, anchor: CellAnchor) -> Option<&Cell> {
        self.index.get(&anchor).map(|&slot| &self.cells[slot])
    }

    pub fn find_anchor_mut(&mut self, anchor: CellAnchor) -> Option<&mut Cell> {
        let slot = *self.index.get(&anchor)?;
        Some(&mut self.cells[slot])
    }

    /// Insert a cell, failing without effect if its anchored position is
    /// already occupied.
    pub fn insert_cell(&mut self, cell: Cell) -> Result<(), MapError> {
        let anchor = cell.anchor;
        if self.index.contains_key(&anchor) {
            return Err(MapError::DuplicateCoordinate(anchor));
        }
        self.index.insert(anchor, self.cells.len());
        self.cells.push(cell);
        Ok(())
    }

    /// Remove and return the cell at an anchored position.
    pub fn remove_at(&mut self, anchor: CellAnchor) -> Option<Cell> {
        let slot = self.index.remove(&anchor)?;
        let cell = self.cells.remove(slot);
        // Later cells shifted down by one; patch the index in place.
        for entry in self.index.values_mut() {
            if *entry > slot {
                *entry -= 1;
            }
        }
        Some(cell)
    }

    /// Attach an event object to the cell at `anchor`. Returns false (and
    /// changes nothing) if no such cell exists.
    pub fn attach_at(&mut self, anchor: CellAnchor, obj: EventObject) -> bool {
        match self.find_anchor_mut(anchor) {
            Some(cell) => {
                cell.attach(obj);
                true
            }
            None => false,
        }
    }

    /// Detach the most recently attached object from the cell at `anchor`.
    pub fn detach_last_at(&mut self, anchor: CellAnchor) -> Option<EventObject> {
        self.find_anchor_mut(anchor)?.detach_last()
    }

    /// Find the wall whose geometric footprint contains `point`.
    ///
    /// Walls anchor off-grid, so removal cannot find them by snapped
    /// coordinate; instead each wall claims a rectangle centered on its
    /// anchored position, half a span long along its edge and half the edge
    /// offset thick across it.
    pub fn hit_test_wall(&self, point: Point, grid: &Grid) -> Option<CellAnchor> {
        let long = grid.span * 0.5;
        let thick = grid.edge_offset * 0.5;
        self.cells.iter().find_map(|cell| {
            let CellAnchor::Edge { side, .. } = cell.anchor else {
                return None;
            };
            let pos = cell.anchor.world_position(grid);
            let dx = (point.x - pos.x).abs();
            let dy = (point.y - pos.y).abs();
            let hit = match side {
                Side::North | Side::South => dx <= long && dy <= thick,
                Side::East | Side::West => dx <= thick && dy <= long,
            };
            hit.then_some(cell.anchor)
        })
    }

    /// Drop every cell. Used when the host discards a saved map.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.index.clear();
    }
}
