//! Map editor session
//!
//! The `Editor` is the engine facade: it owns the category profile, the
//! grid configuration, the map being authored, and the interaction state
//! (current tool, modal lock, dirty flag). All state lives on this object;
//! nothing here is a process global.
//!
//! Placement and removal follow paint semantics: invalid attempts are
//! silent no-ops so drag gestures can re-invoke them freely, and every
//! successful mutation commits atomically before the call returns.

mod detail;
mod placement;

pub use detail::{DetailEntry, DetailError, DetailField, DetailForm};

use crate::grid::{Grid, Point};
use crate::profile::{EventCategoryId, Profile, TileCategoryId};
use crate::world::{decode, deserialize, encode, serialize, CodecError, Map, TransportMode};

/// The active pointer tool. Selecting a tool decides what a pointer-down /
/// pointer-move gesture does; each category dispatches independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    /// Pointer input is ignored (e.g. the host is panning the view).
    #[default]
    Idle,
    /// Paint tiles of this category; edge-anchored categories place walls.
    Tile(TileCategoryId),
    /// Place one event object of this category per tap.
    Event(EventCategoryId),
    /// Remove the topmost object (or the cell) under the pointer.
    Remove,
    /// Open the detail view for the cell under the pointer.
    Detail,
}

/// An editing session over one map.
pub struct Editor {
    profile: Profile,
    grid: Grid,
    map: Map,
    tool: Tool,
    /// Set while a modal detail view is open; mutating entry points
    /// ignore calls until it clears.
    locked: bool,
    /// Set by every successful mutation; the host saves when it sees it.
    dirty: bool,
}

impl Editor {
    pub fn new(profile: Profile) -> Self {
        Self::with_grid(profile, Grid::default())
    }

    pub fn with_grid(profile: Profile, grid: Grid) -> Self {
        Self {
            profile,
            grid,
            map: Map::new(),
            tool: Tool::Idle,
            locked: false,
            dirty: false,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch the active tool. Ignored while the detail view is open.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.locked {
            return;
        }
        self.tool = tool;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the dirty flag. Hosts call this at gesture end to decide
    /// whether to persist.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Dispatch a pointer-down at a map-local point through the active
    /// tool. Returns a detail form when the detail tool hits a cell.
    pub fn pointer_down(&mut self, point: Point) -> Option<DetailForm> {
        match self.tool {
            Tool::Idle => None,
            Tool::Tile(category) => {
                self.paint(point, category);
                None
            }
            Tool::Event(category) => {
                self.place_event(point, category);
                None
            }
            Tool::Remove => {
                self.remove(point);
                None
            }
            Tool::Detail => self.open_detail(point),
        }
    }

    /// Dispatch a pointer-move. Only tile painting repeats during a drag;
    /// events, removal and detail act once per tap.
    pub fn pointer_move(&mut self, point: Point) {
        if let Tool::Tile(category) = self.tool {
            self.paint(point, category);
        }
    }

    fn paint(&mut self, point: Point, category: TileCategoryId) {
        match self.profile.tile(category).map(|spec| spec.anchor) {
            Some(crate::profile::AnchorKind::Edge) => self.place_wall(point, category),
            Some(crate::profile::AnchorKind::Center) => self.place_tile(point, category),
            None => log::debug!("paint with unknown tile category {}", category.0),
        }
    }

    /// Export the whole map as a transport string.
    pub fn to_transport_string(&self, mode: TransportMode) -> Result<String, CodecError> {
        serialize(&encode(&self.map, &self.grid), mode)
    }

    /// Replace the map with the contents of a transport string.
    ///
    /// All-or-nothing: on any decode failure the current map is untouched.
    /// An empty string loads an empty map.
    pub fn load_transport_string(
        &mut self,
        text: &str,
        mode: TransportMode,
    ) -> Result<(), CodecError> {
        let records = deserialize(text, mode)?;
        let map = decode(&records, &self.profile, &self.grid)?;
        log::info!("loaded map with {} cells", map.len());
        self.map = map;
        self.dirty = false;
        Ok(())
    }

    /// Discard every placed cell (the host deleted the saved map).
    pub fn clear_map(&mut self) {
        if self.locked {
            return;
        }
        self.map.clear();
        self.dirty = true;
    }
}
