//! Placement and removal operations
//!
//! Every operation here snaps the incoming point itself, checks the
//! session lock first, and treats constraint violations as silent no-ops:
//! drag gestures re-invoke these constantly, so "already placed" and
//! "not allowed here" are normal traffic, not failures. Repeating any
//! placement with identical arguments changes nothing.

use crate::grid::Point;
use crate::profile::{AnchorKind, EventCategoryId, Placement, TileCategoryId};
use crate::world::{Cell, CellAnchor, EventObject};

use super::Editor;

impl Editor {
    /// Place a center-anchored tile at the cell under `point`.
    ///
    /// No-op if the session is locked, the category is unknown or
    /// edge-anchored (see [`Editor::place_wall`]), or the cell is taken.
    pub fn place_tile(&mut self, point: Point, category: TileCategoryId) {
        if self.locked {
            return;
        }
        let Some(spec) = self.profile.tile(category) else {
            log::debug!("place_tile: unknown tile category {}", category.0);
            return;
        };
        if spec.anchor != AnchorKind::Center {
            log::debug!("place_tile: category {} anchors to an edge", category.0);
            return;
        }

        let anchor = CellAnchor::Center(self.grid.snap(point));
        if self.map.contains(anchor) {
            return;
        }
        // Cannot collide: checked above.
        let _ = self.map.insert_cell(Cell::new(category, anchor));
        self.dirty = true;
    }

    /// Place an edge-anchored (wall) tile against the cell under `point`,
    /// on whichever of its four edges the point falls toward.
    ///
    /// No-op without a supporting center-anchored cell, or if that edge
    /// slot is already occupied.
    pub fn place_wall(&mut self, point: Point, category: TileCategoryId) {
        if self.locked {
            return;
        }
        let Some(spec) = self.profile.tile(category) else {
            log::debug!("place_wall: unknown tile category {}", category.0);
            return;
        };
        if spec.anchor != AnchorKind::Edge {
            log::debug!("place_wall: category {} anchors to a center", category.0);
            return;
        }

        let base = self.grid.snap(point);
        if self.map.find_cell(base).is_none() {
            log::debug!("place_wall: no supporting cell at ({}, {})", base.i, base.j);
            return;
        }

        let side = self.grid.resolve_side(point, self.grid.cell_center(base));
        let anchor = CellAnchor::Edge { base, side };
        if self.map.contains(anchor) {
            return;
        }
        let _ = self.map.insert_cell(Cell::new(category, anchor));
        self.dirty = true;
    }

    /// Attach an event object to the cell under `point`.
    ///
    /// No-op if there is no cell, the cell's category forbids attachments,
    /// or the catalog blocks the combination. When the shrink rule matches
    /// instead, the object is attached with the reduced footprint.
    pub fn place_event(&mut self, point: Point, category: EventCategoryId) {
        if self.locked {
            return;
        }
        if self.profile.event(category).is_none() {
            log::debug!("place_event: unknown event category {}", category.0);
            return;
        }

        let coord = self.grid.snap(point);
        let Some(cell) = self.map.find_cell(coord) else {
            return;
        };
        let solid = self
            .profile
            .tile(cell.category)
            .map(|spec| spec.solid)
            .unwrap_or(true);
        if solid {
            return;
        }

        // Block check strictly before shrink check.
        if self.profile.can_place(cell.child_categories(), category) == Placement::Blocked {
            log::debug!("place_event: category {} blocked at ({}, {})", category.0, coord.i, coord.j);
            return;
        }
        let shrunk = self.profile.needs_shrink(cell.child_categories(), category);

        if let Some(cell) = self.map.find_cell_mut(coord) {
            let mut obj = EventObject::new(category);
            obj.shrunk = shrunk;
            cell.attach(obj);
            self.dirty = true;
        }
    }

    /// Remove one level under `point`: the most recently attached event
    /// object if the cell has any, otherwise the cell itself. Walls are
    /// matched by their geometric footprint since they anchor off-grid.
    pub fn remove(&mut self, point: Point) {
        if self.locked {
            return;
        }

        let center = CellAnchor::Center(self.grid.snap(point));
        let anchor = if self.map.contains(center) {
            center
        } else {
            match self.map.hit_test_wall(point, &self.grid) {
                Some(anchor) => anchor,
                None => return,
            }
        };

        if self.map.detach_last_at(anchor).is_none() {
            self.map.remove_at(anchor);
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;
    use crate::grid::CellCoord;
    use crate::profile::Profile;

    const FLOOR: TileCategoryId = TileCategoryId(0);
    const WALL: TileCategoryId = TileCategoryId(1);
    const WATER: TileCategoryId = TileCategoryId(2);
    const ENEMY: EventCategoryId = EventCategoryId(0);
    const ITEM: EventCategoryId = EventCategoryId(1);
    const STAIRS: EventCategoryId = EventCategoryId(2);

    fn editor() -> Editor {
        Editor::new(Profile::standard())
    }

    #[test]
    fn test_place_tile_snaps_and_inserts() {
        let mut ed = editor();
        ed.place_tile(Point::new(74.0, -26.0), FLOOR);

        let cell = ed.map().find_cell(CellCoord::new(1, -1)).unwrap();
        assert_eq!(cell.category, FLOOR);
        assert_eq!(cell.inter_id, -1);
    }

    #[test]
    fn test_place_tile_is_idempotent() {
        let mut ed = editor();
        ed.place_tile(Point::new(10.0, 10.0), FLOOR);
        ed.place_tile(Point::new(10.0, 10.0), FLOOR);
        // A different category on the same cell is also a no-op.
        ed.place_tile(Point::new(12.0, 8.0), WATER);

        assert_eq!(ed.map().len(), 1);
        assert_eq!(
            ed.map().find_cell(CellCoord::new(0, 0)).unwrap().category,
            FLOOR
        );
    }

    #[test]
    fn test_place_wall_requires_support() {
        let mut ed = editor();
        // No floor yet: nothing happens.
        ed.place_wall(Point::new(10.0, 0.0), WALL);
        assert!(ed.map().is_empty());

        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        // Point east of the cell center anchors the east edge.
        ed.place_wall(Point::new(15.0, 2.0), WALL);

        assert_eq!(ed.map().len(), 2);
        let anchor = CellAnchor::Edge {
            base: CellCoord::new(0, 0),
            side: crate::grid::Side::East,
        };
        assert!(ed.map().contains(anchor));
    }

    #[test]
    fn test_place_wall_is_idempotent_per_edge() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_wall(Point::new(15.0, 0.0), WALL);
        ed.place_wall(Point::new(18.0, 1.0), WALL);
        assert_eq!(ed.map().len(), 2);

        // A different edge of the same cell is a new slot.
        ed.place_wall(Point::new(0.0, 15.0), WALL);
        assert_eq!(ed.map().len(), 3);
    }

    #[test]
    fn test_place_event_needs_a_cell() {
        let mut ed = editor();
        ed.place_event(Point::new(0.0, 0.0), ENEMY);
        assert!(ed.map().is_empty());
    }

    #[test]
    fn test_solid_cells_forbid_attachments() {
        // A solid center-anchored category rejects all attachments.
        let ron = r#"(
            name: "solid-center",
            tiles: [(id: 0, name: "rock", solid: true)],
            events: [(id: 0, name: "enemy")],
        )"#;
        let mut solid_ed = Editor::new(Profile::from_ron_str(ron).unwrap());
        solid_ed.place_tile(Point::new(0.0, 0.0), TileCategoryId(0));
        solid_ed.place_event(Point::new(0.0, 0.0), EventCategoryId(0));

        let cell = solid_ed.map().find_cell(CellCoord::new(0, 0)).unwrap();
        assert!(cell.children().is_empty());
    }

    #[test]
    fn test_constraint_blocking() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_event(Point::new(0.0, 0.0), STAIRS);
        // Item is blocked by stairs: no child added.
        ed.place_event(Point::new(0.0, 0.0), ITEM);

        let cell = ed.map().find_cell(CellCoord::new(0, 0)).unwrap();
        assert_eq!(cell.children().len(), 1);
        assert_eq!(cell.children()[0].category, STAIRS);
    }

    #[test]
    fn test_constraint_shrink() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_event(Point::new(0.0, 0.0), ENEMY);
        // Item next to an enemy is allowed, but shrunk.
        ed.place_event(Point::new(0.0, 0.0), ITEM);

        let cell = ed.map().find_cell(CellCoord::new(0, 0)).unwrap();
        assert_eq!(cell.children().len(), 2);
        assert!(!cell.children()[0].shrunk);
        assert!(cell.children()[1].shrunk);
    }

    #[test]
    fn test_remove_is_shallow_lifo() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_event(Point::new(0.0, 0.0), ENEMY);
        ed.place_event(Point::new(0.0, 0.0), ITEM);

        // First removal pops the item (most recent), keeps the cell.
        ed.remove(Point::new(0.0, 0.0));
        let cell = ed.map().find_cell(CellCoord::new(0, 0)).unwrap();
        assert_eq!(cell.children().len(), 1);
        assert_eq!(cell.children()[0].category, ENEMY);

        // Second removal pops the enemy.
        ed.remove(Point::new(0.0, 0.0));
        assert!(ed.map().find_cell(CellCoord::new(0, 0)).unwrap().children().is_empty());

        // Third removal deletes the cell itself.
        ed.remove(Point::new(0.0, 0.0));
        assert!(ed.map().is_empty());
    }

    #[test]
    fn test_remove_hits_walls_by_footprint() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_wall(Point::new(2.0, 15.0), WALL);
        assert_eq!(ed.map().len(), 2);

        // The north wall strip sits at (0, 25). This point snaps to the
        // empty cell (0, 1), so only the footprint test can find the wall.
        ed.remove(Point::new(10.0, 28.0));
        assert_eq!(ed.map().len(), 1);
        assert!(ed.map().find_cell(CellCoord::new(0, 0)).is_some());
    }

    #[test]
    fn test_remove_empty_space_is_a_no_op() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.remove(Point::new(500.0, 500.0));
        assert_eq!(ed.map().len(), 1);
    }

    #[test]
    fn test_locked_session_ignores_mutations() {
        let mut ed = editor();
        ed.place_tile(Point::new(0.0, 0.0), FLOOR);
        ed.place_event(Point::new(0.0, 0.0), ENEMY);
        ed.take_dirty();

        // Opening the detail view locks the session.
        ed.set_tool(crate::editor::Tool::Detail);
        let form = ed.pointer_down(Point::new(0.0, 0.0));
        assert!(form.is_some());
        assert!(ed.is_locked());

        ed.place_tile(Point::new(60.0, 0.0), FLOOR);
        ed.place_event(Point::new(0.0, 0.0), ITEM);
        ed.remove(Point::new(0.0, 0.0));

        assert_eq!(ed.map().len(), 1);
        assert_eq!(
            ed.map().find_cell(CellCoord::new(0, 0)).unwrap().children().len(),
            1
        );
        assert!(!ed.is_dirty());
    }
}
