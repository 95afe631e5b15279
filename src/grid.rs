//! Grid coordinate math
//!
//! Converts continuous map-local points into discrete cell coordinates and
//! resolves edge-anchored (wall) placement from a raw pointer position.
//! Everything here is a pure function of its inputs; the `Grid` struct only
//! carries the span configuration.

use serde::{Serialize, Deserialize};

/// Default cell span in map units.
pub const DEFAULT_SPAN: f32 = 50.0;

/// A continuous 2D point in map-local space.
///
/// The gesture/view layer resolves screen input into this space before the
/// core ever sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A discrete cell coordinate, in grid-span units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub i: i32,
    pub j: i32,
}

impl CellCoord {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }
}

/// The four edges a wall-like cell can anchor to.
///
/// Each side carries a fixed orientation angle and an offset direction from
/// the supporting cell's center toward the edge midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// Classify an `atan2(dx, dy)` angle in degrees into a side.
    ///
    /// Quadrants are closed on the upper bound and open on the lower:
    /// `(-45, 45]` is North, `(45, 135]` is East, `(-135, -45]` is West,
    /// everything else is South.
    pub fn from_angle(deg: f32) -> Side {
        if deg > -45.0 && deg <= 45.0 {
            Side::North
        } else if deg > 45.0 && deg <= 135.0 {
            Side::East
        } else if deg > -135.0 && deg <= -45.0 {
            Side::West
        } else {
            Side::South
        }
    }

    /// The orientation angle of a wall anchored to this side, in degrees.
    pub fn orientation_degrees(&self) -> f32 {
        match self {
            Side::North => 0.0,
            Side::East => -90.0,
            Side::West => 90.0,
            Side::South => 180.0,
        }
    }

    /// Recover a side from a stored orientation angle.
    pub fn from_orientation(deg: f64) -> Option<Side> {
        match deg.round() as i64 {
            0 => Some(Side::North),
            -90 => Some(Side::East),
            90 => Some(Side::West),
            180 | -180 => Some(Side::South),
            _ => None,
        }
    }

    /// Unit offset direction from a cell center toward this side's edge.
    pub fn unit_offset(&self) -> (f32, f32) {
        match self {
            Side::North => (0.0, 1.0),
            Side::East => (1.0, 0.0),
            Side::South => (0.0, -1.0),
            Side::West => (-1.0, 0.0),
        }
    }
}

/// Grid configuration: the cell span and the edge-anchor offset.
///
/// The edge offset is a separate constant rather than computed at the call
/// sites so deployments with non-square wall art can tune it independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Cell size, in the same units as input points.
    pub span: f32,
    /// Distance from a cell center to an anchored wall, normally span / 2.
    pub edge_offset: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_SPAN)
    }
}

impl Grid {
    pub fn new(span: f32) -> Self {
        Self {
            span,
            edge_offset: span * 0.5,
        }
    }

    /// Snap a continuous point to the nearest discrete cell coordinate.
    ///
    /// Each axis divides by the span, truncates toward zero, then rounds the
    /// remainder: magnitude >= span/2 rounds away from zero, anything less
    /// truncates. Ties land away from zero on both signs. Stored maps depend
    /// on these exact boundaries, so they must not drift.
    pub fn snap(&self, point: Point) -> CellCoord {
        CellCoord::new(
            snap_axis(point.x, self.span),
            snap_axis(point.y, self.span),
        )
    }

    /// World position of a cell center.
    pub fn cell_center(&self, coord: CellCoord) -> Point {
        Point::new(coord.i as f32 * self.span, coord.j as f32 * self.span)
    }

    /// World position of a wall anchored to `side` of the cell at `base`.
    pub fn edge_anchor(&self, base: CellCoord, side: Side) -> Point {
        let center = self.cell_center(base);
        let (ux, uy) = side.unit_offset();
        Point::new(
            center.x + ux * self.edge_offset,
            center.y + uy * self.edge_offset,
        )
    }

    /// Which side of the cell at `center` a raw point falls toward.
    ///
    /// Computes `atan2(dx, dy)` of the vector from the cell center to the
    /// point and classifies its quadrant.
    pub fn resolve_side(&self, point: Point, center: Point) -> Side {
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        Side::from_angle(dx.atan2(dy).to_degrees())
    }
}

fn snap_axis(v: f32, span: f32) -> i32 {
    let r = v % span;
    let base = (v / span).trunc() as i32;
    if r >= span * 0.5 {
        base + 1
    } else if r <= -(span * 0.5) {
        base - 1
    } else {
        base
    }
}
