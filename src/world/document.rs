//! Map document records
//!
//! The persisted form of a map is a sequence of nested records, one per
//! cell or event object, in attachment order:
//!
//! ```json
//! [{"id": -1, "type": 0, "position": {"x": 0.0, "y": 50.0}, "children": []}]
//! ```
//!
//! `angle` appears only on edge-anchored (wall) cells. The record shape is
//! a compatibility contract with existing saved maps and must not change.

use serde::{Serialize, Deserialize};

use crate::grid::{CellCoord, Grid, Point, Side};
use crate::profile::{AnchorKind, EventCategoryId, Profile, TileCategoryId};
use super::map::{Cell, CellAnchor, EventObject, Map};

/// Position of a record in world units (cell coordinate times span).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocPosition {
    pub x: f64,
    pub y: f64,
}

/// One persisted cell or event object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default = "unset_id")]
    pub id: i64,
    #[serde(rename = "type")]
    pub category: u8,
    pub position: DocPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default)]
    pub children: Vec<Record>,
}

fn unset_id() -> i64 {
    super::map::UNSET_ID
}

/// Error raised while decoding a document or its transport form. Loading
/// is all-or-nothing: on any of these the caller's map is left untouched.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    Encoding(base64::DecodeError),
    Compression(String),
    UnknownTileCategory(u8),
    UnknownEventCategory(u8),
    /// Edge-anchored record without an angle field.
    MissingOrientation(u8),
    /// Angle that does not name one of the four sides.
    InvalidOrientation(f64),
    /// Two records occupy the same anchored position.
    DuplicateCoordinate,
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(e: base64::DecodeError) -> Self {
        CodecError::Encoding(e)
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Json(e) => write!(f, "document parse error: {}", e),
            CodecError::Encoding(e) => write!(f, "transport encoding error: {}", e),
            CodecError::Compression(e) => write!(f, "transport compression error: {}", e),
            CodecError::UnknownTileCategory(id) => {
                write!(f, "unknown tile category {} in document", id)
            }
            CodecError::UnknownEventCategory(id) => {
                write!(f, "unknown event category {} in document", id)
            }
            CodecError::MissingOrientation(id) => {
                write!(f, "edge-anchored tile category {} is missing its angle", id)
            }
            CodecError::InvalidOrientation(deg) => {
                write!(f, "angle {} does not name a cell edge", deg)
            }
            CodecError::DuplicateCoordinate => {
                write!(f, "document places two cells on the same coordinate")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode a map into its document form. Walks depth-first; sibling order is
/// attachment order.
pub fn encode(map: &Map, grid: &Grid) -> Vec<Record> {
    map.cells()
        .iter()
        .map(|cell| {
            let pos = cell.anchor.world_position(grid);
            Record {
                id: cell.inter_id,
                category: cell.category.0,
                position: DocPosition { x: pos.x as f64, y: pos.y as f64 },
                angle: cell.anchor.orientation().map(|deg| deg as f64),
                children: cell.children().iter().map(encode_object).collect(),
            }
        })
        .collect()
}

fn encode_object(obj: &EventObject) -> Record {
    Record {
        id: obj.inter_id,
        category: obj.category.0,
        position: DocPosition {
            x: obj.offset.x as f64,
            y: obj.offset.y as f64,
        },
        angle: None,
        children: obj.children().iter().map(encode_object).collect(),
    }
}

/// Decode a document into a fresh map, rebuilding the coordinate index as
/// each cell is inserted. Categories are validated against the profile.
pub fn decode(records: &[Record], profile: &Profile, grid: &Grid) -> Result<Map, CodecError> {
    let mut map = Map::new();
    for record in records {
        let cell = decode_cell(record, profile, grid)?;
        map.insert_cell(cell).map_err(|_| CodecError::DuplicateCoordinate)?;
    }
    Ok(map)
}

fn decode_cell(record: &Record, profile: &Profile, grid: &Grid) -> Result<Cell, CodecError> {
    let category = TileCategoryId(record.category);
    let spec = profile
        .tile(category)
        .ok_or(CodecError::UnknownTileCategory(record.category))?;

    let anchor = match spec.anchor {
        AnchorKind::Center => CellAnchor::Center(coord_from_position(record.position, grid)),
        AnchorKind::Edge => {
            let angle = record
                .angle
                .ok_or(CodecError::MissingOrientation(record.category))?;
            let side =
                Side::from_orientation(angle).ok_or(CodecError::InvalidOrientation(angle))?;
            let (ux, uy) = side.unit_offset();
            let center = DocPosition {
                x: record.position.x - (ux * grid.edge_offset) as f64,
                y: record.position.y - (uy * grid.edge_offset) as f64,
            };
            CellAnchor::Edge { base: coord_from_position(center, grid), side }
        }
    };

    let mut cell = Cell::new(category, anchor);
    cell.inter_id = record.id;
    for child in &record.children {
        cell.attach(decode_object(child, profile)?);
    }
    Ok(cell)
}

fn decode_object(record: &Record, profile: &Profile) -> Result<EventObject, CodecError> {
    let category = EventCategoryId(record.category);
    if profile.event(category).is_none() {
        return Err(CodecError::UnknownEventCategory(record.category));
    }

    let mut obj = EventObject::new(category);
    obj.inter_id = record.id;
    obj.offset = Point::new(record.position.x as f32, record.position.y as f32);
    for child in &record.children {
        obj.attach(decode_object(child, profile)?);
    }
    Ok(obj)
}

fn coord_from_position(pos: DocPosition, grid: &Grid) -> CellCoord {
    CellCoord::new(
        (pos.x / grid.span as f64).round() as i32,
        (pos.y / grid.span as f64).round() as i32,
    )
}
