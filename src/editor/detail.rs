//! Detail view editing
//!
//! Opening the detail view presents one cell and its direct children as a
//! batch of editable text fields and locks the session against placement
//! until the batch is committed or cancelled. A commit validates every
//! field as a number before applying anything: one bad field aborts the
//! whole batch with no partial state.

use crate::grid::Point;
use crate::profile::TileCategoryId;
use crate::world::CellAnchor;

use super::Editor;

/// Which attribute a detail entry edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    /// The cell's tile category (destructive replace-in-place on commit).
    Category,
    /// An attached object's identifier.
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Cell,
    Child(usize),
}

/// One editable field in the detail view.
#[derive(Debug, Clone)]
pub struct DetailEntry {
    slot: Slot,
    pub field: DetailField,
    /// Category name, for display.
    pub label: String,
    /// The editable text. Must parse as a number to commit.
    pub value: String,
}

/// The open detail view: the target cell and its editable fields.
#[derive(Debug, Clone)]
pub struct DetailForm {
    anchor: CellAnchor,
    pub entries: Vec<DetailEntry>,
}

/// Error surfaced by a failed batch commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailError {
    /// A field's text does not parse as a number. Nothing was applied;
    /// the view stays open for correction.
    InvalidIdentifier { index: usize, value: String },
}

impl std::fmt::Display for DetailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailError::InvalidIdentifier { index, value } => {
                write!(f, "field {} is not a number: {:?}", index, value)
            }
        }
    }
}

impl std::error::Error for DetailError {}

impl Editor {
    /// Open the detail view for the cell under `point`, locking the
    /// session. Returns `None` (and stays unlocked) if the session is
    /// already locked or no cell is there.
    pub fn open_detail(&mut self, point: Point) -> Option<DetailForm> {
        if self.locked {
            return None;
        }
        let coord = self.grid.snap(point);
        let cell = self.map.find_cell(coord)?;

        let tile_name = self
            .profile
            .tile(cell.category)
            .map(|spec| spec.name.clone())
            .unwrap_or_default();
        let mut entries = vec![DetailEntry {
            slot: Slot::Cell,
            field: DetailField::Category,
            label: tile_name,
            value: cell.category.0.to_string(),
        }];
        for (i, child) in cell.children().iter().enumerate() {
            let name = self
                .profile
                .event(child.category)
                .map(|spec| spec.name.clone())
                .unwrap_or_default();
            entries.push(DetailEntry {
                slot: Slot::Child(i),
                field: DetailField::Identifier,
                label: name,
                value: child.inter_id.to_string(),
            });
        }

        self.locked = true;
        Some(DetailForm { anchor: cell.anchor, entries })
    }

    /// Validate and apply a detail batch, then unlock and mark the session
    /// dirty so the host persists.
    ///
    /// All-or-nothing: if any field fails to parse, nothing is applied and
    /// the session stays locked for correction.
    pub fn commit_detail(&mut self, form: &DetailForm) -> Result<(), DetailError> {
        // Validate the whole batch before touching anything.
        let mut parsed = Vec::with_capacity(form.entries.len());
        for (index, entry) in form.entries.iter().enumerate() {
            match entry.value.trim().parse::<i64>() {
                Ok(value) => parsed.push(value),
                Err(_) => {
                    return Err(DetailError::InvalidIdentifier {
                        index,
                        value: entry.value.clone(),
                    })
                }
            }
        }

        let Some(cell) = self.map.find_anchor_mut(form.anchor) else {
            // The target can only vanish if the host bypassed the lock;
            // treat the commit as closing a stale view.
            log::warn!("detail commit on a removed cell; closing view");
            self.locked = false;
            return Ok(());
        };

        for (entry, value) in form.entries.iter().zip(parsed) {
            match entry.slot {
                Slot::Cell => {
                    let category = match u8::try_from(value) {
                        Ok(id) => TileCategoryId(id),
                        Err(_) => continue,
                    };
                    // Unknown categories leave the cell as-is, like an
                    // identifier edit that names no field.
                    if category != cell.category && self.profile.tile(category).is_some() {
                        cell.replace_category(category);
                    }
                }
                Slot::Child(i) => {
                    if let Some(child) = cell.child_mut(i) {
                        child.inter_id = value;
                    }
                }
            }
        }

        self.dirty = true;
        self.locked = false;
        Ok(())
    }

    /// Close the detail view without applying anything.
    pub fn cancel_detail(&mut self) {
        self.locked = false;
    }
}
