//! mapforge - a grid-based map authoring core
//!
//! Place tiles and attached event objects (enemies, items, stairs, traps)
//! on a discretized 2D plane, enforce per-cell co-occupancy rules, edit
//! placed entities' metadata, and persist the whole structure as a
//! compact, recoverable document.
//!
//! The crate is the model layer only: it receives continuous points
//! already resolved into map-local space and hands back opaque transport
//! strings. Gesture routing, rendering and storage transport belong to
//! the host.
//!
//! ```
//! use mapforge::{Editor, Point, Profile, TileCategoryId, Tool, TransportMode};
//!
//! let mut editor = Editor::new(Profile::standard());
//! editor.set_tool(Tool::Tile(TileCategoryId(0)));
//! editor.pointer_down(Point::new(10.0, 10.0));
//! editor.pointer_move(Point::new(60.0, 10.0));
//!
//! let saved = editor.to_transport_string(TransportMode::Production).unwrap();
//! let mut restored = Editor::new(Profile::standard());
//! restored.load_transport_string(&saved, TransportMode::Production).unwrap();
//! assert_eq!(restored.map().len(), 2);
//! ```

pub mod editor;
pub mod grid;
pub mod profile;
pub mod store;
pub mod world;

pub use editor::{DetailEntry, DetailError, DetailField, DetailForm, Editor, Tool};
pub use grid::{CellCoord, Grid, Point, Side, DEFAULT_SPAN};
pub use profile::{
    AnchorKind, EventCategoryId, EventSpec, Placement, Profile, ProfileError, TileCategoryId,
    TileSpec,
};
pub use store::{MapStore, StoreError};
pub use world::{
    Cell, CellAnchor, CodecError, EventObject, Map, MapError, Record, TransportMode, UNSET_ID,
};
