//! Map model and persistence
//!
//! - Entity tree: cells and their attached event objects, with the
//!   coordinate index
//! - Document codec: tree to nested records and back
//! - Transport codec: records to the compact string form and back

mod document;
mod map;
mod transport;

pub use document::*;
pub use map::*;
pub use transport::*;
