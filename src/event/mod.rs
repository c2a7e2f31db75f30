//! Event model.
//!
//! The canonical shape of one logged measurement:
//! - Dataspace normalisation and index resolution
//! - Typed property values and the common-property schema
//! - Identity hashing (excludes time and count)
//! - Compact JSON encoding for indexing

pub mod dataspace;
pub mod encoding;
pub mod model;
pub mod schema;

pub use dataspace::*;
pub use model::*;
pub use schema::*;
