//! Database query modules.
//!
//! - images: image record insert, lookup, listing and delete

pub mod images;
