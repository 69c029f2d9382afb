//! Uploaded image storage and management.
//!
//! [`ImageStorage`] owns the files under the media root; [`ImageService`]
//! pairs it with the `pictura_db` records so callers never touch one
//! without the other.

mod service;
mod storage;

pub use service::{ImageService, Upload};
pub use storage::{upload_path, ImageStorage, StoredFile, UPLOAD_DIR};
