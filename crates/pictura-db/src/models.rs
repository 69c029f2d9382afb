//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use pictura_common::ImageId;
use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of an image's display name.
pub const MAX_NAME_LEN: usize = 255;

/// A stored image record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    /// Display name. Defaults to the uploaded file's original name.
    pub name: String,
    /// Location of the stored file, relative to the media root.
    pub path: String,
    /// Byte length of the stored file as of the last save.
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a new image record.
///
/// `id` and `created_at` are assigned by the database layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub name: String,
    pub path: String,
    pub size: u64,
}
