//! Image service coordinating storage and database operations.
//!
//! Saving an upload writes the file first, then records it. The record's
//! `size` is read back from the stored file and its `name` falls back to the
//! uploaded file's name when none is given.

use anyhow::{Context, Result};
use pictura_common::paths::client_file_name;
use pictura_common::ImageId;
use pictura_db::models::{Image, NewImage, MAX_NAME_LEN};
use pictura_db::pool::{get_conn, DbPool};
use pictura_db::queries::images;

use super::storage::ImageStorage;

/// A file received from the upload form.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    /// File name as sent by the client.
    pub file_name: &'a str,
    /// Optional display name entered alongside the file.
    pub name: Option<&'a str>,
    pub data: &'a [u8],
}

/// High-level image service that coordinates filesystem storage with database records.
pub struct ImageService {
    storage: ImageStorage,
    pool: DbPool,
    remove_files_on_delete: bool,
}

impl ImageService {
    /// Create a new `ImageService`.
    ///
    /// Deleting a record leaves its file on disk unless
    /// [`with_file_removal`](Self::with_file_removal) is enabled.
    pub fn new(storage: ImageStorage, pool: DbPool) -> Self {
        Self {
            storage,
            pool,
            remove_files_on_delete: false,
        }
    }

    /// Also remove the stored file when a record is deleted.
    pub fn with_file_removal(mut self, enabled: bool) -> Self {
        self.remove_files_on_delete = enabled;
        self
    }

    pub fn storage(&self) -> &ImageStorage {
        &self.storage
    }

    /// Store an uploaded file and create its record.
    ///
    /// If the record cannot be inserted the stored file is removed again.
    pub fn save_upload(&self, upload: Upload<'_>) -> Result<Image> {
        let file_name = client_file_name(upload.file_name);
        if file_name.is_empty() {
            anyhow::bail!("Uploaded file has no name");
        }

        let stored = self
            .storage
            .store(file_name, upload.data)
            .context("Failed to store image to disk")?;

        let record = NewImage {
            name: display_name(upload.name, file_name),
            size: stored.size,
            path: stored.path,
        };

        match self.insert(&record) {
            Ok(image) => Ok(image),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&record.path) {
                    tracing::warn!(
                        path = %record.path,
                        error = %cleanup,
                        "Failed to remove file after insert failure"
                    );
                }
                Err(e)
            }
        }
    }

    fn insert(&self, record: &NewImage) -> Result<Image> {
        let conn = get_conn(&self.pool).context("Failed to get database connection")?;
        images::insert_image(&conn, record).context("Failed to insert image record")
    }

    /// All images, newest first.
    pub fn list_all(&self) -> Result<Vec<Image>> {
        let conn = get_conn(&self.pool).context("Failed to get database connection")?;
        Ok(images::list_images(&conn)?)
    }

    /// The `limit` newest images.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Image>> {
        let conn = get_conn(&self.pool).context("Failed to get database connection")?;
        Ok(images::list_recent_images(&conn, limit)?)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = get_conn(&self.pool).context("Failed to get database connection")?;
        Ok(images::count_images(&conn)?)
    }

    /// Delete an image record.
    ///
    /// Returns the deleted record, or `None` if no record had that ID.
    pub fn delete(&self, id: ImageId) -> Result<Option<Image>> {
        let image = {
            let conn = get_conn(&self.pool).context("Failed to get database connection")?;
            let Some(image) = images::get_image(&conn, id)? else {
                return Ok(None);
            };
            if !images::delete_image(&conn, id)? {
                return Ok(None);
            }
            image
        };

        if self.remove_files_on_delete {
            if let Err(e) = self.storage.delete(&image.path) {
                tracing::warn!(
                    image_id = %image.id,
                    path = %image.path,
                    error = %e,
                    "Record deleted but file removal failed"
                );
            }
        }

        Ok(Some(image))
    }
}

/// Pick the display name for a new record.
fn display_name(provided: Option<&str>, file_name: &str) -> String {
    let name = provided
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(file_name);
    name.chars().take(MAX_NAME_LEN).collect()
}
