//! Filesystem-level storage for uploaded image files.
//!
//! Files live under `{media_root}/images/` with a random UUID name that keeps
//! the extension of the uploaded file, so client-chosen names never touch the
//! filesystem.

use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pictura_common::paths::file_extension;
use uuid::Uuid;

/// Subdirectory of the media root that uploads are written to.
pub const UPLOAD_DIR: &str = "images";

/// Location and size of a file written by [`ImageStorage::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the media root, always with `/` separators.
    pub path: String,
    /// Number of bytes on disk.
    pub size: u64,
}

/// Filesystem manager for uploaded files.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    media_root: PathBuf,
}

impl ImageStorage {
    /// Create a new `ImageStorage` rooted at `media_root`.
    pub fn new(media_root: PathBuf) -> Self {
        Self { media_root }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Write `data` to a fresh randomized path derived from `original_name`.
    ///
    /// The upload directory is created if needed. An existing file is never
    /// overwritten, and a file that could not be written completely is removed.
    pub fn store(&self, original_name: &str, data: &[u8]) -> Result<StoredFile> {
        self.store_reader(original_name, data)
    }

    fn store_reader(&self, original_name: &str, mut reader: impl Read) -> Result<StoredFile> {
        let upload_dir = self.media_root.join(UPLOAD_DIR);
        std::fs::create_dir_all(&upload_dir).with_context(|| {
            format!("Failed to create upload directory: {}", upload_dir.display())
        })?;

        let relative_path = upload_path(original_name);
        let file_path = self.full_path(&relative_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .with_context(|| format!("Failed to create image file: {}", file_path.display()))?;

        let written = std::io::copy(&mut reader, &mut file).and_then(|_| file.sync_all());
        drop(file);
        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&file_path) {
                tracing::warn!(
                    path = %file_path.display(),
                    error = %cleanup,
                    "Failed to remove partially written file"
                );
            }
            return Err(e)
                .with_context(|| format!("Failed to write image file: {}", file_path.display()));
        }

        let size = self.file_size(&relative_path)?;

        Ok(StoredFile {
            path: relative_path,
            size,
        })
    }

    /// Absolute (or data-dir relative) filesystem path of a stored file.
    pub fn full_path(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .fold(self.media_root.clone(), |path, part| path.join(part))
    }

    /// Current byte length of a stored file.
    pub fn file_size(&self, relative_path: &str) -> Result<u64> {
        let path = self.full_path(relative_path);
        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("Failed to stat image file: {}", path.display()))?;
        Ok(metadata.len())
    }

    /// Delete a stored file.
    ///
    /// Returns `Ok(false)` if the file was already gone.
    pub fn delete(&self, relative_path: &str) -> Result<bool> {
        let path = self.full_path(relative_path);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to delete image file: {}", path.display())),
        }
    }
}

/// Build a randomized storage path for an upload.
///
/// Returns `images/{uuid}.{ext}` where `{uuid}` is 32 lowercase hex digits and
/// `{ext}` is the original extension. Names without an extension get none.
pub fn upload_path(original_name: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match file_extension(original_name) {
        Some(ext) => format!("{}/{}.{}", UPLOAD_DIR, stem, ext),
        None => format!("{}/{}", UPLOAD_DIR, stem),
    }
}
