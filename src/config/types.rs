use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base directory for the database and, unless absolute, the media root
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory uploaded files are stored under (in an `images/` subdirectory)
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Also remove the stored file when an image record is deleted
    #[serde(default)]
    pub remove_files_on_delete: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}
fn default_database() -> PathBuf {
    PathBuf::from("pictura.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            media_root: default_media_root(),
            database: default_database(),
            remove_files_on_delete: false,
        }
    }
}

impl StorageConfig {
    /// Media root resolved against `data_dir`.
    pub fn media_root_path(&self) -> PathBuf {
        self.data_dir.join(&self.media_root)
    }

    /// Database file resolved against `data_dir`.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Largest accepted request body on upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Number of recent images shown under the upload form
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_recent_limit() -> usize {
    6
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            recent_limit: default_recent_limit(),
        }
    }
}
