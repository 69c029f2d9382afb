mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./pictura.toml",
        "./config.toml",
        "~/.config/pictura/config.toml",
        "/etc/pictura/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.upload.max_upload_bytes == 0 {
        anyhow::bail!("upload.max_upload_bytes must be greater than 0");
    }

    if config.upload.recent_limit == 0 {
        anyhow::bail!("upload.recent_limit must be greater than 0");
    }

    if !config.storage.data_dir.exists() {
        tracing::warn!(
            "Data directory does not exist yet: {:?}",
            config.storage.data_dir
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pictura.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.upload.recent_limit, 6);
        assert_eq!(config.upload.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.storage.remove_files_on_delete);
        assert_eq!(config.storage.media_root_path(), PathBuf::from("./media"));
        assert_eq!(config.storage.database_path(), PathBuf::from("./pictura.db"));
    }

    #[test]
    fn test_load_partial_config() {
        let (_dir, path) = write_config(
            r#"
[server]
port = 9090

[storage]
data_dir = "/srv/pictura"
remove_files_on_delete = true
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.storage.remove_files_on_delete);
        assert_eq!(
            config.storage.media_root_path(),
            PathBuf::from("/srv/pictura/media")
        );
        assert_eq!(config.upload.recent_limit, 6);
    }

    #[test]
    fn test_absolute_media_root_wins() {
        let (_dir, path) = write_config(
            r#"
[storage]
data_dir = "/srv/pictura"
media_root = "/mnt/photos"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.media_root_path(), PathBuf::from("/mnt/photos"));
    }

    #[test]
    fn test_zero_port_rejected() {
        let (_dir, path) = write_config("[server]\nport = 0\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_zero_recent_limit_rejected() {
        let (_dir, path) = write_config("[upload]\nrecent_limit = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let (_dir, path) = write_config("[server\nport = ");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result = load_config_or_default(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
