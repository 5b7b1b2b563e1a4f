use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::StoreLocation;
use crate::{Error, Result};

pub const DEFAULT_DOCUMENT_ROOT: &str = ".namebook";
pub const DEFAULT_PORT: u16 = 7878;
/// Directory under the document root that the HTTP snapshot routes read and write
pub const DEFAULT_EXCHANGE_SUBDIR: &str = "exchange";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NamebookConfig {
    pub document_root: Option<String>,
    pub db_subdir: Option<String>,
    pub db_filename: Option<String>,
    pub port: Option<u16>,
    pub exchange_dir: Option<String>,
}

impl NamebookConfig {
    /// Resolve the backing file location. `root_override` (the `--root` flag)
    /// wins over the configured document root.
    pub fn location(&self, root_override: Option<&Path>) -> StoreLocation {
        let root = root_override
            .map(Path::to_path_buf)
            .or_else(|| self.document_root.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_ROOT));

        let mut location = StoreLocation::new(root);
        if let Some(subdir) = &self.db_subdir {
            location = location.with_subdir(subdir.clone());
        }
        if let Some(filename) = &self.db_filename {
            location = location.with_name(filename.clone());
        }
        location
    }

    pub fn port(&self, port_override: Option<u16>) -> u16 {
        port_override.or(self.port).unwrap_or(DEFAULT_PORT)
    }

    /// Directory served snapshot paths are confined to. Defaults to
    /// `<document_root>/exchange` of the resolved `location`.
    pub fn exchange_dir(&self, location: &StoreLocation) -> PathBuf {
        self.exchange_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| location.document_root().join(DEFAULT_EXCHANGE_SUBDIR))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("namebook.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<NamebookConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NamebookConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NamebookConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("namebook.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("namebook.toml");
        let config = NamebookConfig {
            document_root: Some("/srv/names".to_string()),
            db_subdir: None,
            db_filename: Some("example.db".to_string()),
            port: Some(9000),
            exchange_dir: None,
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), Some(config));
    }

    #[test]
    fn test_location_precedence() {
        let config = NamebookConfig {
            document_root: Some("configured".to_string()),
            db_subdir: Some("db".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.location(None).backing_path(),
            PathBuf::from("configured/db/names.db")
        );
        assert_eq!(
            config.location(Some(Path::new("flag"))).backing_path(),
            PathBuf::from("flag/db/names.db")
        );
        assert_eq!(
            NamebookConfig::default().location(None).backing_path(),
            PathBuf::from(".namebook/SQLite/names.db")
        );
    }

    #[test]
    fn test_port_precedence() {
        let config = NamebookConfig { port: Some(9000), ..Default::default() };
        assert_eq!(config.port(None), 9000);
        assert_eq!(config.port(Some(8080)), 8080);
        assert_eq!(NamebookConfig::default().port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_exchange_dir_follows_document_root() {
        let location = NamebookConfig::default().location(Some(Path::new("flag")));
        assert_eq!(
            NamebookConfig::default().exchange_dir(&location),
            PathBuf::from("flag/exchange")
        );

        let config = NamebookConfig {
            exchange_dir: Some("/srv/drop".to_string()),
            ..Default::default()
        };
        assert_eq!(config.exchange_dir(&location), PathBuf::from("/srv/drop"));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("namebook.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));
    }
}
