use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sample_index::{SupportedKinds, DEFAULT_URL_PREFIX, KNOWN_EXTENSIONS};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const SERVER_CONFIG_FILENAME: &str = "mass-spec.json";
pub const CONFIG_HOME_ENV: &str = "MASS_SPEC_HOME";
pub const DEFAULT_LOG_FILTER: &str = "sample_index=info,mass_spec_server=info";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory holding the result files.
    pub data_dir: PathBuf,
    /// Journal workbook (`.xlsx`, `.xls`), CSV export or JSON cache.
    /// Relative paths resolve against `data_dir`; an empty path disables the
    /// journal.
    pub journal_path: PathBuf,
    /// Prefix under which result files are served to clients.
    pub url_prefix: String,
    pub bind_addr: String,
    pub refresh_interval_secs: u64,
    pub supported_extensions: Vec<String>,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/data/windows"),
            journal_path: PathBuf::from("lab_journal.xlsx"),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            refresh_interval_secs: 300,
            supported_extensions: KNOWN_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("data_dir must not be empty".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::InvalidInput(
                "refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        self.socket_addr()?;
        self.supported_kinds()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> CoreResult<SocketAddr> {
        self.bind_addr.parse().map_err(|error| {
            CoreError::InvalidInput(format!("invalid bind_addr {}: {error}", self.bind_addr))
        })
    }

    pub fn supported_kinds(&self) -> CoreResult<SupportedKinds> {
        Ok(SupportedKinds::from_extensions(&self.supported_extensions)?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Journal location with relative paths resolved against `data_dir`.
    pub fn resolved_journal_path(&self) -> Option<PathBuf> {
        if self.journal_path.as_os_str().is_empty() {
            return None;
        }
        if self.journal_path.is_absolute() {
            Some(self.journal_path.clone())
        } else {
            Some(self.data_dir.join(&self.journal_path))
        }
    }
}

/// Directory holding the configuration file, from `MASS_SPEC_HOME` or the
/// current directory.
pub fn config_home() -> PathBuf {
    std::env::var_os(CONFIG_HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn server_config_path(dir: &Path) -> PathBuf {
    dir.join(SERVER_CONFIG_FILENAME)
}

/// Loads the configuration from `dir`, writing the defaults first when the
/// file does not exist yet. Missing fields take their default values.
pub fn load_or_create_server_config(dir: &Path) -> CoreResult<ServerConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        CoreError::Internal(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = server_config_path(dir);
    if !path.exists() {
        let config = ServerConfig::default();
        write_server_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        CoreError::Internal(format!(
            "failed to read server config {}: {error}",
            path.display()
        ))
    })?;
    let config: ServerConfig = serde_json::from_str(&data).map_err(|error| {
        CoreError::InvalidInput(format!(
            "failed to parse server config {}: {error}",
            path.display()
        ))
    })?;
    config.validate()?;
    Ok(config)
}

pub fn write_server_config(path: &Path, config: &ServerConfig) -> CoreResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        CoreError::Internal(format!("failed to serialize server config: {error}"))
    })?;
    std::fs::write(path, data).map_err(|error| {
        CoreError::Internal(format!(
            "failed to write server config {}: {error}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempdir().expect("tempdir");
        let config = load_or_create_server_config(dir.path()).expect("config");
        assert!(server_config_path(dir.path()).exists());
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.url_prefix, "/data/");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(
            server_config_path(dir.path()),
            r#"{ "data_dir": "/srv/graphs", "supported_extensions": ["png", "pdf"] }"#,
        )
        .expect("write");

        let config = load_or_create_server_config(dir.path()).expect("config");
        assert_eq!(config.data_dir, PathBuf::from("/srv/graphs"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        let kinds = config.supported_kinds().expect("kinds");
        assert!(kinds.kind_of("csv").is_none());
        assert!(kinds.kind_of("png").is_some());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = ServerConfig::default();
        config.refresh_interval_secs = 0;
        assert!(matches!(config.validate(), Err(CoreError::InvalidInput(_))));

        let mut config = ServerConfig::default();
        config.supported_extensions = vec!["docx".to_string()];
        assert!(matches!(config.validate(), Err(CoreError::InvalidInput(_))));

        let mut config = ServerConfig::default();
        config.bind_addr = "not an address".to_string();
        assert!(matches!(config.validate(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn journal_path_resolves_against_data_dir() {
        let mut config = ServerConfig {
            data_dir: PathBuf::from("/srv/data"),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.resolved_journal_path(),
            Some(PathBuf::from("/srv/data/lab_journal.xlsx"))
        );

        config.journal_path = PathBuf::from("/etc/journal.json");
        assert_eq!(
            config.resolved_journal_path(),
            Some(PathBuf::from("/etc/journal.json"))
        );

        config.journal_path = PathBuf::new();
        assert_eq!(config.resolved_journal_path(), None);
    }
}
