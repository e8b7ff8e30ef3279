use crate::tracker::DEFAULT_POLL_INTERVAL;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const APP_NAME: &str = "import-tracker";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL relative endpoints are resolved against, e.g. `https://idm.example/rest`.
    pub instance: Option<String>,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub trust_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            request_timeout_secs: 30,
            trust_invalid_certs: false,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads `path`, or the default location when `None`. Only an explicit path
    /// has to exist; a missing default file means default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => {
                    log::info!("No configuration directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        if !path.exists() {
            if required {
                bail!("configuration file {} does not exist", path.display());
            }
            log::info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, instance: Option<String>, poll_interval_ms: Option<u64>) {
        if instance.is_some() {
            self.instance = instance;
        }
        if let Some(poll_interval_ms) = poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
    }

    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            log::warn!(
                "poll_interval_ms must be positive, using {}ms",
                DEFAULT_POLL_INTERVAL.as_millis()
            );
            return DEFAULT_POLL_INTERVAL;
        }
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Absolute endpoints are used as given, anything else is joined onto `instance`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<String> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }
        let Some(instance) = self.instance.as_deref() else {
            bail!("endpoint {endpoint} is relative but no instance URL is configured");
        };
        Ok(format!(
            "{}/{}",
            instance.trim_end_matches('/'),
            endpoint.trim_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_poll_every_second() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert!(!config.trust_invalid_certs);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str("instance = \"https://idm.example/rest\"").unwrap();
        assert_eq!(config.instance.as_deref(), Some("https://idm.example/rest"));
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "instance = \"https://idm.example/rest\"\npoll_interval_ms = 250\ntrust_invalid_certs = true"
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert!(config.trust_invalid_certs);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");
        assert!(Config::load(Some(absent.as_path())).is_err());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = \"soon\"").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = Config::from_toml_str("poll_interval_ms = 5000").unwrap();
        config.apply_overrides(Some("https://other.example".to_string()), Some(100));
        assert_eq!(config.instance.as_deref(), Some("https://other.example"));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));

        config.apply_overrides(None, None);
        assert_eq!(config.instance.as_deref(), Some("https://other.example"));
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let config = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn resolves_endpoints() {
        let config = Config {
            instance: Some("https://idm.example/rest/".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.endpoint_url("/service/id/user/batch/full/").unwrap(),
            "https://idm.example/rest/service/id/user/batch/full"
        );
        assert_eq!(
            config.endpoint_url("http://other.example/batch/").unwrap(),
            "http://other.example/batch"
        );
        assert!(Config::default().endpoint_url("service/id/group/batch").is_err());
    }
}
