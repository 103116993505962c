//! Optional JSON configuration at `<config dir>/sunclock/config.json`.
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! Command-line flags override whatever is loaded here.

use crate::error::{Result, SolarError};
use crate::event::Twilight;
use crate::location::parse_timezone;
use crate::resolver::DEFAULT_SEARCH_DAYS;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Days searched past the requested date before giving up.
    pub search_days: u32,
    /// Twilight depth for dawn and dusk.
    pub twilight: Twilight,
    /// IANA zone used when neither a flag nor a place supplies one.
    pub default_timezone: Option<String>,
    /// Built-in place used when no location is given.
    pub default_place: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_days: DEFAULT_SEARCH_DAYS,
            twilight: Twilight::Civil,
            default_timezone: None,
            default_place: None,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sunclock").join("config.json"))
    }

    /// Load `explicit` if given (it must exist and parse), otherwise the
    /// default file if present. A broken default file is logged and ignored.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path).or_else(|e| {
                warn!(error = %e, "ignoring unreadable default config");
                Ok(Self::default())
            }),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_error = |message: String| SolarError::Config { path: path.to_path_buf(), message };
        let data = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Config = serde_json::from_str(&data).map_err(|e| config_error(e.to_string()))?;
        if config.search_days == 0 {
            return Err(config_error("search_days must be at least 1".to_string()));
        }
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// The configured default zone, validated.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.default_timezone.as_deref().map(parse_timezone).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{ "twilight": "nautical", "default_timezone": "Europe/Oslo" }"#);
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.twilight, Twilight::Nautical);
        assert_eq!(config.search_days, DEFAULT_SEARCH_DAYS);
        assert_eq!(config.port, 3000);
        assert_eq!(config.timezone().unwrap(), Some(chrono_tz::Europe::Oslo));
    }

    #[test]
    fn test_full_file_roundtrip() {
        let config = Config {
            search_days: 30,
            twilight: Twilight::Astronomical,
            default_timezone: Some("UTC".into()),
            default_place: Some("stockholm".into()),
            host: "0.0.0.0".into(),
            port: 8080,
        };
        let file = write_config(&serde_json::to_string_pretty(&config).unwrap());
        assert_eq!(Config::load_from(file.path()).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("{ search_days: ");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SolarError::Config { .. }));
        assert!(err.to_string().starts_with("config "));
    }

    #[test]
    fn test_unknown_field_and_zero_search_rejected() {
        assert!(Config::load_from(write_config(r#"{ "serach_days": 10 }"#).path()).is_err());
        assert!(Config::load_from(write_config(r#"{ "search_days": 0 }"#).path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::load(Some(&missing)), Err(SolarError::Config { .. })));
    }

    #[test]
    fn test_bad_default_timezone() {
        let config = Config { default_timezone: Some("Nowhere/Land".into()), ..Config::default() };
        assert_eq!(config.timezone(), Err(SolarError::UnknownTimezone("Nowhere/Land".into())));
    }
}
