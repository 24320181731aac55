//! Settings file for the clocks
//!
//! Each clock binary stores its display settings (12/24 hour mode, canvas and
//! label tuning) as `<clock>.toml` in the platform config directory. The zone
//! list itself lives in [`crate::storage`], not here.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Why a settings file could not be read or written
#[derive(Debug)]
pub enum ConfigError {
    /// The platform has no config directory (no home directory, sandbox)
    NoConfigDir,
    /// Reading, writing or creating the directory of `path` failed
    Io { path: PathBuf, source: io::Error },
    /// `path` exists but is not a valid settings document
    Parse { path: PathBuf, source: toml::de::Error },
    /// Settings could not be rendered as TOML
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "no config directory for clock settings"),
            ConfigError::Io { path, source } => {
                write!(f, "cannot access settings file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "malformed settings file {}: {}", path.display(), source)
            }
            ConfigError::Serialize(e) => write!(f, "cannot encode settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "clock-series", "clocks")
}

/// Directory holding every clock's settings file
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Settings file of one clock
pub fn config_path(clock_name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", clock_name)))
}

/// Load the settings of `clock_name`
///
/// `Ok(None)` means the clock has never saved settings.
pub fn load_config<T: DeserializeOwned>(clock_name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(clock_name).ok_or(ConfigError::NoConfigDir)?;
    load_from(&path)
}

pub fn save_config<T: Serialize>(clock_name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(clock_name).ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)?;
    tracing::debug!(clock = clock_name, path = %path.display(), "saved config");
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path)(e)),
    };
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

fn save_to<T: Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error(path))?;
    }
    fs::write(path, contents).map_err(io_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestConfig {
        name: String,
        value: i32,
    }

    #[test]
    fn test_config_path() {
        if let Some(path) = config_path("test_clock") {
            assert!(path.to_string_lossy().contains("test_clock.toml"));
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clock.toml");
        let config = TestConfig {
            name: "world".to_string(),
            value: 7,
        };

        save_to(&path, &config).unwrap();
        let loaded: Option<TestConfig> = load_from(&path).unwrap();
        assert_eq!(loaded, Some(config));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<TestConfig> = load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "name = [").unwrap();
        let result: Result<Option<TestConfig>, _> = load_from(&path);
        match result {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unwritable_path_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("clock.toml");

        let config = TestConfig {
            name: "world".to_string(),
            value: 1,
        };
        let err = save_to(&path, &config).unwrap_err();
        assert!(matches!(&err, ConfigError::Io { path: reported, .. } if *reported == path));
        assert!(err.to_string().contains("clock.toml"));
    }
}
