//! # Settings
//!
//! Environment-derived configuration.
//!
//! ## Environment Variables
//!
//! - `DISTSCAN_PYTHON`: Python executable (default: `python3`)
//! - `DISTSCAN_PATH`: site directories to search, separated like `PATH`
//!   (default: the interpreter's `sys.path`)
//! - `DISTSCAN_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
//! - `DISTSCAN_LOG_FILE`: optional file that receives a copy of the log

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use crate::logging::LogFormat;

pub const PYTHON_VAR: &str = "DISTSCAN_PYTHON";
pub const SEARCH_PATH_VAR: &str = "DISTSCAN_PATH";
pub const LOG_FORMAT_VAR: &str = "DISTSCAN_LOG_FORMAT";
pub const LOG_FILE_VAR: &str = "DISTSCAN_LOG_FILE";

const DEFAULT_PYTHON: &str = "python3";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings
{
    pub python: PathBuf,
    /// Empty means "ask the interpreter".
    pub search_paths: Vec<PathBuf>,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings
{
    fn default() -> Self
    {
        Self {
            python: PathBuf::from(DEFAULT_PYTHON),
            search_paths: Vec::new(),
            log_format: LogFormat::Pretty,
            log_file: None,
        }
    }
}

impl Settings
{
    /// Read settings from the process environment.
    ///
    /// ## Errors
    ///
    /// Returns an error if `DISTSCAN_LOG_FORMAT` holds an unknown format.
    pub fn from_env() -> Result<Self, SettingsError>
    {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut settings = Self::default();

        if let Some(python) = get(PYTHON_VAR) {
            settings.python = PathBuf::from(python);
        }
        if let Some(paths) = get(SEARCH_PATH_VAR) {
            settings.search_paths = env::split_paths(&paths)
                .filter(|path| !path.as_os_str().is_empty())
                .collect();
        }
        if let Some(format) = get(LOG_FORMAT_VAR) {
            let format = format.to_string_lossy();
            settings.log_format = LogFormat::from_str(&format).map_err(|reason| SettingsError::InvalidValue {
                key: LOG_FORMAT_VAR,
                reason,
            })?;
        }
        settings.log_file = get(LOG_FILE_VAR).map(PathBuf::from);

        Ok(settings)
    }
}

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError
{
    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue
    {
        /// Variable name
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError>
    {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), OsString::from(value)))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults()
    {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn test_reads_variables()
    {
        let joined = env::join_paths(["/opt/site-a", "/opt/site-b"]).unwrap();
        let joined = joined.to_str().unwrap().to_string();
        let settings = settings(&[
            (PYTHON_VAR, "/usr/bin/python3.12"),
            (SEARCH_PATH_VAR, &joined),
            (LOG_FORMAT_VAR, "json"),
            (LOG_FILE_VAR, "/tmp/distscan.log"),
        ])
        .unwrap();

        assert_eq!(settings.python, PathBuf::from("/usr/bin/python3.12"));
        assert_eq!(settings.search_paths, [PathBuf::from("/opt/site-a"), PathBuf::from("/opt/site-b")]);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/distscan.log")));
    }

    #[test]
    fn test_empty_values_are_unset()
    {
        let settings = settings(&[(PYTHON_VAR, ""), (SEARCH_PATH_VAR, "")]).unwrap();
        assert_eq!(settings.python, PathBuf::from(DEFAULT_PYTHON));
        assert!(settings.search_paths.is_empty());
    }

    #[test]
    fn test_invalid_log_format()
    {
        let err = settings(&[(LOG_FORMAT_VAR, "xml")]).unwrap_err();
        assert!(err.to_string().contains(LOG_FORMAT_VAR));
    }
}
