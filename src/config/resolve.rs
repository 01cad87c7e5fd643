//! Config file resolution: path computation, env override, persist-on-missing.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;

use super::defaults::{DEFAULT_CONFIG_YAML, defaults};
use super::map::ConfigMap;

/// Environment variable that replaces the computed config-file path outright.
pub const CONFIG_FILE_ENV: &str = "TAKHUB_CONFIG_FILE";

/// File name looked up inside the data folder.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Resolve configuration for this process: defaults, then the on-disk file,
/// with [`CONFIG_FILE_ENV`] overriding the file's location.
pub fn resolve() -> Result<ConfigMap, BootstrapError> {
    let file_override = env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
    resolve_from(file_override.as_deref())
}

/// Internal resolver — accepts an explicit file path instead of reading the
/// environment. Tests pass the override directly instead of mutating env vars.
///
/// If no file exists at the resolved path, the compiled-in defaults are
/// persisted there (creating the containing directory if needed) and returned
/// unchanged. Otherwise the file is parsed and shallow-merged over the
/// defaults, file keys winning.
pub fn resolve_from(file_override: Option<&Path>) -> Result<ConfigMap, BootstrapError> {
    let mut config = defaults();
    let path = match file_override {
        Some(p) => p.to_path_buf(),
        None => config.data_folder().join(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        persist_defaults(&path)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(&path)?;
    let overlay = parse_document(&raw, &path)?;
    config.merge_overlay(overlay);
    Ok(config)
}

fn parse_document(raw: &str, path: &Path) -> Result<ConfigMap, BootstrapError> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw)
        .map_err(|e| BootstrapError::Parse(format!("{}: {e}", path.display())))?;
    ConfigMap::from_value(value).map_err(|e| match e {
        BootstrapError::Parse(msg) => BootstrapError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Write the default document to `path` so subsequent runs have a stable,
/// inspectable file.
fn persist_defaults(path: &Path) -> Result<(), BootstrapError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG_YAML)?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
