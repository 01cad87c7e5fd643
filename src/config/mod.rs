//! Layered configuration resolution.
//!
//! Configuration is resolved once per process, in order:
//!
//! 1. compiled-in defaults ([`defaults`]);
//! 2. the on-disk override file at `<data_folder>/config.yml`, created from
//!    the defaults if absent;
//! 3. the `TAKHUB_CONFIG_FILE` environment variable, which replaces the
//!    computed file path outright.
//!
//! File keys win over defaults with a shallow top-level merge: a key present
//! in the file replaces the default value for that key wholesale, and every
//! default key the file does not mention survives. The resolved [`ConfigMap`]
//! is immutable from the consumers' point of view.
//!
//! # Module layout
//!
//! - **map** — [`ConfigMap`] itself: lookup, typed section extraction, merge.
//! - **defaults** — the compiled-in default document.
//! - **resolve** — path computation, env override, persist-on-missing, parse.
//! - **sections** — typed section structs (`LoggingConfig`, `SmtpConfig`, …)
//!   with serde field defaults so partial sections still resolve.

mod defaults;
mod map;
mod resolve;
mod sections;

pub use defaults::defaults;
pub use map::ConfigMap;
pub use resolve::{CONFIG_FILE_ENV, CONFIG_FILE_NAME, expand_home, resolve, resolve_from};
pub use sections::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use crate::error::BootstrapError;

    #[test]
    fn defaults_parse_and_carry_data_folder() {
        let cfg = defaults();
        assert!(cfg.get("data_folder").is_some());
        assert!(cfg.get("logging").is_some());
        assert!(cfg.get("metrics").is_some());
        assert!(cfg.get("tracing").is_some());
    }

    #[test]
    fn missing_file_persists_defaults_and_returns_them() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let cfg = resolve_from(Some(&path)).unwrap();
        assert_eq!(cfg, defaults());
        assert!(path.exists());
        // Round trip: re-reading the persisted file yields the defaults again.
        let again = resolve_from(Some(&path)).unwrap();
        assert_eq!(again, defaults());
    }

    #[test]
    fn file_keys_win_and_unmentioned_defaults_survive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "data_folder: \"/srv/takhub\"\nextra: 7\n").unwrap();
        let cfg = resolve_from(Some(&path)).unwrap();
        assert_eq!(cfg.data_folder(), PathBuf::from("/srv/takhub"));
        // keys the file never mentioned are still there
        assert!(cfg.get("database").is_some());
        assert!(cfg.get("smtp").is_some());
        // keys only the file has are kept too
        assert_eq!(cfg.get("extra").and_then(|v| v.as_u64()), Some(7));
    }

    #[test]
    fn section_replacement_is_wholesale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "logging:\n  level: debug\n").unwrap();
        let cfg = resolve_from(Some(&path)).unwrap();
        let logging: LoggingConfig = cfg.section("logging").unwrap();
        assert_eq!(logging.level, "debug");
        // the file's logging section replaced the default one; the missing
        // fields come from the serde field defaults, not the default section
        assert_eq!(logging.service_name, "takhub");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "logging: [unterminated\n").unwrap();
        let err = resolve_from(Some(&path)).unwrap_err();
        assert!(matches!(err, BootstrapError::Parse(_)), "got {err}");
    }

    #[test]
    fn non_mapping_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "- just\n- a\n- list\n").unwrap();
        let err = resolve_from(Some(&path)).unwrap_err();
        assert!(matches!(err, BootstrapError::Parse(_)), "got {err}");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.takhub");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".takhub"));
    }

    #[test]
    fn absolute_path_unchanged() {
        let p = expand_home("/absolute/path");
        assert_eq!(p, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn relative_path_unchanged() {
        let p = expand_home("relative/path");
        assert_eq!(p, PathBuf::from("relative/path"));
    }
}
