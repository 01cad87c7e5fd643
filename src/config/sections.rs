//! Typed config sections — serde targets for [`ConfigMap::section`].
//!
//! Every field carries a serde default, so a partial section in the override
//! file still resolves (the shallow merge replaces sections wholesale).
//!
//! [`ConfigMap::section`]: super::map::ConfigMap::section

use std::path::PathBuf;

use serde::Deserialize;

fn default_service_name() -> String {
    "takhub".to_string()
}

/// `logging` section — consumed by telemetry setup.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Telemetry label; overwritten with the entry point's identity before
    /// setup, so the config value only matters as a fallback.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append to this file instead of stderr when set.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `metrics` section. Disabled by default — the meter handle is legitimately
/// absent when this stays off.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            enabled: false,
            endpoint: None,
            interval_secs: default_metrics_interval(),
        }
    }
}

fn default_metrics_interval() -> u64 {
    60
}

/// `tracing` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            enabled: false,
            endpoint: None,
            sample_ratio: default_sample_ratio(),
        }
    }
}

fn default_sample_ratio() -> f64 {
    1.0
}

/// `smtp` section — mailer transport parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default = "default_smtp_from")]
    pub from: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            from: default_smtp_from(),
            username: None,
            password: None,
        }
    }
}

fn default_smtp_host() -> String {
    "127.0.0.1".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_smtp_from() -> String {
    "takhub@localhost".to_string()
}

/// `database` section. The pool is created lazily, so the URL is not dialed
/// at bootstrap time.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "postgres://takhub@127.0.0.1/takhub".to_string()
}

fn default_max_connections() -> u32 {
    8
}

/// `realtime` section — messaging hub channel capacity and CORS allow-list.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_realtime_capacity")]
    pub capacity: usize,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            capacity: default_realtime_capacity(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

fn default_realtime_capacity() -> usize {
    256
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// `migrations` section. A relative directory is resolved against the data
/// folder.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsConfig {
    #[serde(default = "default_migrations_directory")]
    pub directory: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            directory: default_migrations_directory(),
        }
    }
}

fn default_migrations_directory() -> String {
    "migrations".to_string()
}

/// `directory_auth` section — LDAP-style directory settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_directory_url")]
    pub server_url: String,
    #[serde(default)]
    pub bind_dn: String,
    #[serde(default = "default_user_dn_template")]
    pub user_dn_template: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: default_directory_url(),
            bind_dn: String::new(),
            user_dn_template: default_user_dn_template(),
        }
    }
}

fn default_directory_url() -> String {
    "ldap://127.0.0.1:389".to_string()
}

fn default_user_dn_template() -> String {
    "uid={username},ou=people,dc=example,dc=org".to_string()
}

/// `locale` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    #[serde(rename = "default", default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            supported: default_supported_locales(),
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec!["en".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_defaults_are_consistent() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.service_name, "takhub");
        assert_eq!(logging.level, "info");
        assert!(!MetricsConfig::default().enabled);
        assert!(!TracingConfig::default().enabled);
        assert!(!DirectoryConfig::default().enabled);
        assert_eq!(LocaleConfig::default().default_locale, "en");
    }

    #[test]
    fn partial_section_fills_missing_fields() {
        let smtp: SmtpConfig = serde_yaml::from_str("host: mail.example.org\n").unwrap();
        assert_eq!(smtp.host, "mail.example.org");
        assert_eq!(smtp.port, 25);
        assert_eq!(smtp.from, "takhub@localhost");
    }

    #[test]
    fn locale_default_key_is_renamed() {
        let locale: LocaleConfig =
            serde_yaml::from_str("default: uk\nsupported: [uk, en]\n").unwrap();
        assert_eq!(locale.default_locale, "uk");
        assert_eq!(locale.supported, vec!["uk", "en"]);
    }
}
