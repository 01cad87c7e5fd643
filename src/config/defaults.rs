//! Compiled-in default configuration.
//!
//! The same document is what gets persisted to `<data_folder>/config.yml`
//! on first start, so operators can inspect and edit every knob.

use super::map::ConfigMap;

pub(crate) const DEFAULT_CONFIG_YAML: &str = r#"# takhub configuration.
# Any key omitted here falls back to the compiled-in value for that key.

data_folder: "~/.takhub"

logging:
  service_name: "takhub"
  level: "info"
  log_file: null

metrics:
  service_name: "takhub"
  enabled: false
  endpoint: null
  interval_secs: 60

tracing:
  service_name: "takhub"
  enabled: false
  endpoint: null
  sample_ratio: 1.0

smtp:
  host: "127.0.0.1"
  port: 25
  from: "takhub@localhost"
  username: null
  password: null

database:
  url: "postgres://takhub@127.0.0.1/takhub"
  max_connections: 8

realtime:
  capacity: 256
  cors_allowed_origins: ["*"]

migrations:
  directory: "migrations"

directory_auth:
  enabled: false
  server_url: "ldap://127.0.0.1:389"
  bind_dn: ""
  user_dn_template: "uid={username},ou=people,dc=example,dc=org"

locale:
  default: "en"
  supported: ["en"]
"#;

/// The compiled-in defaults as a [`ConfigMap`].
///
/// # Panics
///
/// Panics if the embedded document is malformed — a programming error that
/// the test below catches before it can ship.
pub fn defaults() -> ConfigMap {
    let value = serde_yaml::from_str(DEFAULT_CONFIG_YAML)
        .expect("compiled-in default config must be valid YAML");
    ConfigMap::from_value(value).expect("compiled-in default config must be a string-keyed mapping")
}
