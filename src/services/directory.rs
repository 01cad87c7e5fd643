//! Directory-authentication (LDAP) client settings.
//!
//! The wire protocol lives in the directory server's client library at the
//! call site; this handle owns the validated connection settings and the
//! DN templating the auth layer needs.

use crate::config::{ConfigMap, DirectoryConfig};
use crate::error::BootstrapError;

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    enabled: bool,
    server_url: String,
    bind_dn: String,
    user_dn_template: String,
}

impl DirectoryClient {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let section: DirectoryConfig = config.section("directory_auth")?;
        if section.enabled && !section.user_dn_template.contains("{username}") {
            return Err(BootstrapError::resource(
                "directory_auth",
                "user_dn_template must contain a {username} placeholder",
            ));
        }
        Ok(Self {
            enabled: section.enabled,
            server_url: section.server_url,
            bind_dn: section.bind_dn,
            user_dn_template: section.user_dn_template,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }

    /// Expand the configured DN template for a username.
    pub fn user_dn(&self, username: &str) -> String {
        self.user_dn_template.replace("{username}", username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigMap, defaults};

    #[test]
    fn disabled_by_default() {
        let client = DirectoryClient::from_config(&defaults()).unwrap();
        assert!(!client.is_enabled());
    }

    #[test]
    fn user_dn_expands_template() {
        let client = DirectoryClient::from_config(&defaults()).unwrap();
        assert_eq!(
            client.user_dn("jdoe"),
            "uid=jdoe,ou=people,dc=example,dc=org"
        );
    }

    #[test]
    fn enabled_requires_username_placeholder() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(
                serde_yaml::from_str(
                    "directory_auth:\n  enabled: true\n  user_dn_template: \"uid=fixed\"\n",
                )
                .unwrap(),
            )
            .unwrap(),
        );
        let err = DirectoryClient::from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::ResourceInit { resource: "directory_auth", .. }
        ));
    }
}
