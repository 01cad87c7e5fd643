//! Localization service.

use crate::config::{ConfigMap, LocaleConfig};
use crate::error::BootstrapError;

/// Locale negotiation for user-facing strings. The default locale is always
/// part of the supported set.
#[derive(Debug, Clone)]
pub struct Localizer {
    default_locale: String,
    supported: Vec<String>,
}

impl Localizer {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let section: LocaleConfig = config.section("locale")?;
        let mut supported = section.supported;
        if !supported
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&section.default_locale))
        {
            supported.push(section.default_locale.clone());
        }
        Ok(Self {
            default_locale: section.default_locale,
            supported,
        })
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// Pick the best supported locale for an ordered preference list.
    /// Falls back to the primary subtag (`en-US` → `en`), then the default.
    pub fn negotiate(&self, requested: &[&str]) -> &str {
        for want in requested {
            if let Some(hit) = self
                .supported
                .iter()
                .find(|s| s.eq_ignore_ascii_case(want))
            {
                return hit;
            }
            if let Some((primary, _)) = want.split_once('-') {
                if let Some(hit) = self
                    .supported
                    .iter()
                    .find(|s| s.eq_ignore_ascii_case(primary))
                {
                    return hit;
                }
            }
        }
        &self.default_locale
    }
}
