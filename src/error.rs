//! Bootstrap error types.
//!
//! Everything that can go wrong before the process is serving traffic:
//! a malformed config document, a filesystem failure while reading or
//! persisting the config file, or a shared-service constructor failing.
//! None of these are retried — a failed bootstrap aborts startup and the
//! underlying message is passed through to the entry point unmodified.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The config file (or one of its sections) is not a valid document.
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A shared-service constructor failed.
    #[error("failed to initialize {resource}: {reason}")]
    ResourceInit {
        resource: &'static str,
        reason: String,
    },
}

impl BootstrapError {
    pub(crate) fn resource(resource: &'static str, reason: impl fmt::Display) -> Self {
        Self::ResourceInit {
            resource,
            reason: reason.to_string(),
        }
    }
}
