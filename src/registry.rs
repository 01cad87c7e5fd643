//! Shared-service registry.
//!
//! An explicit dependency-injection container: one handle per external
//! collaborator, each constructed at most once per registry and shared for
//! the lifetime of the process. This replaces the ambient "module globals"
//! pattern — the bootstrap routine builds the registry and callers receive
//! it explicitly.
//!
//! [`Registry::ensure_initialized`] is idempotent and safe to call from any
//! entry point, any number of times, including concurrently: the whole
//! check-and-construct sequence is serialized behind a mutex, and every
//! handle lives in a `OnceLock`, so a handle that exists is never replaced.
//! The absence check is load-bearing — reconstructing a live hub or
//! re-registering the migration driver is not safe in general.
//!
//! There is no rollback: if one constructor fails, the error propagates and
//! handles constructed earlier in the same call stay installed.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::info;

use crate::config::{self, ConfigMap};
use crate::error::BootstrapError;
use crate::services::{
    Database, DirectoryClient, Localizer, Mailer, MigrationRunner, RealtimeHub, Scheduler,
};
use crate::telemetry::{self, Logger, MeterHandle, TelemetryOpts};

/// Identity of the calling entry point; used only to label telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    service_name: String,
}

impl ServiceIdentity {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

/// Process-wide shared services, keyed by the resolved configuration.
pub struct Registry {
    config: ConfigMap,
    init_lock: Mutex<()>,
    logger: OnceLock<Arc<Logger>>,
    // set together with the logger; `None` inside means metrics are disabled,
    // which is distinct from "telemetry not initialized yet"
    meter: OnceLock<Option<Arc<MeterHandle>>>,
    mailer: OnceLock<Arc<Mailer>>,
    scheduler: OnceLock<Arc<Scheduler>>,
    database: OnceLock<Arc<Database>>,
    realtime: OnceLock<Arc<RealtimeHub>>,
    migrations: OnceLock<Arc<MigrationRunner>>,
    directory: OnceLock<Arc<DirectoryClient>>,
    localizer: OnceLock<Arc<Localizer>>,
}

impl Registry {
    pub fn new(config: ConfigMap) -> Self {
        Self {
            config,
            init_lock: Mutex::new(()),
            logger: OnceLock::new(),
            meter: OnceLock::new(),
            mailer: OnceLock::new(),
            scheduler: OnceLock::new(),
            database: OnceLock::new(),
            realtime: OnceLock::new(),
            migrations: OnceLock::new(),
            directory: OnceLock::new(),
            localizer: OnceLock::new(),
        }
    }

    /// Construct every handle that is still absent. Call from each entry
    /// point at least once during startup.
    ///
    /// Telemetry is guarded via the logger alone: when the logger already
    /// exists the whole telemetry block is skipped, so a later identity
    /// never relabels it. The meter may legitimately stay absent.
    pub fn ensure_initialized(&self, identity: &ServiceIdentity) -> Result<(), BootstrapError> {
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.logger.get().is_none() {
            let opts = TelemetryOpts::from_config(&self.config, identity.service_name())?;
            let (logger, meter) = telemetry::setup(opts)?;
            let _ = self.logger.set(logger);
            let _ = self.meter.set(meter);
        }
        if self.mailer.get().is_none() {
            let _ = self.mailer.set(Arc::new(Mailer::from_config(&self.config)?));
        }
        if self.scheduler.get().is_none() {
            let _ = self.scheduler.set(Arc::new(Scheduler::new()));
        }
        if self.database.get().is_none() {
            let _ = self
                .database
                .set(Arc::new(Database::from_config(&self.config)?));
        }
        if self.realtime.get().is_none() {
            let _ = self
                .realtime
                .set(Arc::new(RealtimeHub::from_config(&self.config)?));
        }
        if self.migrations.get().is_none() {
            let _ = self
                .migrations
                .set(Arc::new(MigrationRunner::from_config(&self.config)?));
        }
        if self.directory.get().is_none() {
            let _ = self
                .directory
                .set(Arc::new(DirectoryClient::from_config(&self.config)?));
        }
        if self.localizer.get().is_none() {
            let _ = self
                .localizer
                .set(Arc::new(Localizer::from_config(&self.config)?));
        }
        Ok(())
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn logger(&self) -> Option<Arc<Logger>> {
        self.logger.get().cloned()
    }

    /// `None` both before initialization and when metrics are disabled.
    pub fn meter(&self) -> Option<Arc<MeterHandle>> {
        self.meter.get().and_then(Clone::clone)
    }

    pub fn mailer(&self) -> Option<Arc<Mailer>> {
        self.mailer.get().cloned()
    }

    pub fn scheduler(&self) -> Option<Arc<Scheduler>> {
        self.scheduler.get().cloned()
    }

    pub fn database(&self) -> Option<Arc<Database>> {
        self.database.get().cloned()
    }

    pub fn realtime(&self) -> Option<Arc<RealtimeHub>> {
        self.realtime.get().cloned()
    }

    pub fn migrations(&self) -> Option<Arc<MigrationRunner>> {
        self.migrations.get().cloned()
    }

    pub fn directory(&self) -> Option<Arc<DirectoryClient>> {
        self.directory.get().cloned()
    }

    pub fn localizer(&self) -> Option<Arc<Localizer>> {
        self.localizer.get().cloned()
    }
}

/// The canonical bootstrap routine used by every entry point: resolve
/// configuration, build the registry, construct all handles.
pub fn bootstrap(identity: &ServiceIdentity) -> Result<Registry, BootstrapError> {
    let config = config::resolve()?;
    let registry = Registry::new(config);
    registry.ensure_initialized(identity)?;
    info!(service = identity.service_name(), "bootstrap complete");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;

    #[tokio::test]
    async fn all_handles_present_after_initialization() {
        let registry = Registry::new(defaults());
        registry
            .ensure_initialized(&ServiceIdentity::new("test-service"))
            .unwrap();
        assert!(registry.logger().is_some());
        assert!(registry.mailer().is_some());
        assert!(registry.scheduler().is_some());
        assert!(registry.database().is_some());
        assert!(registry.realtime().is_some());
        assert!(registry.migrations().is_some());
        assert!(registry.directory().is_some());
        assert!(registry.localizer().is_some());
        // metrics are disabled in the defaults
        assert!(registry.meter().is_none());
    }

    #[tokio::test]
    async fn second_call_does_not_reconstruct() {
        let registry = Registry::new(defaults());
        let identity = ServiceIdentity::new("test-service");
        registry.ensure_initialized(&identity).unwrap();
        let mailer = registry.mailer().unwrap();
        let database = registry.database().unwrap();
        let realtime = registry.realtime().unwrap();

        registry.ensure_initialized(&identity).unwrap();
        assert!(Arc::ptr_eq(&mailer, &registry.mailer().unwrap()));
        assert!(Arc::ptr_eq(&database, &registry.database().unwrap()));
        assert!(Arc::ptr_eq(&realtime, &registry.realtime().unwrap()));
    }

    #[tokio::test]
    async fn first_identity_labels_telemetry() {
        let registry = Registry::new(defaults());
        registry
            .ensure_initialized(&ServiceIdentity::new("first-service"))
            .unwrap();
        registry
            .ensure_initialized(&ServiceIdentity::new("second-service"))
            .unwrap();
        // the guard fires on the existing logger; the label must not move
        assert_eq!(registry.logger().unwrap().service_name(), "first-service");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_first_initialization_constructs_once() {
        let registry = Registry::new(defaults());
        let handle = tokio::runtime::Handle::current();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let _guard = handle.enter();
                    registry
                        .ensure_initialized(&ServiceIdentity::new("racer"))
                        .unwrap();
                });
            }
        });
        let a = registry.database().unwrap();
        registry
            .ensure_initialized(&ServiceIdentity::new("late"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &registry.database().unwrap()));
    }
}
