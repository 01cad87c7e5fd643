//! Telemetry setup — logger, optional meter, tracing parameters.
//!
//! The three sub-configurations are derived from the resolved [`ConfigMap`]
//! with [`configure_logging`], [`configure_metrics`] and [`configure_tracing`];
//! the registry overwrites their `service_name` with the calling entry
//! point's identity before handing them to [`setup`], so telemetry is always
//! labeled by whichever entry point initialized it.
//!
//! [`setup`] installs the global tracing subscriber and, when metrics are
//! enabled, builds an OpenTelemetry meter provider. Span export over OTLP is
//! the exporters' business, not this crate's.

use std::path::Path;
use std::sync::Arc;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{ConfigMap, LoggingConfig, MetricsConfig, TracingConfig};
use crate::error::BootstrapError;

/// Derive the `logging` sub-configuration from the resolved config.
pub fn configure_logging(config: &ConfigMap) -> Result<LoggingConfig, BootstrapError> {
    config.section("logging")
}

/// Derive the `metrics` sub-configuration from the resolved config.
pub fn configure_metrics(config: &ConfigMap) -> Result<MetricsConfig, BootstrapError> {
    config.section("metrics")
}

/// Derive the `tracing` sub-configuration from the resolved config.
pub fn configure_tracing(config: &ConfigMap) -> Result<TracingConfig, BootstrapError> {
    config.section("tracing")
}

/// Everything [`setup`] needs, gathered in one place so the caller can
/// overwrite the service names before construction.
#[derive(Debug, Clone)]
pub struct TelemetryOpts {
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub tracing: TracingConfig,
}

impl TelemetryOpts {
    /// Gather all three sub-configurations and stamp them with `service_name`.
    pub fn from_config(config: &ConfigMap, service_name: &str) -> Result<Self, BootstrapError> {
        let mut opts = Self {
            logging: configure_logging(config)?,
            metrics: configure_metrics(config)?,
            tracing: configure_tracing(config)?,
        };
        opts.logging.service_name = service_name.to_string();
        opts.metrics.service_name = service_name.to_string();
        opts.tracing.service_name = service_name.to_string();
        Ok(opts)
    }
}

/// Opaque logger handle. Carries the label and level the subscriber was
/// configured with; the subscriber itself is process-global.
#[derive(Debug)]
pub struct Logger {
    service_name: String,
    level: String,
}

impl Logger {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

/// Opaque meter handle. Keeps the provider alive for the process lifetime.
#[derive(Debug)]
pub struct MeterHandle {
    service_name: String,
    _provider: SdkMeterProvider,
    meter: Meter,
}

impl MeterHandle {
    fn new(config: &MetricsConfig) -> Self {
        let resource = Resource::new([KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]);
        let provider = SdkMeterProvider::builder().with_resource(resource).build();
        let meter = provider.meter(config.service_name.clone().leak() as &'static str);
        Self {
            service_name: config.service_name.clone(),
            _provider: provider,
            meter,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn meter(&self) -> &Meter {
        &self.meter
    }
}

/// Construct the logger and, when metrics are enabled, the meter.
///
/// The configured level takes precedence; `RUST_LOG` refines module-level
/// filtering on top of it when set.
pub fn setup(
    opts: TelemetryOpts,
) -> Result<(Arc<Logger>, Option<Arc<MeterHandle>>), BootstrapError> {
    // Validate the level up front so a bad config fails loudly instead of
    // silently logging nothing.
    parse_level(&opts.logging.level)?;

    if opts.tracing.enabled && !(0.0..=1.0).contains(&opts.tracing.sample_ratio) {
        return Err(BootstrapError::resource(
            "telemetry",
            format!(
                "tracing sample_ratio must be within 0.0..=1.0, got {}",
                opts.tracing.sample_ratio
            ),
        ));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&opts.logging.level));
    let writer = make_writer(opts.logging.log_file.as_deref())?;

    // The global subscriber can only be installed once per process. When it
    // is already set (embedding application, or an earlier registry in this
    // process), keep its output — the handle still carries this entry
    // point's label.
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
    {
        debug!(%err, "global subscriber already installed, reusing it");
    }

    if opts.tracing.enabled {
        info!(
            service_name = %opts.tracing.service_name,
            endpoint = ?opts.tracing.endpoint,
            sample_ratio = opts.tracing.sample_ratio,
            "tracing configured"
        );
    }

    let meter = if opts.metrics.enabled {
        let handle = MeterHandle::new(&opts.metrics);
        info!(
            service_name = %opts.metrics.service_name,
            endpoint = ?opts.metrics.endpoint,
            interval_secs = opts.metrics.interval_secs,
            "meter provider ready"
        );
        Some(Arc::new(handle))
    } else {
        None
    };

    let logger = Arc::new(Logger {
        service_name: opts.logging.service_name,
        level: opts.logging.level,
    });
    info!(service_name = %logger.service_name, "telemetry ready");
    Ok((logger, meter))
}

fn make_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter, BootstrapError> {
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    BootstrapError::resource(
                        "telemetry",
                        format!("failed to open log file '{}': {e}", path.display()),
                    )
                })?;
            Ok(BoxMakeWriter::new(file))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// Parse a log level string, erroring on unrecognised values.
fn parse_level(level: &str) -> Result<LevelFilter, BootstrapError> {
    if level.is_empty() {
        return Err(BootstrapError::resource(
            "telemetry",
            "log level must not be empty",
        ));
    }
    level.parse::<LevelFilter>().map_err(|_| {
        BootstrapError::resource("telemetry", format!("unrecognised log level: '{level}'"))
    })
}
