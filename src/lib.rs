// Library root — exposes internals for integration tests and the entry-point
// binaries. Each binary lives under src/bin/ (plus src/main.rs for the server).

pub mod config;
pub mod error;
pub mod registry;
pub mod services;
pub mod telemetry;
