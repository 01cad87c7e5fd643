//! eud-handler — entry point for the device-connection service.

use tracing::info;

use takhub::error::BootstrapError;
use takhub::registry::{self, ServiceIdentity};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), BootstrapError> {
    let _ = dotenvy::dotenv();
    let registry = registry::bootstrap(&ServiceIdentity::new("eud-handler"))?;

    if let Some(hub) = registry.realtime() {
        info!(origins = ?hub.cors_allowed_origins(), "realtime hub ready");
    }
    Ok(())
}
