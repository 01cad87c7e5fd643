//! takhub — main server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Resolve config and construct shared services
//!   3. Start the background scheduler
//!   4. Run until ctrl-c

use std::time::Duration;

use tracing::info;

use takhub::error::BootstrapError;
use takhub::registry::{self, ServiceIdentity};
use takhub::services::Event;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), BootstrapError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let identity = ServiceIdentity::new("takhub-server");
    let registry = registry::bootstrap(&identity)?;

    info!(
        data_folder = %registry.config().data_folder().display(),
        "config resolved"
    );

    if let Some(scheduler) = registry.scheduler() {
        if let Some(hub) = registry.realtime() {
            scheduler.register("heartbeat", Duration::from_secs(30), move || {
                hub.publish(Event {
                    topic: "server/heartbeat".into(),
                    data: String::new(),
                });
            });
        }
        let started = scheduler.start();
        info!(jobs = started, "scheduler running");
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    Ok(())
}
