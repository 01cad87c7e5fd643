//! cot-parser — entry point for the message-parsing service.

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
    let registry = registry::bootstrap(&ServiceIdentity::new("cot-parser"))?;

    if let Some(localizer) = registry.localizer() {
        info!(locale = localizer.default_locale(), "localization ready");
    }
    Ok(())
}
