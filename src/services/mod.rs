//! Shared-service handles owned by the registry.
//!
//! Each handle wraps one external collaborator and is cheap to construct:
//! no constructor here performs network I/O — connections are dialed lazily
//! when the handle is first used.

pub mod database;
pub mod directory;
pub mod locale;
pub mod mailer;
pub mod migrations;
pub mod realtime;
pub mod scheduler;

pub use database::Database;
pub use directory::DirectoryClient;
pub use locale::Localizer;
pub use mailer::Mailer;
pub use migrations::MigrationRunner;
pub use realtime::{Event, RealtimeHub};
pub use scheduler::Scheduler;
