//! Schema-migration driver.

use std::path::{Path, PathBuf};

use sqlx::migrate::Migrator;
use tracing::info;

use crate::config::{ConfigMap, MigrationsConfig};
use crate::error::BootstrapError;

use super::database::Database;

/// Applies SQL migrations from a directory resolved against the data folder.
/// Construction only resolves the path; reading and applying happen in
/// [`MigrationRunner::run`].
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    directory: PathBuf,
}

impl MigrationRunner {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let section: MigrationsConfig = config.section("migrations")?;
        let dir = PathBuf::from(&section.directory);
        let directory = if dir.is_absolute() {
            dir
        } else {
            config.data_folder().join(dir)
        };
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Read the migration scripts and apply any that are pending.
    pub async fn run(&self, database: &Database) -> Result<(), BootstrapError> {
        let migrator = Migrator::new(self.directory.as_path()).await.map_err(|e| {
            BootstrapError::resource(
                "migrations",
                format!("cannot load migrations from {}: {e}", self.directory.display()),
            )
        })?;
        migrator
            .run(database.pool())
            .await
            .map_err(|e| BootstrapError::resource("migrations", e))?;
        info!(directory = %self.directory.display(), "migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigMap, defaults};

    #[test]
    fn relative_directory_resolves_under_data_folder() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(serde_yaml::from_str("data_folder: \"/srv/takhub\"\n").unwrap())
                .unwrap(),
        );
        let runner = MigrationRunner::from_config(&cfg).unwrap();
        assert_eq!(runner.directory(), Path::new("/srv/takhub/migrations"));
    }

    #[test]
    fn absolute_directory_is_kept() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(
                serde_yaml::from_str("migrations:\n  directory: \"/opt/migrations\"\n").unwrap(),
            )
            .unwrap(),
        );
        let runner = MigrationRunner::from_config(&cfg).unwrap();
        assert_eq!(runner.directory(), Path::new("/opt/migrations"));
    }

    #[tokio::test]
    async fn run_fails_on_missing_directory() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(
                serde_yaml::from_str("migrations:\n  directory: \"/definitely/not/here\"\n")
                    .unwrap(),
            )
            .unwrap(),
        );
        let runner = MigrationRunner::from_config(&cfg).unwrap();
        let database = Database::from_config(&cfg).unwrap();
        let err = runner.run(&database).await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::ResourceInit { resource: "migrations", .. }
        ));
    }
}
