//! Migrate command - manages the PostgreSQL schema outside of `serve`

use clap::Subcommand;
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::infrastructure::storage::{connect, MigrationStatus, Migrator, PostgresConfig, PostgresMigrator};

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum MigrateCommand {
    /// Apply every pending migration
    Up,

    /// Revert the most recently applied migration
    Down,

    /// List known migrations and whether each is applied
    Status,
}

pub async fn run(command: MigrateCommand) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    ensure_postgres(&config.database)?;

    let pool = connect(&PostgresConfig::from(&config.database)).await?;
    let migrator = PostgresMigrator::new(pool);

    match command {
        MigrateCommand::Up => {
            let applied = migrator.run().await?;
            info!(applied, "Migrations applied");
        }
        MigrateCommand::Down => match migrator.revert().await? {
            Some(version) => info!(version, "Migration reverted"),
            None => info!("No applied migrations to revert"),
        },
        MigrateCommand::Status => {
            for line in format_status(&migrator.status().await?) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn ensure_postgres(config: &DatabaseConfig) -> anyhow::Result<()> {
    if config.backend != DatabaseBackend::Postgres {
        anyhow::bail!("migrations require database.backend = postgres");
    }
    Ok(())
}

fn format_status(statuses: &[MigrationStatus]) -> Vec<String> {
    statuses
        .iter()
        .map(|s| {
            let mark = if s.applied { "applied" } else { "pending" };
            format!("{:>4}  {:<8} {}", s.version, mark, s.description)
        })
        .collect()
}
