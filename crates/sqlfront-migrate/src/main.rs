//! sqlfront CLI
//!
//! Formats SQL scripts and plans or applies table rebuilds on SQLite.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlfront_core::{parse_statements, unparse};
use sqlfront_migrate::prelude::*;

/// SQLite SQL front-end and table rebuild tool.
#[derive(Parser)]
#[command(name = "sqlfront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and print it in canonical form.
    Format {
        /// Script to format, or `-` for stdin.
        input: String,
    },

    /// Print the statements an alteration would run.
    Plan {
        /// Table to alter.
        #[arg(short, long)]
        table: String,

        /// JSON file with the list of steps.
        #[arg(short, long)]
        steps: PathBuf,

        /// Plan against a schema script instead of the database.
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Apply an alteration to the database.
    Alter {
        /// Table to alter.
        #[arg(short, long)]
        table: String,

        /// JSON file with the list of steps.
        #[arg(short, long)]
        steps: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn read_steps(path: &Path) -> anyhow::Result<Vec<AlterationStep>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let specs: Vec<StepSpec> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid step file {}", path.display()))?;
    let steps = specs
        .into_iter()
        .map(StepSpec::into_step)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(steps = steps.len(), path = %path.display(), "Loaded steps");
    Ok(steps)
}

fn fill_plan(mut plan: Plan, steps: Vec<AlterationStep>) -> anyhow::Result<Plan> {
    for step in steps {
        let description = step.describe();
        plan.push(step)
            .with_context(|| format!("Rejected step: {description}"))?;
    }
    Ok(plan)
}

async fn connect(database: &str, dry_run: bool) -> anyhow::Result<SqliteHost> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database)
        .await
        .with_context(|| format!("Failed to connect to {database}"))?;
    Ok(SqliteHost::new(pool).dry_run(dry_run))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Format { input } => {
            let text = read_input(&input)?;
            for statement in parse_statements(&text)? {
                println!("{};", unparse(&statement));
            }
        }

        Commands::Plan {
            table,
            steps,
            schema,
        } => {
            let steps = read_steps(&steps)?;
            let catalog = match schema {
                Some(path) => CatalogSnapshot::from_script(&std::fs::read_to_string(&path)?)?,
                None => connect(&cli.database, true).await?.snapshot().await?,
            };
            let plan = fill_plan(Plan::load(&catalog, &table)?, steps)?;
            if plan.is_empty() {
                info!(table = %table, "Nothing to alter");
            }
            for sql in plan.build(&catalog)? {
                println!("{sql};");
            }
        }

        Commands::Alter {
            table,
            steps,
            dry_run,
        } => {
            let steps = read_steps(&steps)?;
            let mut host = connect(&cli.database, dry_run).await?;

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }

            let plan = fill_plan(host.plan(&table).await?, steps)?;
            host.alter(plan).await?;
        }
    }

    Ok(())
}
