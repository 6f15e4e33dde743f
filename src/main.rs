use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rust_entitygen::config::DEFAULT_CONNECTION;
use rust_entitygen::{prepare_run, report, GenerateOptions};

#[derive(Parser)]
#[command(name = "rust-entitygen")]
#[command(author, version, about = "Generate Doctrine entities and repositories from an existing database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entity and repository classes for the tables of a schema
    Generate {
        /// Connection name from the settings file, or inline driver:path (sqlite:app.db, ddl:schema.sql)
        #[arg(short, long, default_value = DEFAULT_CONNECTION)]
        connection: String,

        /// Project directory that relative paths are resolved against
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Settings file (defaults to entitygen.toml in the project directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target entity path (relative to the project directory)
        #[arg(long)]
        entity_path: Option<String>,

        /// Base namespace for generated entities
        #[arg(long)]
        entity_namespace: Option<String>,

        /// Target repository path
        #[arg(long)]
        repository_path: Option<String>,

        /// Base namespace for generated repositories
        #[arg(long)]
        repository_namespace: Option<String>,

        /// Controls repository generation (auto|yes|no)
        #[arg(long, default_value = "auto")]
        repositories: String,

        /// Force overwriting existing files
        #[arg(long)]
        overwrite: bool,

        /// Never overwrite existing files
        #[arg(long)]
        no_overwrite: bool,

        /// Limit generation to the selected tables
        #[arg(short, long = "table")]
        tables: Vec<String>,

        /// Display the plan without writing any files
        #[arg(short, long)]
        dry_run: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            connection,
            project_dir,
            config,
            entity_path,
            entity_namespace,
            repository_path,
            repository_namespace,
            repositories,
            overwrite,
            no_overwrite,
            tables,
            dry_run,
            verbose,
        } => {
            init_logging(verbose);

            let options = GenerateOptions {
                project_dir,
                config_path: config,
                connection,
                entity_path,
                entity_namespace,
                repository_path,
                repository_namespace,
                repositories,
                overwrite,
                no_overwrite,
                tables,
                dry_run,
                verbose,
            };

            let run = prepare_run(&options)?;
            println!("{}", report::render_plan(&run.connection, &run.config));

            let result = run.execute(|table| {
                if verbose {
                    println!("Processing table: {}", table);
                }
            });
            print!("{}", report::render_summary(&result, dry_run));

            if result.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
