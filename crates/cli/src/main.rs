//! A command-line front end for the BigQuery driver.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bigquery_driver::configuration::environment::ProcessEnvironment;
use bigquery_driver::configuration::{self, ClientSettings};
use bigquery_driver::registry;

/// Resolve and open BigQuery connection strings.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a connection string and print the resulting configuration.
    Resolve {
        /// A `bigquery://` connection string.
        uri: String,
    },
    /// Open a connection, optionally run one query, and close it again.
    Open {
        uri: String,
        /// The directory containing `settings.json`.
        #[arg(long, env = "BIGQUERY_DRIVER_SETTINGS_DIR", default_value = ".")]
        settings_dir: PathBuf,
        /// A query to run once the connection is open.
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the JSON schema of the settings file.
    SettingsSchema,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resolve { uri } => {
            let configuration = configuration::resolve(&uri)?;
            println!("{}", serde_json::to_string_pretty(&configuration)?);
        }
        Command::Open {
            uri,
            settings_dir,
            query,
        } => {
            let settings = configuration::parse_settings(&settings_dir)?;
            let registry = registry::initialize(settings, ProcessEnvironment);
            let mut connection = registry.open(configuration::SCHEME, &uri)?;

            match connection.configuration() {
                None => println!("opened diagnostic connection"),
                Some(configuration) => println!(
                    "connected to project {} (dataset {})",
                    configuration.project_id(),
                    configuration.data_set()
                ),
            }

            if let Some(sql) = query {
                let mut result_set = connection.prepare(&sql)?.query()?;
                let mut rows = 0_usize;
                while result_set.next_row() {
                    rows += 1;
                }
                println!("{rows} row(s)");
            }

            connection.close()?;
        }
        Command::SettingsSchema => {
            let schema = schemars::schema_for!(ClientSettings);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}
