//! Command-line front end for inspecting DIF databases and exporting flavors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dif_flavor::{
    parse_database, parse_database_tagged, reconstruct_flavors, Category, DifError, Flavor,
    FlavorSession,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dif-flavor", about = "Inspect WeatherSTAR XL DIF databases and export flavors", version)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every persistent key in a database
    Keys {
        /// Path to wxl_dif.dat or a text dump
        database: PathBuf,
    },
    /// List the flavors found in a database
    Flavors { database: PathBuf },
    /// Print one flavor as a JSON snapshot
    Show { database: PathBuf, flavor: String },
    /// Validate a flavor and write its DIF import text
    Export {
        database: PathBuf,
        flavor: String,
        /// Output file (defaults to <flavor>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a saved flavor snapshot against the export rules
    Check { snapshot: PathBuf },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn find_flavor(database: &Path, name: &str) -> Option<Flavor> {
    let mut flavors = reconstruct_flavors(&parse_database(database));
    let flavor = flavors.remove(name);
    if flavor.is_none() {
        eprintln!("ERROR: no flavor named '{}' in {}", name, database.display());
    }
    flavor
}

fn run(command: Command) -> Result<ExitCode, DifError> {
    match command {
        Command::Keys { database } => {
            let (db, decoded_with) = parse_database_tagged(&database);
            if decoded_with.is_none() {
                return Ok(ExitCode::FAILURE);
            }
            let mut keys: Vec<_> = db.iter().collect();
            keys.sort();
            for (key, value) in keys {
                println!("{} = {}", key, value);
            }
        }
        Command::Flavors { database } => {
            let flavors = reconstruct_flavors(&parse_database(&database));
            for (name, flavor) in &flavors {
                println!(
                    "{:<12} init={:<5} products={:<3} sensors={:<3} clock={:<5} {}",
                    name,
                    flavor.init,
                    flavor.list(Category::Product).count(),
                    flavor.list(Category::Sensor).count(),
                    flavor.clock_enabled(),
                    flavor.duration()
                );
            }
            println!("{} flavor(s)", flavors.len());
        }
        Command::Show { database, flavor } => {
            let Some(flavor) = find_flavor(&database, &flavor) else {
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string_pretty(&flavor)?);
        }
        Command::Export { database, flavor, output } => {
            let Some(flavor) = find_flavor(&database, &flavor) else {
                return Ok(ExitCode::FAILURE);
            };
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.txt", flavor.name)));
            FlavorSession::adopt(flavor).export_to(&output)?;
        }
        Command::Check { snapshot } => {
            let mut session = FlavorSession::new();
            session.load_json(&snapshot)?;
            let problems = dif_flavor::validate(session.current());
            if problems.is_empty() {
                println!("'{}' is ready to export", session.current().name);
            } else {
                for problem in &problems {
                    println!("! {}", problem);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(DifError::Validation(problems)) => {
            eprintln!("ERROR: this flavor cannot be exported until these are resolved:");
            for problem in problems {
                eprintln!("  ! {}", problem);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
