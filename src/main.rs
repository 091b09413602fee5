use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use clinic_records_lib::commands::{self, view::ViewArgs, CommandError};
use clinic_records_lib::config::Settings;
use clinic_records_lib::core_state::CoreState;
use clinic_records_lib::models::enums::{CrossTabAxis, ViewName};
use clinic_records_lib::seed::SeedConfig;

#[derive(Parser)]
#[command(name = "clinic-records")]
#[command(version)]
#[command(about = "Clinic records browser: patients, appointments and medical history as dashboard views", long_about = None)]
struct Cli {
    /// SQLite database file (overrides CLINIC_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Setup,

    /// Insert synthetic demo data
    Seed {
        /// Number of patients
        #[arg(long, default_value = "50")]
        patients: usize,

        /// Number of appointments
        #[arg(long, default_value = "100")]
        appointments: usize,

        /// Number of medical history entries
        #[arg(long, default_value = "100")]
        history: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Give appointments a time of day (office hours)
        #[arg(long)]
        with_times: bool,
    },

    /// Print one view as JSON
    View {
        /// View name (summary, upcoming, daily_load, crosstab, ...)
        #[arg(value_name = "NAME")]
        name: ViewName,

        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,

        /// Window in days for upcoming / daily_load
        #[arg(long)]
        window_days: Option<u32>,

        /// Cross-tab axis (age_group or gender)
        #[arg(long)]
        axis: Option<CrossTabAxis>,

        /// Search term
        #[arg(long)]
        term: Option<String>,
    },

    /// Serve the JSON API
    Serve {
        /// Bind address (overrides CLINIC_BIND_ADDR)
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

fn main() -> ExitCode {
    clinic_records_lib::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let settings =
        Settings::from_env().map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let db_path = cli.db.unwrap_or(settings.db_path);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Setup => {
            let report = commands::setup::setup(&db_path)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Seed {
            patients,
            appointments,
            history,
            seed,
            with_times,
        } => {
            let seed_config = SeedConfig {
                patients,
                appointments,
                history,
                seed,
                with_times,
                ..SeedConfig::default()
            };
            let report = commands::seed::seed(&db_path, &seed_config, today)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::View {
            name,
            as_of,
            window_days,
            axis,
            term,
        } => {
            let args = ViewArgs {
                as_of,
                window_days,
                axis,
                term,
            };
            let request = commands::view::build_request(name, &args, today)?;
            let core = CoreState::new(db_path);
            println!("{}", commands::view::view(&core, &request)?);
        }
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(settings.bind_addr);
            let core = Arc::new(CoreState::new(db_path));
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::serve::serve(core, addr))?;
        }
    }

    Ok(())
}
