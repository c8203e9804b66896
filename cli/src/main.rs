// printlog - CUPS print log ingestion

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use printlog::control::ControlFileExtractor;
use printlog::{load_config, Config, Database, PrintlogError, Reconciler, Scheduler};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

const DEFAULT_CONFIG_PATH: &str = "/etc/printlog/config.json";
const DEFAULT_CONTROL_PREFIX: &str = "c";

#[derive(Parser)]
#[command(name = "printlog")]
#[command(about = "Ingest CUPS print logs into a deduplicated job store")]
#[command(version)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, short = 'c', global = true, env = "PRINTLOG_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reconciliation pass and exit
    #[command(after_help = "\
Exit codes:
  0  success
  2  configuration error
  3  job store cannot be opened
  4  accounting log missing or journal unreadable")]
    Run {
        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Re-run the pass on the configured interval until interrupted
    Watch,

    /// Show what would be extracted from control files, without touching the store
    Inspect {
        /// Control files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let code = match &cli.command {
        Commands::Run { json } => cmd_run(&cli.config, *json),
        Commands::Watch => cmd_watch(&cli.config, cli.json_logs),
        Commands::Inspect { files } => cmd_inspect(&cli.config, files),
    };
    ExitCode::from(code)
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // `init` also routes `log` records from the library into tracing.
    if json {
        fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load(config_path: &Path) -> Result<Config, PrintlogError> {
    let config = load_config(config_path)?;
    info!("Loaded configuration from {}", config_path.display());
    Ok(config)
}

fn cmd_run(config_path: &Path, json: bool) -> u8 {
    match run_once(config_path) {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        error!("Failed to serialize run report: {}", e);
                        return EXIT_ERROR;
                    }
                }
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            exit_codes::for_error(&e)
        }
    }
}

fn run_once(config_path: &Path) -> Result<printlog::RunReport, PrintlogError> {
    let config = load(config_path)?;

    let db_path = config.database_path().ok_or_else(|| {
        printlog::ConfigError::Validation {
            message: "No database_path configured and no home directory found".to_string(),
        }
    })?;
    let db = Database::open(&db_path)?;

    let report = Reconciler::from_config(db, &config).run()?;
    Ok(report)
}

fn cmd_watch(config_path: &Path, json_logs: bool) -> u8 {
    let config = match load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return exit_codes::for_error(&e);
        }
    };

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            error!("Cannot locate own executable: {}", e);
            return EXIT_ERROR;
        }
    };

    let mut args = vec![
        "--config".into(),
        config_path.as_os_str().to_os_string(),
    ];
    if json_logs {
        args.push("--json-logs".into());
    }
    args.push("run".into());

    let scheduler = Scheduler::from_config(exe, args, &config.schedule);
    let shutdown = scheduler.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || shutdown.trigger()) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    match scheduler.run() {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            error!("Scheduler failed: {}", e);
            EXIT_ERROR
        }
    }
}

/// Control-file prefix for `inspect`. It only matters for ids taken from file
/// names, so an unloadable config falls back to the default.
fn inspect_prefix(config_path: &Path) -> String {
    match load_config(config_path) {
        Ok(config) => config.spool.control_prefix,
        Err(e) => {
            debug!("Using default control prefix, config not loaded: {}", e);
            DEFAULT_CONTROL_PREFIX.to_string()
        }
    }
}

fn cmd_inspect(config_path: &Path, files: &[PathBuf]) -> u8 {
    let extractor = ControlFileExtractor::new(inspect_prefix(config_path));

    let mut code = EXIT_SUCCESS;
    for path in files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                code = EXIT_ERROR;
                continue;
            }
        };

        let attrs = extractor.extract(&bytes, path);
        let out = serde_json::json!({
            "file": path.display().to_string(),
            "job_id": attrs.job_id.as_ref().map(|id| id.to_string()),
            "document_name": attrs.document_name,
            "user": attrs.user,
            "printer": attrs.printer,
        });
        println!("{}", out);
    }
    code
}
