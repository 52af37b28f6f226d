use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use chrono::Utc;
use clap::Parser;
use diffcount::{DiffCountError, DiffCountModel, ReportConfig};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Debug, Parser)]
#[command(
    name = "diffcount",
    version,
    about = "Compare SOL and TEW billing/wordcount reports and write a reconciliation report."
)]
struct Cli {
    /// SOL report (.xlsx, .xls, .csv, ...).
    #[arg(long, env = "DIFFCOUNT_SOL")]
    sol: PathBuf,

    /// TEW report (.xlsx, .xls, .csv, ...).
    #[arg(long, env = "DIFFCOUNT_TEW")]
    tew: PathBuf,

    /// Output file (default: diffcount-<UTC date>.xlsx). A .csv extension
    /// writes a flat file with disagreement columns instead of a workbook.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also append log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Worksheet name in the generated workbook.
    #[arg(long, default_value = "Sheet1")]
    sheet_name: String,

    /// Don't highlight category cells where SOL and TEW disagree.
    #[arg(long, default_value_t = false)]
    no_highlight: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_ref()) {
        eprintln!("could not open log file: {e}");
        return ExitCode::from(1);
    }

    match real_main(cli) {
        Ok(()) => ExitCode::from(0),
        Err(e) if e.is_wrong_file() => {
            error!("{e}. It seems the wrong file was given.");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter()))
        .with(file_layer)
        .init();
    Ok(())
}

fn real_main(cli: Cli) -> Result<(), DiffCountError> {
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name()));
    let config = ReportConfig {
        sheet_name: cli.sheet_name,
        highlight_pairs: !cli.no_highlight,
        ..ReportConfig::default()
    };

    let mut model = DiffCountModel::new(".");

    info!(path = %cli.sol.display(), "step 1: SOL report");
    model.load_sol(&cli.sol)?;

    info!(path = %cli.tew.display(), "step 2: TEW report");
    model.load_tew(&cli.tew)?;

    info!(path = %output.display(), "step 3: creating report file");
    let merged = model.write_report(&output, &config)?;

    println!("\n{}\n", diffcount::report::status_counts(&merged)?);
    Ok(())
}

fn default_output_name() -> String {
    format!("diffcount-{}.xlsx", Utc::now().format("%Y-%m-%d"))
}
