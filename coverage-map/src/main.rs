//! Point d'entrée CLI pour coverage-map

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use coverage_map::cli::{self, Commands};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Couverture cellulaire par technologie d'une zone dessinée
#[derive(Parser)]
#[command(name = "coverage-map")]
#[command(author, version)]
#[command(about = "Surface couverte par technologie (2G/3G/4G) dans une zone, à partir des secteurs des pylônes")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compute {
            towers,
            query,
            settings,
            jobs,
            sequential,
            report,
        } => {
            info!(towers = %towers.display(), query = %query.display(), "Coverage computation");
            let report = cli::cmd_compute(&towers, &query, &settings, jobs, sequential, report.as_deref())?;
            if report.status == coverage_map::CoverageStatus::Failed {
                std::process::exit(1);
            }
        }
        Commands::Sectors {
            towers,
            output,
            settings,
        } => {
            info!(towers = %towers.display(), output = %output.display(), "Sector export");
            cli::cmd_sectors(&towers, &output, &settings)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
