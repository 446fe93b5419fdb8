//! dartcam CLI: offline dart detection and scoring.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dartcam::session::{self, SessionConfig};
use dartcam::{image_io, SessionReport};
use log::info;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dartcam")]
#[command(about = "Detect darts in camera frames and score X01 matches")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` overrides it under tracing.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detector over a directory of frames and score the darts.
    Detect {
        /// Directory of PNG/JPEG frames, played in file name order.
        #[arg(long)]
        frames: PathBuf,

        /// Path to write the session report (JSON).
        #[arg(long)]
        out: PathBuf,

        /// Session config (JSON); defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a JSON list of darts and scoring events through the state machine.
    Replay {
        /// JSON array of dart payloads or scoring events.
        #[arg(long)]
        darts: PathBuf,

        /// Path to write the match report (JSON).
        #[arg(long)]
        out: PathBuf,

        /// Session config (JSON); defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the default session config.
    InitConfig {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Detect {
            frames,
            out,
            config,
        } => run_detect(&frames, &out, config.as_deref()),
        Commands::Replay { darts, out, config } => run_replay(&darts, &out, config.as_deref()),
        Commands::InitConfig { out } => {
            SessionConfig::default().write_json(&out)?;
            info!("default config written to {}", out.display());
            Ok(())
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    dartcam::core::init_with_level(dartcam::core::level_from_verbosity(cli.verbose))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    dartcam::core::init_tracing(cli.verbose, cli.json_logs);
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<SessionConfig> {
    match path {
        Some(p) => SessionConfig::load_json(p).map_err(|e| -> CliError {
            format!("failed to load config {}: {e}", p.display()).into()
        }),
        None => Ok(SessionConfig::default()),
    }
}

fn run_detect(frames_dir: &Path, out: &Path, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let frames = image_io::list_frames(frames_dir).map_err(|e| -> CliError {
        format!("failed to list frames in {}: {e}", frames_dir.display()).into()
    })?;
    info!("{} frames in {}", frames.len(), frames_dir.display());

    let report = image_io::run_frames(&config, &frames)?;
    summarize(&report);
    report.write_json(out)?;
    info!("report written to {}", out.display());
    Ok(())
}

fn run_replay(darts: &Path, out: &Path, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let entries = session::load_replay_json(darts).map_err(|e| -> CliError {
        format!("failed to load darts {}: {e}", darts.display()).into()
    })?;
    info!("replaying {} entries", entries.len());

    let report = session::replay_darts(&config, entries)?;
    summarize(&report);
    report.write_json(out)?;
    info!("report written to {}", out.display());
    Ok(())
}

fn summarize(report: &SessionReport) {
    for s in &report.stats {
        info!(
            "{}: legs {} darts {} average {}",
            s.name,
            s.legs_won,
            s.darts_thrown,
            s.average
                .map_or_else(|| "-".to_string(), |a| format!("{a:.2}"))
        );
    }
    if let Some(p) = report.state.winner.and_then(|w| report.state.players.get(w)) {
        info!("winner: {}", p.name);
    }
}
