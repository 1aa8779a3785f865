//! Command-line interface.
//!
//! ```bash
//! # Serve the analysis API on the default port
//! protofit serve
//!
//! # Count reps in a recorded landmark stream
//! protofit replay --exercise squat --input session.jsonl
//!
//! # Write the default configuration file
//! protofit config init
//! ```

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::api::{create_router, AppState};
use crate::core::analyzer::FrameAnalyzer;
use crate::core::config::Config;
use crate::core::session_manager::WorkoutSession;
use crate::models::exercise::FrameResponse;
use crate::models::pose::{BodyPose, Keypoint};

/// ProtoFit command line interface
#[derive(Parser, Debug)]
#[command(name = "protofit")]
#[command(author, version, about = "Exercise rep counting and form feedback from pose landmarks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.protofit/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP analysis API
    Serve(ServeArgs),

    /// Analyze a recorded stream of landmark frames (JSON Lines)
    Replay(ReplayArgs),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Exercise to count: squat, pushup or bicep_curl
    #[arg(long, short)]
    pub exercise: String,

    /// Input file, `-` for stdin
    #[arg(long, short, default_value = "-")]
    pub input: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration file
    Validate,
}

/// One line of a replay stream
///
/// `null` means no pose was detected in that frame.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplayFrame {
    Keypoints(Vec<Keypoint>),
    Flat(Vec<f64>),
    Request {
        landmarks: Option<Vec<Keypoint>>,
        #[serde(default)]
        exercise: Option<String>,
    },
}

fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path().context("Failed to locate configuration file"),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = resolve_config_path(path)?;
    Config::load_from(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Bind the listen socket; `host` may be a name, an IPv4 or a bare IPv6 address
pub async fn bind(host: &str, port: u16) -> Result<tokio::net::TcpListener> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {} port {}", host, port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!("ProtoFit backend listening on http://{}", addr);
    Ok(listener)
}

pub async fn serve(config: Config, args: ServeArgs) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let listener = bind(&host, port).await?;

    let state = AppState::new(config);
    let pruner = state.spawn_pruner();
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    pruner.abort();
    Ok(())
}

/// Run every frame of `reader` through a fresh session, writing one
/// response per line to `writer`
pub fn replay<R: BufRead, W: Write>(
    analyzer: &FrameAnalyzer,
    exercise: &str,
    reader: R,
    mut writer: W,
) -> Result<WorkoutSession> {
    let mut session = WorkoutSession::new("replay");

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read replay input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame: Option<ReplayFrame> = serde_json::from_str(line)
            .with_context(|| format!("Malformed frame on line {}", index + 1))?;

        let (pose, frame_exercise) = match frame {
            None => (None, None),
            Some(ReplayFrame::Keypoints(keypoints)) => (Some(BodyPose::new(keypoints)), None),
            Some(ReplayFrame::Flat(values)) => match BodyPose::from_flat(&values) {
                Ok(pose) => (Some(pose), None),
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "Skipping frame");
                    continue;
                }
            },
            Some(ReplayFrame::Request {
                landmarks,
                exercise,
            }) => (landmarks.map(BodyPose::new), exercise),
        };

        let exercise = frame_exercise.as_deref().unwrap_or(exercise);
        let response: FrameResponse = analyzer.analyze_frame(&mut session, pose.as_ref(), exercise);
        serde_json::to_writer(&mut writer, &response)?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(session)
}

pub fn run_replay(config: Config, args: ReplayArgs) -> Result<()> {
    let analyzer = FrameAnalyzer::new(config);
    let stdout = std::io::stdout();

    let session = if args.input == "-" {
        replay(&analyzer, &args.exercise, std::io::stdin().lock(), stdout.lock())?
    } else {
        let file = std::fs::File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input))?;
        replay(&analyzer, &args.exercise, BufReader::new(file), stdout.lock())?
    };

    let summary = session.summary();
    tracing::info!(
        total_reps = summary.total_reps,
        frames_analyzed = summary.stats.frames_analyzed,
        frames_without_pose = summary.stats.frames_without_pose,
        frames_failed = summary.stats.frames_failed,
        "Replay finished"
    );
    Ok(())
}

pub fn run_config(path: Option<&Path>, command: ConfigCommand) -> Result<()> {
    let path = resolve_config_path(path)?;

    match command {
        ConfigCommand::Show => {
            let config = Config::load_from(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                );
            }
            Config::default()
                .save_to(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigCommand::Validate => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = serde_json::from_str(&contents)
                .with_context(|| format!("Malformed configuration in {}", path.display()))?;
            config.validate()?;
            println!("{} is valid", path.display());
        }
    }

    Ok(())
}
