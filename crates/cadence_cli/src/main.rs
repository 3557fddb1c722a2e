//! Cadence CLI
//!
//! Plays animation scripts headlessly at a fixed frame rate and prints the
//! animated transform, frame by frame.

mod player;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::player::{play, Sample};
use crate::script::{Script, SAMPLE_SCRIPT};

#[derive(Parser)]
#[command(name = "cadence", version, about = "Frame-driven animation sequencer")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a script and print the animated transform
    Run {
        /// Path to the script
        script: PathBuf,

        /// Override the script's frame rate
        #[arg(long)]
        fps: Option<f32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate a script and report its duration
    Check {
        /// Path to the script
        script: PathBuf,
    },

    /// Write a sample script
    Init {
        /// Destination file
        #[arg(default_value = "animation.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "cadence_cli=debug,cadence_animation=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            script,
            fps,
            format,
        } => cmd_run(script, fps, format),
        Commands::Check { script } => cmd_check(script),
        Commands::Init { path, force } => cmd_init(path, force),
    }
}

fn cmd_run(path: PathBuf, fps: Option<f32>, format: OutputFormat) -> Result<()> {
    let script = Script::load(&path)?;

    if let OutputFormat::Table = format {
        println!(
            "{:>6} {:>9}  {:>26}  {:>26}",
            "frame", "time", "position", "scale"
        );
    }

    let report = play(&script, fps, |sample| print_sample(sample, format))?;

    tracing::info!(
        frames = report.frames,
        elapsed = report.elapsed,
        "playback finished"
    );
    Ok(())
}

fn print_sample(sample: &Sample, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!(
            "{:>6} {:>9.4}  {:>26}  {:>26}",
            sample.frame,
            sample.time,
            fmt_vec(sample.position),
            fmt_vec(sample.scale)
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string(sample)?),
    }
    Ok(())
}

fn fmt_vec(v: [f32; 3]) -> String {
    format!("({:.3}, {:.3}, {:.3})", v[0], v[1], v[2])
}

fn cmd_check(path: PathBuf) -> Result<()> {
    let script = Script::load(&path)?;
    let target = script.target.to_transform().shared();
    let sequence = script.build(&target)?;

    let duration = sequence.duration();
    let frames = (duration * script.playback.fps).ceil();
    println!(
        "{}: {} steps, {:.3}s (~{} frames at {} fps)",
        path.display(),
        sequence.len(),
        duration,
        frames,
        script.playback.fps
    );
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    fs::write(&path, SAMPLE_SCRIPT)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    println!("Play it with: cadence run {}", path.display());
    Ok(())
}
