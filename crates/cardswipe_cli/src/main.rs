//! cardswipe - run a swipeable card stack without a renderer
//!
//! ```text
//! cardswipe simulate --cards 5 --script "d:120,d:80,release,L,tick:500"
//! cardswipe init-config cardswipe.toml
//! ```

mod script;
mod simulate;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cardswipe_view::{SwipeableViewConfig, Viewport};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::simulate::Simulation;

/// Swipeable card stack simulator
#[derive(Parser, Debug)]
#[command(name = "cardswipe")]
#[command(about = "Drive a swipeable card stack from a gesture script")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a gesture script against a stack of synthetic cards
    Simulate(SimulateArgs),

    /// Write the default view configuration
    InitConfig {
        /// Destination file
        #[arg(default_value = "cardswipe.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Number of cards in the stack
    #[arg(short = 'n', long, default_value_t = 10)]
    cards: usize,

    /// View configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated steps: R, L, d:DX[:DY], release, tick:MS.
    /// Without a script every card is swiped, alternating right and left.
    #[arg(short, long)]
    script: Option<String>,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Viewport width
    #[arg(long, default_value_t = 1080.0)]
    width: f32,

    /// Viewport height
    #[arg(long, default_value_t = 1920.0)]
    height: f32,

    /// Card width; a card commits once dragged past half of it
    #[arg(long, default_value_t = 320.0)]
    card_width: f32,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(args) => cmd_simulate(args),
        Command::InitConfig { path, force } => cmd_init_config(&path, force),
    }
}

fn cmd_simulate(args: SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SwipeableViewConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SwipeableViewConfig::default(),
    };
    let steps = args
        .script
        .as_deref()
        .map(script::parse_script)
        .transpose()
        .context("Failed to parse gesture script")?;

    let mut sim = Simulation::new(
        config,
        Viewport::new(args.width, args.height),
        args.card_width,
        args.cards,
        args.fps,
    )?;

    tracing::info!("Simulating {} cards at {} fps", args.cards, args.fps);
    match steps {
        Some(steps) => {
            for step in steps {
                sim.apply(step);
            }
        }
        None => sim.swipe_all(),
    }

    for outcome in sim.outcomes() {
        println!(
            "{:>8.3}s  {:<5}  card #{}",
            outcome.at.as_secs_f64(),
            format!("{:?}", outcome.direction).to_lowercase(),
            outcome.item
        );
    }
    let remaining = match sim.view().active_card() {
        Some(front) if sim.view().exists_card() => {
            let index = sim.view().data_index(front).unwrap_or_default();
            sim.view().data_len().saturating_sub(index)
        }
        _ => 0,
    };
    println!("{} swiped, {} remaining", sim.outcomes().len(), remaining);
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let content = SwipeableViewConfig::default()
        .to_toml()
        .context("Failed to serialize default config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}
