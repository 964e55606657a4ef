//! Persistence Viewer CLI
//!
//! Loads a point cloud, runs the ball-growth / persistence pipeline at the
//! chosen radius and prints one frame per render. With `--autoplay` the
//! radius sweeps its range on the configured cadence until `--frames`
//! frames were printed or Ctrl-C is pressed.
//!
//! With `--interactive`, commands are read from stdin (`radius 0.3`,
//! `play`, `pause`, `h1 off`, `show 0,2`, `load demo3d`, `quit`).
//!
//! Without `--frames`, a one-shot run prints a single frame while autoplay
//! and interactive runs continue until quit.

use anyhow::{Context, Result};
use clap::Parser;
use persistence_viewer::{
    AnimationDriver, Dataset, DimensionSelection, Frame, Input, Session, Source, TokioClock,
    ViewerConfig,
};
use std::io::BufRead;
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Interactive persistent homology of small point clouds
#[derive(Parser, Debug)]
#[command(name = "persistence-viewer")]
#[command(about = "Grow balls around points and watch their persistence diagrams", long_about = None)]
struct Args {
    /// Built-in dataset (demo2d, demo3d, circle, sphere)
    #[arg(short, long, conflicts_with = "input")]
    dataset: Option<Dataset>,

    /// Headerless numeric table, one 2D or 3D point per row
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Initial ball radius (clamped into the configured range)
    #[arg(short, long)]
    radius: Option<f64>,

    /// Start with autoplay on
    #[arg(long)]
    autoplay: bool,

    /// Frames to print before exiting (0 = until quit or Ctrl-C).
    /// Defaults to 1, or unlimited with autoplay or --interactive
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Homology dimensions to show, e.g. "0,1"
    #[arg(long)]
    show: Option<DimensionSelection>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from stdin
    #[arg(long)]
    interactive: bool,

    /// One JSON frame per line instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays parseable with --json
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(radius) = args.radius {
        config.radius.initial = radius;
    }
    if args.autoplay {
        config.autoplay = true;
    }

    let source = match &args.input {
        Some(path) => Source::Table(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => Source::Catalog(args.dataset.unwrap_or(Dataset::Demo2d)),
    };

    let mut session = Session::new(config.clone());
    if let Some(show) = args.show.clone() {
        session.set_selection(show);
    }
    session
        .load(&source)
        .with_context(|| format!("loading {}", source.label()))?;

    if !args.json {
        print_banner(&session, &source, &config);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();

    let ctrl_c = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, stopping");
            let _ = ctrl_c.send(Input::Quit);
        }
    });

    if args.interactive {
        spawn_stdin_reader(tx.clone());
    }

    let mut driver = AnimationDriver::from_config(&config);
    let clock = TokioClock::new();
    let json = args.json;
    let limit = frame_limit(&args, &config);
    let mut printed = 0u64;
    let mut output_error = None;

    let summary = driver
        .run(&clock, &mut session, &mut rx, |frame| {
            if let Err(err) = print_frame(frame, json) {
                output_error.get_or_insert(err);
                let _ = tx.send(Input::Quit);
                return;
            }
            printed += 1;
            if limit.map_or(false, |limit| printed >= limit) {
                let _ = tx.send(Input::Quit);
            }
        })
        .await;

    if let Some(err) = output_error {
        return Err(err);
    }

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        final_radius = summary.final_radius,
        cache_hits = session.cache().hits(),
        "done"
    );
    Ok(())
}

/// How many frames to print before quitting; `None` runs until quit.
fn frame_limit(args: &Args, config: &ViewerConfig) -> Option<u64> {
    match args.frames {
        Some(0) => None,
        Some(frames) => Some(frames),
        None if config.autoplay || args.interactive => None,
        None => Some(1),
    }
}

/// Blocking stdin reader on its own thread; each valid line becomes an
/// [`Input`]. End of input quits.
fn spawn_stdin_reader(tx: UnboundedSender<Input>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Input>() {
                Ok(input) => {
                    let quit = input == Input::Quit;
                    if tx.send(input).is_err() || quit {
                        return;
                    }
                }
                Err(reason) => warn!(command = %line.trim(), %reason, "ignored command"),
            }
        }
        let _ = tx.send(Input::Quit);
    });
}

fn print_banner(session: &Session, source: &Source, config: &ViewerConfig) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Persistence Viewer");
    println!("═══════════════════════════════════════════════════════════════\n");

    if let Some(cloud) = session.cloud() {
        println!("Point cloud: {}", source.label());
        println!("  {} points in {}D", cloud.len(), cloud.dimension());
    }
    let bounds = session.parameter().bounds();
    println!(
        "Radius: {:.2} in [{:.2}, {:.2}], step {:.2}",
        session.radius(),
        bounds.min,
        bounds.max,
        bounds.step
    );
    println!(
        "Autoplay: {} (step {:.2} every {} ms)",
        if config.autoplay { "on" } else { "off" },
        config.animation.step,
        config.animation.cadence_ms
    );
    println!(
        "Showing: {}  (max dimension {})",
        session.selection(),
        session.engine().max_dimension()
    );
    println!();
}

fn print_frame(frame: &Frame, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(frame)?);
        return Ok(());
    }

    println!(
        "[{:>4}] r = {:.2}  ε = 2r = {:.2}  ({} balls)",
        frame.seq,
        frame.radius,
        frame.threshold,
        frame.primitives.len()
    );
    for notice in &frame.notices {
        println!("       ! {}", notice);
    }
    if let Some(betti) = &frame.betti {
        println!(
            "       β₀ = {}, β₁ = {}, β₂ = {}  (χ = {})",
            betti.beta_0,
            betti.beta_1,
            betti.beta_2,
            betti.euler_characteristic()
        );
    }
    for summary in &frame.summaries {
        println!(
            "       H{}: {:>3} pairs ({} essential)  Σ persistence = {:.4}  H_P = {:.4}",
            summary.dimension,
            summary.pairs,
            summary.essential,
            summary.total_persistence,
            summary.entropy
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(argv: &[&str]) -> Option<u64> {
        let args = Args::try_parse_from(argv).unwrap();
        let mut config = ViewerConfig::default();
        config.autoplay |= args.autoplay;
        frame_limit(&args, &config)
    }

    #[test]
    fn test_one_shot_prints_one_frame() {
        assert_eq!(limit(&["persistence-viewer"]), Some(1));
        assert_eq!(limit(&["persistence-viewer", "-d", "demo3d", "-r", "0.3"]), Some(1));
    }

    #[test]
    fn test_autoplay_and_interactive_run_until_quit() {
        assert_eq!(limit(&["persistence-viewer", "--autoplay"]), None);
        assert_eq!(limit(&["persistence-viewer", "--interactive"]), None);
    }

    #[test]
    fn test_explicit_frames_win() {
        assert_eq!(limit(&["persistence-viewer", "--autoplay", "-n", "12"]), Some(12));
        assert_eq!(limit(&["persistence-viewer", "--interactive", "--frames", "3"]), Some(3));
        assert_eq!(limit(&["persistence-viewer", "-n", "0"]), None);
    }

    #[test]
    fn test_autoplay_from_config_file_runs_until_quit() {
        let args = Args::try_parse_from(["persistence-viewer"]).unwrap();
        let config = ViewerConfig {
            autoplay: true,
            ..ViewerConfig::default()
        };
        assert_eq!(frame_limit(&args, &config), None);
    }
}
