//! Replay recorded head poses through the gaze pipeline and print one line per frame.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::{Path, PathBuf};
use webcam_gaze::{
    config::{Config, GeometryConfig, EXAMPLE_CONFIG},
    pipeline::{GazePipeline, GazeSession},
    pose::FrameInput,
    screen::Viewport,
    tracking::FrameResult,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named device layout to use instead of a configuration file (macbook-pro-14)
    #[arg(short, long)]
    preset: Option<String>,

    /// YAML list of recorded frames
    #[arg(short, long, required_unless_present = "print_example_config")]
    frames: Option<PathBuf>,

    /// Viewport size in pixels, e.g. 1512x982
    #[arg(long)]
    viewport: Option<Viewport>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    if let Some(path) = &args.config {
        info!("Loading configuration from: {}", path.display());
        return Config::from_file(path).with_context(|| format!("Failed to load config file {}", path.display()));
    }

    let Some(name) = &args.preset else {
        bail!("Either --config or --preset is required");
    };
    let geometry = GeometryConfig::preset(name).with_context(|| format!("Unknown preset: {name}"))?;
    info!("Using preset geometry: {name}");
    Ok(Config::with_geometry(geometry))
}

fn load_frames(path: &Path) -> Result<Vec<FrameInput>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read frames from {}", path.display()))?;
    let frames: Vec<FrameInput> =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse frames in {}", path.display()))?;
    Ok(frames)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = load_config(&args)?;
    if let Some(viewport) = args.viewport {
        config.viewport = viewport;
    }

    let pipeline = GazePipeline::new(&config)?;
    let mut session = GazeSession::new(&config)?;

    let Some(frames_path) = &args.frames else {
        bail!("--frames is required");
    };
    let frames = load_frames(frames_path)?;
    info!("Replaying {} frames", frames.len());

    let mut emitted = 0usize;
    for (index, frame) in frames.iter().enumerate() {
        let result = pipeline.process_frame(&mut session, frame);
        debug!("frame {index}: {:?} -> {result:?}", session.state());
        match result {
            FrameResult::Tracking(point) => println!("tracking {:.1} {:.1}", point.pixel_x, point.pixel_y),
            FrameResult::Held(point) => println!("held {:.1} {:.1}", point.pixel_x, point.pixel_y),
            FrameResult::NoResult => println!("none"),
        }
        if result.point().is_some() {
            emitted += 1;
        }
    }

    info!("Done: {emitted} of {} frames produced a gaze point", frames.len());
    session.disable();
    Ok(())
}
