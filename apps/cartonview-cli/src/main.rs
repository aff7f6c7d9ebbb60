use anyhow::{Context as _, Result, bail};
use cartonview_common::ViewerConfig;
use cartonview_input::{InputMapper, Key};
use cartonview_kernel::{StepOutcome, ViewerState};
use cartonview_render::{DebugTextRenderer, Renderer, carton_scene};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cartonview-cli", about = "Headless tools for the carton viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Run the camera with scripted input and print the final frame
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    /// Keys held for the whole run, e.g. `W,A`
    #[arg(short, long, value_delimiter = ',')]
    keys: Vec<String>,
    /// Simulated duration in seconds
    #[arg(short, long, default_value = "1.0")]
    seconds: f32,
    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    fps: u32,
    /// Scroll offset in lines, applied on the first frame
    #[arg(long, allow_hyphen_values = true)]
    scroll: Option<f32>,
    /// Cursor positions `x,y`, one per frame from the first
    #[arg(long = "pointer", value_name = "X,Y", allow_hyphen_values = true)]
    pointer: Vec<String>,
    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SimReport {
    frames: u64,
    exited: bool,
    position: [f32; 3],
    front: [f32; 3],
    yaw: f32,
    pitch: f32,
    speed: f32,
    projection: String,
}

fn parse_key(name: &str) -> Result<Key> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "w" => Key::W,
        "a" => Key::A,
        "s" => Key::S,
        "d" => Key::D,
        "q" => Key::Q,
        "e" => Key::E,
        "p" => Key::P,
        "f" => Key::F,
        "esc" | "escape" => Key::Escape,
        other => bail!("unknown key {other:?}"),
    };
    Ok(key)
}

fn parse_point(text: &str) -> Result<(f32, f32)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("pointer position {text:?} is not `x,y`"))?;
    let x = x.trim().parse().with_context(|| format!("bad x in {text:?}"))?;
    let y = y.trim().parse().with_context(|| format!("bad y in {text:?}"))?;
    Ok((x, y))
}

/// Drive a fresh viewer state for `args.seconds` at `args.fps`. Stops
/// early on the first frame that requests exit.
fn simulate(config: &ViewerConfig, args: &SimulateArgs) -> Result<(ViewerState, bool)> {
    if args.fps == 0 {
        bail!("fps must be positive");
    }
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        bail!("seconds must be finite and non-negative (got {})", args.seconds);
    }

    let mut state = ViewerState::new(config);
    let mut mapper = InputMapper::new(&config.input);
    for name in &args.keys {
        mapper.key_pressed(parse_key(name)?);
    }
    let pointer = args
        .pointer
        .iter()
        .map(|p| parse_point(p))
        .collect::<Result<Vec<_>>>()?;

    let dt = 1.0 / args.fps as f32;
    let frames = (args.seconds * args.fps as f32).round() as u64;
    tracing::debug!("simulating {frames} frames at dt={dt:.4}");

    for frame in 0..frames {
        if let Some(&(x, y)) = pointer.get(frame as usize) {
            mapper.pointer_moved(x, y);
        }
        if let (0, Some(lines)) = (frame, args.scroll) {
            mapper.scrolled(lines);
        }
        let intents = mapper.drain_intents();
        if state.step(&intents, dt) == StepOutcome::Exit {
            tracing::info!("exit requested on frame {}", frame + 1);
            return Ok((state, true));
        }
    }
    Ok((state, false))
}

fn report(state: &ViewerState, exited: bool) -> SimReport {
    let camera = state.camera();
    SimReport {
        frames: state.frame(),
        exited,
        position: camera.position.to_array(),
        front: camera.front().to_array(),
        yaw: camera.yaw(),
        pitch: camera.pitch(),
        speed: camera.speed(),
        projection: state.mode().to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("cartonview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", cartonview_input::crate_info());
            println!("render: {}", cartonview_render::crate_info());
            for mesh in carton_scene() {
                println!("  mesh {:<12} vertices={}", mesh.name, mesh.vertex_count());
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate(args) => {
            let (state, exited) = simulate(&config, &args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report(&state, exited))?);
            } else {
                let mut renderer = DebugTextRenderer::new();
                print!("{}", renderer.render(&carton_scene(), &state.frame_view()));
                println!("frames={} exited={exited}", state.frame());
            }
        }
    }

    Ok(())
}
