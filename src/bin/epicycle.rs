use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use epicycle::{
    AnalyzeOpts, AnimationConfig, ExtractOpts, GifRepeat, GifSink, GifSinkOpts,
    ProgressObserver, RunHooks, SamplePoint, Spectrum, Stage, Timestep,
};

#[derive(Parser, Debug)]
#[command(name = "epicycle", version, about = "Fourier epicycle animations from SVG drawings")]
struct Cli {
    /// Log debug output.
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an SVG drawing as an animated GIF.
    Render(RenderArgs),
    /// Render a single timestep as a PNG.
    Frame(FrameArgs),
    /// Write the DFT coefficients of an SVG drawing as JSON.
    Spectrum(SpectrumArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Input SVG file.
    input: PathBuf,

    /// Interpolation factor (samples per unit distance).
    #[arg(long, default_value_t = 50.0)]
    interpolation_factor: f64,
}

#[derive(Args, Debug)]
struct AnimationArgs {
    /// JSON animation config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Radius of a trace point in logical units [default: 0.01].
    #[arg(long)]
    point_size: Option<f64>,

    /// Duration of a single frame in ms [default: 20].
    #[arg(long)]
    duration: Option<u32>,

    /// Side of the square image in pixels [default: 500].
    #[arg(long)]
    image_size: Option<u32>,

    /// Enable parallel transform and rendering.
    #[arg(long)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Timesteps rendered per parallel batch.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Output GIF path.
    output: PathBuf,

    #[command(flatten)]
    anim: AnimationArgs,

    /// Also save the last frame as a PNG next to the GIF.
    #[arg(long)]
    save_last: bool,

    /// Loop the GIF forever instead of playing it once.
    #[arg(long)]
    loop_forever: bool,

    /// Hold time of the final trace frame in ms.
    #[arg(long)]
    final_hold: Option<u32>,

    /// Fail instead of replacing an existing output.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Output PNG path.
    output: PathBuf,

    /// Timestep to render (0-based).
    #[arg(long, default_value_t = 0)]
    timestep: u64,

    #[command(flatten)]
    anim: AnimationArgs,
}

#[derive(Args, Debug)]
struct SpectrumArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Output JSON path; stdout when omitted.
    output: Option<PathBuf>,

    /// Evaluate bins on a rayon pool.
    #[arg(long)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Spectrum(args) => cmd_spectrum(args),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Logs each stage at every 10% step.
#[derive(Default)]
struct LogProgress {
    transform: AtomicU64,
    synthesis: AtomicU64,
}

impl ProgressObserver for LogProgress {
    fn on_progress(&self, stage: Stage, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let decile = done.min(total) * 10 / total;
        let last = match stage {
            Stage::Transform => &self.transform,
            Stage::Synthesis => &self.synthesis,
        };
        if last.fetch_max(decile, Ordering::Relaxed) < decile {
            tracing::info!(stage = stage.label(), done, total, "{}%", decile * 10);
        }
    }
}

fn load_points(args: &ExtractArgs) -> anyhow::Result<Vec<SamplePoint>> {
    let opts = ExtractOpts {
        interpolation_factor: args.interpolation_factor,
        ..ExtractOpts::default()
    };
    let points = epicycle::points_from_svg_file(&args.input, &opts)
        .with_context(|| format!("extract points from '{}'", args.input.display()))?;
    tracing::info!(points = points.len(), "drawing sampled");
    Ok(points)
}

fn load_config(args: &AnimationArgs) -> anyhow::Result<AnimationConfig> {
    let mut cfg = match &args.config {
        Some(path) => AnimationConfig::load(path)?,
        None => AnimationConfig::default(),
    };
    if let Some(v) = args.point_size {
        cfg.point_radius = v;
    }
    if let Some(v) = args.duration {
        cfg.frame_duration_ms = v;
    }
    if let Some(v) = args.image_size {
        cfg.image_size = v;
    }
    if args.parallel {
        cfg.threading.parallel = true;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if let Some(v) = args.chunk_size {
        cfg.threading.chunk_size = v;
    }
    Ok(cfg)
}

fn analyze(
    points: &[SamplePoint],
    cfg: &AnimationConfig,
    hooks: RunHooks<'_>,
) -> anyhow::Result<Spectrum> {
    let opts = AnalyzeOpts {
        threading: cfg.threading.clone(),
    };
    let spectrum = Spectrum::analyze_with(points, &opts, hooks)?;
    Ok(spectrum)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.anim)?;
    if args.save_last {
        cfg.save_last = true;
    }
    if args.loop_forever {
        cfg.repeat = GifRepeat::Infinite;
    }
    if let Some(v) = args.final_hold {
        cfg.final_hold_ms = v;
    }
    cfg.validate()?;

    let points = load_points(&args.extract)?;
    let progress = LogProgress::default();
    let hooks = if cfg.progress {
        RunHooks::none().with_progress(&progress)
    } else {
        RunHooks::none()
    };
    let spectrum = analyze(&points, &cfg, hooks)?;

    let sink_opts = GifSinkOpts {
        repeat: cfg.repeat,
        overwrite: !args.no_overwrite,
        ..GifSinkOpts::new(&args.output)
    };
    let still_path = sink_opts.still_path();
    let mut sink = GifSink::new(sink_opts)?;
    epicycle::render_animation(&spectrum, &cfg, &mut sink, hooks)?;

    eprintln!(
        "wrote {} ({} frames)",
        sink.out_path().display(),
        sink.frames_written()
    );
    if cfg.save_last {
        eprintln!("wrote {}", still_path.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.anim)?;
    cfg.validate()?;
    let points = load_points(&args.extract)?;
    let spectrum = analyze(&points, &cfg, RunHooks::none())?;

    let frame = epicycle::render_single_frame(&spectrum, &cfg, Timestep(args.timestep))?;
    epicycle::write_png(&args.output, &frame)?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_spectrum(args: SpectrumArgs) -> anyhow::Result<()> {
    let mut cfg = AnimationConfig::default();
    cfg.threading.parallel = args.parallel;
    let points = load_points(&args.extract)?;
    let spectrum = analyze(&points, &cfg, RunHooks::none())?;

    let json = serde_json::to_string_pretty(&spectrum).context("serialize spectrum")?;
    match args.output {
        Some(path) => {
            write_text(&path, &json)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))
}
