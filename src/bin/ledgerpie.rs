use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use ledgerpie::{
    AnimationController, AnimationOpts, BackendKind, ChartConfig, ChartInput, InMemorySurface,
    LedgerPartition, ManualScheduler, PngSequenceSurface,
};

#[derive(Parser, Debug)]
#[command(name = "ledgerpie", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single chart frame as a PNG.
    Frame(FrameArgs),
    /// Play the fill-in animation and write every frame as a numbered PNG.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// Input JSON: an array of aggregate records or a ledger document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Ledger side to chart (ledger documents only).
    #[arg(long, default_value = "expense")]
    partition: LedgerPartition,

    /// Style/animation config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// TTF/OTF font for labels and legend.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output edge length in pixels.
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    chart: ChartArgs,

    /// Reveal progress in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    chart: ChartArgs,

    /// Output directory for the frame sequence.
    #[arg(long)]
    out_dir: PathBuf,

    /// Total animation time in milliseconds. Overrides the config's pacing.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// File name prefix of written frames.
    #[arg(long, default_value = "frame")]
    prefix: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ChartArgs) -> anyhow::Result<ChartConfig> {
    let mut cfg = match &args.config {
        Some(path) => ChartConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ChartConfig::default(),
    };
    if let Some(size) = args.size {
        cfg.style.size_px = size;
    }
    if let Some(font) = &args.font {
        let bytes = std::fs::read(font)
            .with_context(|| format!("read font '{}'", font.display()))?;
        cfg.style.font_bytes = Some(Arc::new(bytes));
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_dataset(args: &ChartArgs) -> anyhow::Result<ledgerpie::ChartDataset> {
    let input = ChartInput::from_path(&args.in_path)
        .with_context(|| format!("load chart input '{}'", args.in_path.display()))?;
    Ok(input.dataset(args.partition)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.chart)?;
    let dataset = load_dataset(&args.chart)?;
    let backend = ledgerpie::create_backend(BackendKind::Cpu, &cfg.style)?;

    let ctl = AnimationController::new(
        backend,
        InMemorySurface::new(),
        Rc::new(ManualScheduler::new()),
        cfg.animation,
    )?;
    ctl.render_at(&dataset, args.progress)?;

    let surface = ctl.surface()?;
    let frame = surface
        .current()
        .context("renderer produced no frame")?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.chart)?;
    if let Some(ms) = args.duration_ms {
        anyhow::ensure!(ms > 0, "--duration-ms must be > 0");
        cfg.animation = AnimationOpts::from_duration(Duration::from_millis(ms));
    }
    let dataset = load_dataset(&args.chart)?;
    let backend = ledgerpie::create_backend(BackendKind::Cpu, &cfg.style)?;
    let surface = PngSequenceSurface::new(&args.out_dir, args.prefix.as_str())?;

    let scheduler = Rc::new(ManualScheduler::new());
    let ctl = AnimationController::new(backend, surface, scheduler.clone(), cfg.animation)?;
    ctl.start(dataset)?;

    let budget = cfg.animation.total_ticks() as usize + 1;
    scheduler.run_until_idle(budget);

    let stats = ctl.stats();
    anyhow::ensure!(
        stats.failed_frames == 0,
        "{} of {} frames failed to render",
        stats.failed_frames,
        stats.failed_frames + stats.frames_presented
    );
    eprintln!(
        "wrote {} frames to {} ({:?} virtual time)",
        stats.frames_presented,
        args.out_dir.display(),
        scheduler.now()
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
