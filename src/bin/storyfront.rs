use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use storyfront::FrameSurface as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "storyfront", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the validated product catalog as JSON.
    Catalog(CatalogArgs),
    /// Scrub one product's frames to a scroll offset and write the surface as a PNG.
    Frame(FrameArgs),
    /// Replay a JSON list of page events and print the resulting presentation.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Page config JSON (defaults to the built-in page).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Page config JSON (defaults to the built-in page).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animated product key.
    #[arg(long)]
    product: String,

    /// Vertical scroll offset in CSS pixels.
    #[arg(long, default_value_t = 0.0)]
    scroll_top: f64,

    /// Directory holding one folder per frame set.
    #[arg(long)]
    frames_root: PathBuf,

    /// Surface width in CSS pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Surface height in CSS pixels.
    #[arg(long, default_value_t = 480.0)]
    height: f64,

    /// Window height driving the scroll span.
    #[arg(long, default_value_t = 1000.0)]
    window_height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Seconds to wait for frames to load.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Page config JSON (defaults to the built-in page).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of page events.
    #[arg(long)]
    events: PathBuf,

    /// Directory holding one folder per frame set.
    #[arg(long, default_value = ".")]
    frames_root: PathBuf,

    /// Output representation.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// View models as JSON.
    Json,
    /// Element-id keyed HTML fragments as JSON.
    Html,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyfront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Catalog(args) => cmd_catalog(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<storyfront::PageConfig> {
    match path {
        Some(p) => Ok(storyfront::PageConfig::from_path(p)?),
        None => Ok(storyfront::PageConfig::default()),
    }
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let json = serde_json::to_string_pretty(&cfg.catalog).context("serialize catalog")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let folder = cfg
        .story
        .folder_for(&args.product)
        .with_context(|| format!("product '{}' has no frame set", args.product))?
        .to_path_buf();

    let loader = storyfront::FsFrameLoader::new(&args.frames_root, None)?;
    let mut engine =
        storyfront::StoryEngine::new(cfg.story.clone(), loader, storyfront::CpuSurface::new())?;
    engine.resize(storyfront::Viewport::new(
        args.width,
        args.height,
        args.window_height,
        args.dpr,
    ))?;
    engine.preload(&args.product, &folder);
    engine.set_active_product(&args.product)?;

    if !engine.pump_until_idle(Duration::from_secs(args.timeout_secs))? {
        anyhow::bail!(
            "timed out waiting for frames of '{}' ({} outstanding)",
            args.product,
            engine.outstanding()
        );
    }
    if !engine.is_ready() {
        anyhow::bail!(
            "frames of '{}' did not all load: {:?}",
            args.product,
            engine.state(&args.product)
        );
    }

    engine.on_scroll(args.scroll_top);
    engine.on_animation_frame()?;
    let frame = engine.surface().readback_rgba8().into_straight_alpha();
    tracing::info!(
        frame = engine.current_frame(),
        width = frame.width,
        height = frame.height,
        css = ?engine.surface().css_size(),
        "scrubbed"
    );

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_events(path: &Path) -> anyhow::Result<Vec<storyfront::PageEvent>> {
    let f = File::open(path).with_context(|| format!("open events '{}'", path.display()))?;
    let events = serde_json::from_reader(BufReader::new(f)).context("parse events JSON")?;
    Ok(events)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let events = read_events(&args.events)?;
    let viewport = storyfront::Viewport::new(640.0, 480.0, 1000.0, 1.0);

    let json = match args.format {
        OutputFormat::Json => {
            let page = replay(&cfg, storyfront::RecordingPresenter::new(), &args, viewport, events)?;
            serde_json::to_string_pretty(page.presenter())
        }
        OutputFormat::Html => {
            let page = replay(&cfg, storyfront::MarkupPresenter::new(), &args, viewport, events)?;
            serde_json::to_string_pretty(page.presenter())
        }
    }
    .context("serialize presentation")?;

    println!("{json}");
    Ok(())
}

type SimPage<P> = storyfront::LandingPage<P, storyfront::FsFrameLoader, storyfront::CpuSurface>;

fn replay<P: storyfront::Presenter>(
    cfg: &storyfront::PageConfig,
    presenter: P,
    args: &SimulateArgs,
    viewport: storyfront::Viewport,
    events: Vec<storyfront::PageEvent>,
) -> anyhow::Result<SimPage<P>> {
    let loader = storyfront::FsFrameLoader::new(&args.frames_root, None)?;
    let mut page =
        storyfront::LandingPage::new(cfg, presenter, loader, storyfront::CpuSurface::new(), viewport)?;

    for (i, event) in events.into_iter().enumerate() {
        if let Err(e) = page.dispatch(event) {
            tracing::warn!(event = i, error = %e, "event rejected");
        }
    }
    Ok(page)
}
