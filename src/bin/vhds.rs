use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vhds", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize scores and print the analysis report as JSON.
    Analyze(AnalyzeArgs),
    /// Render an animated chart to a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Analysis mode (health, skin, fortune, psychology; unknown modes use health).
    #[arg(long, default_value = "health")]
    mode: String,

    /// Form snapshot: a JSON file, or an inline JSON object. Field flags override its entries.
    #[arg(long)]
    snapshot: Option<String>,

    #[arg(long)]
    age: Option<String>,

    #[arg(long)]
    height: Option<String>,

    #[arg(long)]
    weight: Option<String>,

    #[arg(long)]
    waist: Option<String>,
}

impl SnapshotArgs {
    fn build(&self) -> anyhow::Result<vhds::Snapshot> {
        let mut snap = match &self.snapshot {
            Some(arg) => {
                let text = if arg.trim_start().starts_with('{') {
                    arg.clone()
                } else {
                    std::fs::read_to_string(arg)
                        .with_context(|| format!("read snapshot '{arg}'"))?
                };
                let value: serde_json::Value =
                    serde_json::from_str(&text).context("parse snapshot JSON")?;
                vhds::Snapshot::from_json_value(&value)
            }
            None => vhds::Snapshot::new(),
        };
        let fields = [
            ("age", &self.age),
            ("height", &self.height),
            ("weight", &self.weight),
            ("waist", &self.waist),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                snap.set(key, v.clone());
            }
        }
        Ok(snap)
    }
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: SnapshotArgs,

    /// Previous index, used for the trend.
    #[arg(long)]
    prev_index: Option<u8>,

    /// Analyze every mode and add the weighted overall index.
    #[arg(long)]
    all_modes: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: SnapshotArgs,

    /// Chart to draw.
    #[arg(long, value_enum)]
    chart: ChartChoice,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames to write.
    #[arg(long, default_value_t = 24)]
    frames: u64,

    /// Simulated display refresh rate driving the loop.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Logical surface width.
    #[arg(long = "surface-width", id = "surface_width", default_value_t = 520.0)]
    surface_width: f64,

    /// Logical surface height. `--height` is the snapshot field.
    #[arg(long = "surface-height", id = "surface_height", default_value_t = 420.0)]
    surface_height: f64,

    /// Device pixel ratio reported by the simulated host.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label font (TTF/OTF). Overrides the config.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Heatmap body image (PNG/JPEG/SVG). Overrides the config.
    #[arg(long)]
    background: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartChoice {
    Radar,
    Heatmap,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let snap = args.input.build()?;

    let encoded = if args.all_modes {
        let reports: Vec<_> = vhds::Mode::ALL
            .iter()
            .map(|m| vhds::analyze(m.key(), &snap, None))
            .collect();
        let overall = vhds::analyze_all(&snap, args.prev_index);
        serde_json::to_string_pretty(&serde_json::json!({
            "modes": reports,
            "overall": overall,
        }))
    } else {
        let report = vhds::analyze(&args.input.mode, &snap, args.prev_index);
        serde_json::to_string_pretty(&report)
    };
    let json = encoded.context("serialize report")?;

    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be positive"
    );

    let mut config = match &args.config {
        Some(path) => vhds::VhdsConfig::from_json_path(path)?,
        None => vhds::VhdsConfig::default(),
    };
    if args.font.is_some() {
        config.font = args.font.clone();
    }
    if let Some(bg) = &args.background {
        config.heatmap.silhouette = vhds::Silhouette::Image(bg.clone());
    }

    let snap = args.input.build()?;
    let report = vhds::analyze(&args.input.mode, &snap, None);
    let (surface, data) = match args.chart {
        ChartChoice::Radar => ("radar", vhds::ChartData::Radar((&report).into())),
        ChartChoice::Heatmap => (
            "heatmap",
            vhds::ChartData::Heatmap((&report.metrics).into()),
        ),
    };

    let mut controller = vhds::AnimationLoopController::from_config(&config);
    let mut backend = vhds::CpuBackend::new(config.backend_opts());
    let mut surfaces = vhds::SurfaceRegistry::new();
    surfaces.attach(
        surface,
        vhds::HostBox::new(args.surface_width, args.surface_height, args.dpr),
    );
    let mut sink = vhds::PngSequenceSink::new(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    controller.start(surface, data);

    let tick_ms = 1000.0 / args.fps;
    let mut written = 0u64;
    let mut tick = 0u64;
    // A throttled chart needs several ticks per frame; cap the run so a stuck loop cannot spin.
    let max_ticks = args.frames.saturating_mul(64).max(64);
    while written < args.frames && tick < max_ticks {
        let now_ms = tick as f64 * tick_ms;
        let report = controller.tick(now_ms, &mut surfaces, &mut backend, &mut sink);
        if let Some(id) = report.failed.first() {
            anyhow::bail!("frame failed on surface '{id}'");
        }
        written += report.rendered.len() as u64;
        tick += 1;
    }
    controller.stop_all();

    eprintln!(
        "wrote {written} frame(s) to {} ({} ticks)",
        sink.dir().display(),
        tick
    );
    Ok(())
}
