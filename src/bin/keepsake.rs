use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use keepsake::{
    ArtifactFactory, ArtifactStyle, CaptureStrategyPreference, Clock, DirectoryLibrary,
    DownloadOrchestrator, ExportRequest, ExportSettings, FontBook, JournalRecord, ManualClock,
    OffscreenRenderer, OutputFormat, Photo, PixelSize, QualityResolver, QualityTier, RenderBranch,
    SystemClock, Weather, init_logging, render_artifact,
};

#[derive(Parser, Debug)]
#[command(name = "keepsake", version, about = "Render and export journal artifacts")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Settings JSON file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Capture strategy: auto, snapshot or hosted.
    #[arg(long, global = true)]
    strategy: Option<CaptureStrategyPreference>,

    /// Extra font directory.
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Log filter (overridden by `RUST_LOG`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON logs.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every style with its output size at a quality tier.
    Styles(StylesArgs),
    /// Render one artifact straight to an image file.
    Render(RenderArgs),
    /// Run a full export into a directory-backed photo library.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct StylesArgs {
    /// Quality tier used for the output size column.
    #[arg(long)]
    quality: Option<QualityTier>,

    /// Print rows as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Journal record JSON (`id`, `style`, `content`, `mood`, optional `weather` and `date`).
    #[arg(long)]
    record: Option<PathBuf>,

    /// Artifact style (overrides the record's).
    #[arg(long)]
    style: Option<ArtifactStyle>,

    /// Entry text.
    #[arg(long)]
    content: Option<String>,

    /// Mood tag.
    #[arg(long)]
    mood: Option<String>,

    /// Record identifier.
    #[arg(long, default_value = "entry")]
    id: String,

    /// Display date.
    #[arg(long)]
    date: Option<String>,

    /// Weather tag (sunny, cloudy, rainy, snowy, windy, stormy, foggy).
    #[arg(long, value_parser = parse_weather)]
    weather: Option<Weather>,

    /// Photo file to attach (repeatable; the first one is shown).
    #[arg(long)]
    photo: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    record: RecordArgs,

    /// Quality tier.
    #[arg(long)]
    quality: Option<QualityTier>,

    /// Output format (defaults to the output file extension).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    record: RecordArgs,

    /// Quality tier.
    #[arg(long)]
    quality: Option<QualityTier>,

    /// Output format.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Library directory (created on first use).
    #[arg(long)]
    library: PathBuf,

    /// Account for the animation settle wait without sleeping.
    #[arg(long)]
    no_wait: bool,
}

#[derive(serde::Serialize)]
struct StyleRow {
    style: ArtifactStyle,
    collection: &'static str,
    design_width: f64,
    design_height: f64,
    extra_scale: f64,
    branch: RenderBranch,
    animation_delay_secs: f64,
    output: PixelSize,
    long_format: bool,
    needs_shrink: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logging(&settings.logging);

    match cli.cmd {
        Command::Styles(args) => cmd_styles(args, &settings),
        Command::Render(args) => cmd_render(args, &settings),
        Command::Export(args) => cmd_export(args, &settings),
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<ExportSettings> {
    let base = match &cli.config {
        Some(path) => ExportSettings::from_path(path)?,
        None => ExportSettings::default(),
    };
    let mut settings = base.apply_env()?;
    if let Some(strategy) = cli.strategy {
        settings.capture_strategy = strategy;
    }
    if let Some(dir) = &cli.fonts_dir {
        settings.fonts_dir = Some(dir.clone());
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if cli.log_json {
        settings.logging.json = true;
    }
    settings.validate()?;
    Ok(settings)
}

fn parse_weather(s: &str) -> Result<Weather, String> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
        .map_err(|_| format!("unknown weather '{s}'"))
}

fn load_record(args: &RecordArgs) -> anyhow::Result<JournalRecord> {
    let mut record = match &args.record {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read record '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse record '{}'", path.display()))?
        }
        None => {
            let style = args
                .style
                .context("either --record or --style is required")?;
            JournalRecord::new(args.id.clone(), style, "", "")
        }
    };

    if let Some(style) = args.style {
        record.style = style;
    }
    if let Some(content) = &args.content {
        record.content = content.clone();
    }
    if let Some(mood) = &args.mood {
        record.mood = mood.clone();
    }
    if let Some(date) = &args.date {
        record.date = Some(date.clone());
    }
    if let Some(weather) = args.weather {
        record.weather = Some(weather);
    }
    for path in &args.photo {
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        record.photos.push(Photo::from_bytes(bytes));
    }
    Ok(record)
}

fn format_for_path(path: &Path) -> OutputFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or(OutputFormat::Png)
}

fn cmd_styles(args: StylesArgs, settings: &ExportSettings) -> anyhow::Result<()> {
    let quality = args.quality.unwrap_or(settings.default_quality);
    let mut rows = Vec::with_capacity(ArtifactStyle::ALL.len());
    for style in ArtifactStyle::ALL {
        let config = QualityResolver::final_config(style, quality, settings.default_format);
        let report = config.layout_report(settings.safe_bound_px);
        let render = style.render_config();
        rows.push(StyleRow {
            style,
            collection: style.collection().title(),
            design_width: config.spec.design_width,
            design_height: config.spec.design_height,
            extra_scale: config.spec.extra_scale,
            branch: style.render_branch(),
            animation_delay_secs: render.animation_delay_secs,
            output: config.output_size()?,
            long_format: report.is_long_format,
            needs_shrink: report.needs_shrink,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<16} {:<20} {:>9} {:>6} {:<13} {:>5} {:>11}  flags",
        "style", "collection", "design", "extra", "branch", "delay", quality.to_string()
    );
    for row in &rows {
        let mut flags = Vec::new();
        if row.long_format {
            flags.push("long");
        }
        if row.needs_shrink {
            flags.push("shrink");
        }
        println!(
            "{:<16} {:<20} {:>9} {:>6.2} {:<13} {:>5.1} {:>11}  {}",
            row.style.name(),
            row.collection,
            format!("{}x{}", row.design_width, row.design_height),
            row.extra_scale,
            row.branch.to_string(),
            row.animation_delay_secs,
            row.output.to_string(),
            flags.join(",")
        );
    }
    Ok(())
}

fn cmd_render(args: RenderArgs, settings: &ExportSettings) -> anyhow::Result<()> {
    let record = load_record(&args.record)?;
    let style = record.style;
    let quality = args.quality.unwrap_or(settings.default_quality);
    let format = args.format.unwrap_or_else(|| format_for_path(&args.out));

    let fonts = FontBook::with_dir(settings.fonts_dir.as_deref());
    let renderer = OffscreenRenderer::detect(settings.capture_strategy, fonts.clone())?;

    let config = QualityResolver::final_config(style, quality, format);
    let rendered = render_artifact(
        &ArtifactFactory::new(),
        &renderer,
        &fonts,
        &ManualClock::new(),
        &record,
        &config,
    )?;
    let encoded = settings.encoder().encode(
        &rendered.bitmap,
        format,
        style.render_config().background_color,
    )?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &encoded.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} {}, {})",
        args.out.display(),
        encoded.size(),
        encoded.format,
        renderer.strategy_kind()
    );
    Ok(())
}

fn cmd_export(args: ExportArgs, settings: &ExportSettings) -> anyhow::Result<()> {
    let record = load_record(&args.record)?;
    let quality = args.quality.unwrap_or(settings.default_quality);
    let format = args.format.unwrap_or(settings.default_format);

    let clock: Arc<dyn Clock> = if args.no_wait {
        Arc::new(ManualClock::new())
    } else {
        Arc::new(SystemClock::start())
    };
    let orchestrator = DownloadOrchestrator::from_settings(
        settings,
        Arc::new(ArtifactFactory::new()),
        Arc::new(DirectoryLibrary::new(&args.library)),
        clock,
    )?;

    let result = orchestrator.export(ExportRequest::new(record, quality, format));
    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}
