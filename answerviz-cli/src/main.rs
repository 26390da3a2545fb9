use std::io::Write as _;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use answerviz::{
    Clock as _, CommandBackend, CounterIds, CpuBackend, FrameRGBA, ModelBackend, Playback,
    RenderSettings, RenderThreading, Responder, ResponderOpts, SanitizedAnswer, StaticBackend,
    SystemClock, VisualizationSpec, drive, evaluate, extract_json, parse_css_color, render_frame,
    render_frames_with, sanitize_text, sanitize_with_report,
};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "answerviz", version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and sanitize raw model output; print the canonical answer JSON.
    Sanitize(SanitizeArgs),
    /// Sanitize, validate, and list every repair that was needed.
    Check(InArgs),
    /// Print the render states at one point in time.
    Eval(EvalArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame of the animation as numbered PNGs.
    Render(RenderArgs),
    /// Play the animation in real time, one JSON line of render states per frame.
    Play(InArgs),
    /// Ask a model backend a question and print the completed answer.
    Ask(AskArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Raw model output (prose, fenced or bare JSON). `-` reads stdin.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SanitizeArgs {
    #[command(flatten)]
    input: InArgs,

    /// Also list repairs on stderr.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    #[command(flatten)]
    input: InArgs,

    /// Elapsed time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    t: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InArgs,

    /// Elapsed time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    t: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Background colour (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    #[arg(long)]
    background: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InArgs,

    /// Directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Background colour (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    #[arg(long)]
    background: Option<String>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Draw identical frames once per chunk.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// The question to answer.
    #[arg(long)]
    question: String,

    /// Model runner and its arguments; receives the question on stdin.
    #[arg(long, num_args = 1.., allow_hyphen_values = true, conflicts_with = "response_file")]
    command: Vec<String>,

    /// Replay a recorded model response instead of running a model.
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Give up on the model after this many milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Sanitize(args) => cmd_sanitize(args),
        Command::Check(args) => cmd_check(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
        Command::Ask(args) => cmd_ask(args),
    }
}

fn init_logging(verbose: u8) {
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

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("read input '{}'", path.display()))
}

fn candidate(raw: &str) -> Value {
    extract_json(raw).unwrap_or_else(|| {
        tracing::warn!("no structured data found in input; using default scene");
        Value::Null
    })
}

fn load_spec(input: &InArgs) -> anyhow::Result<VisualizationSpec> {
    let raw = read_input(&input.in_path)?;
    Ok(sanitize_with_report(&candidate(&raw)).0)
}

fn render_settings(background: Option<&str>) -> anyhow::Result<RenderSettings> {
    let Some(bg) = background else {
        return Ok(RenderSettings::default());
    };
    let c = parse_css_color(bg).with_context(|| format!("invalid background colour '{bg}'"))?;
    Ok(RenderSettings {
        clear_rgba: [c.r, c.g, c.b, c.a],
    })
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_sanitize(args: SanitizeArgs) -> anyhow::Result<()> {
    let raw = read_input(&args.input.in_path)?;
    let candidate = candidate(&raw);
    let (visualization, report) = sanitize_with_report(&candidate);
    let answer = SanitizedAnswer {
        text: sanitize_text(&candidate),
        visualization,
    };

    if args.report {
        for repair in report.iter() {
            eprintln!("{repair}");
        }
        eprintln!("{} repair(s)", report.len());
    }

    println!("{}", serde_json::to_string_pretty(&answer.to_wire()?)?);
    Ok(())
}

fn cmd_check(args: InArgs) -> anyhow::Result<()> {
    let raw = read_input(&args.in_path)?;
    let (spec, report) = sanitize_with_report(&candidate(&raw));

    match spec.validate() {
        Ok(()) => println!("valid: {} layer(s), {} ms", spec.layers.len(), spec.duration_ms),
        Err(e) => println!("invalid: {e}"),
    }
    if report.is_empty() {
        println!("clean: input was already canonical");
    } else {
        println!("{} repair(s):", report.len());
        for repair in report.iter() {
            println!("  {repair}");
        }
    }
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.input)?;
    let states = evaluate(&spec, args.t);
    println!("{}", serde_json::to_string_pretty(&states)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.input)?;
    let mut backend = CpuBackend::new(render_settings(args.background.as_deref())?);
    let frame = render_frame(&spec, args.t, &mut backend)?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.input)?;
    let mut backend = CpuBackend::new(render_settings(args.background.as_deref())?);
    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let stats = render_frames_with(&spec, &mut backend, &threading, |i, frame| {
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), &frame)?;
        Ok(())
    })?;

    eprintln!(
        "wrote {} frame(s) to {} ({} drawn, {} reused)",
        stats.frames_total,
        args.out_dir.display(),
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_play(args: InArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args)?;
    let clock = SystemClock::new();
    let mut playback = Playback::new();
    let ticket = playback.load(spec, clock.now_ms());

    let mut stdout = std::io::stdout().lock();
    let mut failure: Option<anyhow::Error> = None;
    let end = drive(&mut playback, ticket, &clock, |t_ms, states| {
        let written = serde_json::to_string(states)
            .map_err(anyhow::Error::from)
            .and_then(|states| {
                writeln!(stdout, "{{\"t\":{t_ms},\"states\":{states}}}")?;
                stdout.flush()?;
                Ok(())
            });
        match written {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                failure = Some(e);
                ControlFlow::Break(())
            }
        }
    });

    if let Some(e) = failure {
        return Err(e.context("write frame to stdout"));
    }
    tracing::debug!(state = ?end, "playback ended");
    Ok(())
}

fn cmd_ask(args: AskArgs) -> anyhow::Result<()> {
    let opts = ResponderOpts {
        timeout: Duration::from_millis(args.timeout_ms),
        ..ResponderOpts::default()
    };

    if let Some(path) = &args.response_file {
        let recorded = std::fs::read_to_string(path)
            .with_context(|| format!("read response file '{}'", path.display()))?;
        return ask_with(StaticBackend::new(recorded), &args.question, opts);
    }

    let Some((program, rest)) = args.command.split_first() else {
        anyhow::bail!("one of --command or --response-file is required");
    };
    ask_with(CommandBackend::new(program).args(rest), &args.question, opts)
}

fn ask_with<B>(backend: B, question: &str, opts: ResponderOpts) -> anyhow::Result<()>
where
    B: ModelBackend,
{
    let mut responder = Responder::with_opts(backend, CounterIds::new("answer"), opts);
    let answer = responder.ask(question);
    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}
