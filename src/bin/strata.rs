use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Session config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Choreography script JSON. The built-in logo reveal plays when omitted.
    #[arg(long, global = true)]
    script: Option<PathBuf>,

    /// Logo mesh JSON. A procedural ring is used when omitted.
    #[arg(long, global = true)]
    mesh: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play at a fixed step up to a time and write that frame as a PNG.
    Frame(FrameArgs),
    /// Play for a duration and write a numbered PNG sequence.
    Play(PlayArgs),
    /// Print the assembled vertex and fragment program.
    Shader,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Seconds of playback before the captured frame.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Simulated refresh rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Seconds to play.
    #[arg(long)]
    seconds: f64,

    /// Simulated refresh rate.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&cli.common, args),
        Command::Play(args) => cmd_play(&cli.common, args),
        Command::Shader => cmd_shader(&cli.common),
    }
}

fn bootstrap(common: &CommonArgs) -> anyhow::Result<strata::Session> {
    let config = match &common.config {
        Some(path) => strata::SessionConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => strata::SessionConfig::default(),
    };
    let script = match &common.script {
        Some(path) => strata::ScriptDef::load(path)
            .with_context(|| format!("load script '{}'", path.display()))?,
        None => strata::logo_reveal(),
    };
    let session = match &common.mesh {
        Some(path) => {
            strata::Session::bootstrap(config, &script, &strata::MeshFile::new(path))
        }
        None => strata::Session::bootstrap(config, &script, &strata::ProceduralLogo::default()),
    }
    .context("bootstrap session")?;
    Ok(session)
}

fn step_count(seconds: f64, fps: f64) -> anyhow::Result<u64> {
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("--fps must be a positive number");
    }
    if !(seconds.is_finite() && seconds >= 0.0) {
        anyhow::bail!("duration must be a non-negative number of seconds");
    }
    Ok(((seconds * fps).round() as u64).max(1))
}

fn cmd_frame(common: &CommonArgs, args: FrameArgs) -> anyhow::Result<()> {
    let steps = step_count(args.at, args.fps)?;
    let mut driver = bootstrap(common)?.into_driver(strata::FixedStep::from_fps(args.fps));

    let mut last = driver.tick();
    for _ in 1..steps {
        last = driver.tick();
    }

    write_png(&args.out, &last.frame)?;
    eprintln!(
        "wrote {} (t={:.3}s, passes: {})",
        args.out.display(),
        last.play_head,
        last.applied.join(", ")
    );
    Ok(())
}

fn cmd_play(common: &CommonArgs, args: PlayArgs) -> anyhow::Result<()> {
    let steps = step_count(args.seconds, args.fps)?;
    let mut driver = bootstrap(common)?.into_driver(strata::FixedStep::from_fps(args.fps));

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for _ in 0..steps {
        let out = driver.tick();
        let path = args.out_dir.join(format!("frame_{:05}.png", out.index));
        write_png(&path, &out.frame)?;
    }

    eprintln!("wrote {steps} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_shader(common: &CommonArgs) -> anyhow::Result<()> {
    let session = bootstrap(common)?;
    let program = session.program();
    println!("// vertex");
    println!("{}", program.vertex);
    println!("// fragment");
    println!("{}", program.fragment);
    println!("// fingerprint {:016x}", program.fingerprint());
    Ok(())
}

fn write_png(path: &Path, frame: &strata::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
