use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "metaloop", version)]
struct Cli {
    /// Log debug events (planned paths and elements) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one scene description as JSON.
    Generate(GenerateArgs),
    /// Generate numbered loops into a directory, seeds counting up from the base seed.
    Batch(BatchArgs),
    /// Print the host operations that would build the scene.
    Ops(GenerateArgs),
}

#[derive(Parser, Debug)]
struct LoopArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed seed. Seeds from the clock when absent.
    #[arg(long)]
    seed: Option<metaloop::Seed>,

    #[arg(long)]
    fps: Option<u32>,

    /// Loop length in seconds.
    #[arg(long)]
    seconds: Option<u32>,

    /// Number of metaballs.
    #[arg(long)]
    count: Option<usize>,

    /// Project name used in the render output path.
    #[arg(long)]
    project: Option<String>,

    #[arg(long)]
    no_background: bool,

    #[arg(long)]
    no_glow: bool,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    loop_args: LoopArgs,

    /// Output path; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    #[command(flatten)]
    loop_args: LoopArgs,

    /// Number of loops to generate.
    #[arg(long)]
    loops: u32,

    /// Directory receiving `loop_{i}.json`.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Ops(args) => cmd_ops(args),
    }
}

fn resolve_config(args: &LoopArgs) -> anyhow::Result<metaloop::LoopConfig> {
    let mut cfg = match &args.config {
        Some(path) => metaloop::LoopConfig::load(path)?,
        None => metaloop::LoopConfig::default(),
    };

    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(seconds) = args.seconds {
        cfg.loop_seconds = seconds;
    }
    if let Some(count) = args.count {
        cfg.metaball_count = count;
    }
    if let Some(project) = &args.project {
        cfg.project_name = project.clone();
    }
    if args.no_background {
        cfg.include_background = false;
    }
    if args.no_glow {
        cfg.include_glow = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn resolve_seed(cfg: &metaloop::LoopConfig) -> metaloop::Seed {
    let seed = match cfg.seed {
        Some(seed) => seed,
        None => metaloop::seed_from_clock().0,
    };
    eprintln!("seed {seed}");
    seed
}

fn write_output(out: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, contents)
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.loop_args)?;
    let seed = resolve_seed(&cfg);
    let scene = metaloop::generate_scene(seed, &cfg)?;
    write_output(args.out.as_deref(), &scene.to_json_pretty()?)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    if args.loops == 0 {
        anyhow::bail!("--loops must be > 0");
    }
    let cfg = resolve_config(&args.loop_args)?;
    let seed = resolve_seed(&cfg);
    let scenes = metaloop::generate_batch(seed, &cfg, args.loops)?;

    for (i, scene) in scenes.iter().enumerate() {
        let path = args.out_dir.join(format!("loop_{i}.json"));
        write_output(Some(&path), &scene.to_json_pretty()?)?;
    }
    Ok(())
}

fn cmd_ops(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.loop_args)?;
    let seed = resolve_seed(&cfg);
    let scene = metaloop::generate_scene(seed, &cfg)?;

    let mut host = metaloop::RecordingHost::new();
    scene.replay(&mut host)?;
    let json = serde_json::to_string_pretty(host.ops()).context("serialize host ops")?;
    write_output(args.out.as_deref(), &json)
}
