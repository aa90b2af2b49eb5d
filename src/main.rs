use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use retro_resume::game::GameConfig;
use retro_resume::modes::ArcadeMode;
use retro_resume::render::{Theme, ThemeKind};
use retro_resume::resume::{export, ExportFormat, Resume};

#[derive(Parser)]
#[command(name = "retro-resume")]
#[command(version, about = "8-bit resume with a game of Snake behind it")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,

    /// Log file; the terminal itself belongs to the game
    #[arg(long, global = true, default_value = "retro-resume.log")]
    log_file: PathBuf,

    /// Log verbosity
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Play with the resume (default)
    Play(PlayArgs),
    /// Write an ATS-friendly copy of the resume
    Export(ExportArgs),
}

#[derive(Args, Clone)]
struct PlayArgs {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terminal columns per grid cell
    #[arg(long)]
    cell_width: Option<u16>,

    /// Terminal rows per grid cell
    #[arg(long)]
    cell_height: Option<u16>,

    /// Snake moves per second
    #[arg(long)]
    speed: Option<f64>,

    /// Touch profile: tap the message to start/pause, on-screen direction pad
    #[arg(long)]
    touch: bool,

    /// RNG seed for a reproducible snake
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value = "dark")]
    theme: ThemeKind,

    /// Resume JSON file (defaults to the built-in resume)
    #[arg(long)]
    resume: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    /// Output path (defaults to public/resume.txt or public/resume.md)
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    format: ExportFormat,

    /// Resume JSON file (defaults to the built-in resume)
    #[arg(long)]
    resume: Option<PathBuf>,
}

impl PlayArgs {
    /// Config file (or defaults) with command-line overrides applied
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }
        if let Some(cell_height) = self.cell_height {
            config.cell_height = cell_height;
        }
        if let Some(speed) = self.speed {
            config.moves_per_second = speed;
        }
        if self.touch {
            config.touch = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        cli.log_level,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?,
    )
    .context("Failed to initialize logger")?;

    // Dispatch to appropriate mode
    match cli.command {
        Some(Command::Export(args)) => run_export(args),
        Some(Command::Play(args)) => run_play(args).await,
        None => run_play(cli.play).await,
    }
}

async fn run_play(args: PlayArgs) -> Result<()> {
    let config = args.game_config()?;
    let resume = Resume::load(args.resume.as_deref())?;
    let (cols, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;

    info!("Starting retro-resume for {}", resume.basics.name);
    let mut arcade = ArcadeMode::new(config, &resume, Theme::new(args.theme), cols, rows);
    arcade.run().await
}

fn run_export(args: ExportArgs) -> Result<()> {
    let resume = Resume::load(args.resume.as_deref())?;
    let output = args
        .output
        .unwrap_or_else(|| args.format.default_path());

    let report = export(&resume, args.format, &output)?;
    println!(
        "Wrote {} ({} lines, {} bytes)",
        report.path.display(),
        report.lines,
        report.bytes
    );
    Ok(())
}
