use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollscene_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollscene")]
#[command(author, version, about = "Scroll-driven scene orchestration simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (default: ~/.config/scrollscene/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scroll sweep over the configured page and print scene events
    Simulate {
        /// Scroll position to sweep to (default: end of the page)
        #[arg(long)]
        to: Option<f64>,
        /// Pixels scrolled per frame
        #[arg(long, default_value_t = 50.0)]
        step: f64,
        /// Sweep back to the top afterwards
        #[arg(long)]
        back: bool,
        /// Use the smoothed scrolling backend
        #[arg(long)]
        smooth: bool,
        /// Viewport width used to pick the breakpoint (default: page width)
        #[arg(long)]
        width: Option<f64>,
        /// Also print progress and update events
        #[arg(long)]
        progress: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and report scene diagnostics
    Check,
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init needs no existing configuration
    if let Some(Commands::Init { force }) = cli.command {
        init_logging("info");
        let path = cli.config.unwrap_or_else(AppConfig::config_path);
        return commands::init::run(&path, force);
    }

    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.general.log_level);

    match cli.command {
        Some(Commands::Simulate {
            to,
            step,
            back,
            smooth,
            width,
            progress,
            json,
        }) => {
            let args = commands::simulate::SimulateArgs {
                to,
                step,
                back,
                smooth,
                width,
                progress,
                json,
            };
            commands::simulate::run(&config, args).await
        }
        Some(Commands::Check) | None => commands::check::run(&config),
        Some(Commands::Init { .. }) => Ok(()),
    }
}

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
