//! `readably` CLI - Inspect readable blocks and hover geometry of HTML files

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use readably::Point;

#[derive(Parser)]
#[command(name = "readably")]
#[command(about = "Find the readable text blocks of an HTML document")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/readably/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Flags that adjust the exclusion list on top of the config file.
#[derive(clap::Args, Debug, Default)]
pub struct ExclusionArgs {
    /// Additional tag to exclude (repeatable)
    #[arg(short, long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,

    /// Tag to allow even if excluded by default or config (repeatable)
    #[arg(short, long = "include", value_name = "TAG")]
    pub include: Vec<String>,

    /// Start from an empty exclusion list instead of the built-in one
    #[arg(long)]
    pub no_default_exclusions: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the top-level readable elements of a document
    Classify {
        /// HTML file to read ("-" for stdin)
        input: String,

        #[command(flatten)]
        exclusions: ExclusionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Hover the readable element under a viewport point
    Probe {
        /// HTML file to read ("-" for stdin)
        input: String,

        /// JSON layout fixture with element boxes and scroll offset
        #[arg(short, long)]
        layout: PathBuf,

        /// Viewport point as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,

        /// Clear hover state when the pointer leaves (overrides config)
        #[arg(long)]
        clear_on_leave: bool,

        #[command(flatten)]
        exclusions: ExclusionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the effective exclusion list
    Exclusions {
        #[command(flatten)]
        exclusions: ExclusionArgs,
    },
}

fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("invalid X '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("invalid Y '{y}': {e}"))?;
    Ok(Point::new(x, y))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so JSON on stdout stays clean)
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("READABLY_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = cmd::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify {
            input,
            exclusions,
            format,
        } => {
            cmd::classify::cmd_classify(&input, &config, &exclusions, format)?;
        }
        Commands::Probe {
            input,
            layout,
            at,
            clear_on_leave,
            exclusions,
            format,
        } => {
            let leave = if clear_on_leave {
                readably::LeaveBehavior::Clear
            } else {
                config.hover.leave
            };
            cmd::probe::cmd_probe(&input, &layout, at, leave, &config, &exclusions, format)?;
        }
        Commands::Exclusions { exclusions } => {
            cmd::exclusions::cmd_exclusions(&config, &exclusions);
        }
    }

    Ok(())
}
