mod commands;
mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use calsheet_core::Settings;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "calsheet")]
#[command(about = "Turn a CSV event list into a printable HTML calendar or an .ics file")]
struct Cli {
    /// Settings file (defaults to ~/.config/calsheet/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the events as paginated HTML on stdout
    Render {
        /// CSV file with DATE, START, TITLE and TYPE columns
        csv: PathBuf,

        /// Events per page (defaults to render.page_size from settings)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,

        /// Only render this page (1-based)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page: Option<u64>,
    },
    /// Export the events as an .ics calendar on stdout
    Ics {
        /// CSV file with DATE, START, TITLE and TYPE columns
        csv: PathBuf,

        /// Omit the [TYPE] title prefix and descriptions
        #[arg(long)]
        internal: bool,
    },
    /// Show where settings come from and their effective values
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Render { csv, page_size, page } => {
            let page_size = match page_size {
                Some(size) => usize::try_from(size).context("--page-size is too large")?,
                None => settings.render.page_size,
            };
            let page = page
                .map(usize::try_from)
                .transpose()
                .context("--page is too large")?;
            commands::render::run(&csv, page_size, page, &settings)
        }
        Commands::Ics { csv, internal } => commands::ics::run(&csv, internal, &settings),
        Commands::Config => commands::config::run(&settings, cli.config.as_deref()),
    }
}
