//! tikdl - paste a TikTok link, watch it get "processed"
//!
//! A simulated downloader: the link is checked, a scripted sequence of
//! status messages plays, and a made-up preview card is printed.

use std::io::{BufRead, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use tikdl::core::pipeline::Pipeline;
use tikdl::core::session::Session;
use tikdl::error::TikdlError;
use tikdl::storage::config;
use tikdl::types::QualityOption;
use tikdl::ui::prompt::{pick_quality, prompt_url};
use tikdl::ui::render::{SpinnerSink, format_card};
use tikdl::utils::logging;

/// Delay divisor for --fast
const FAST_FACTOR: u32 = 10;

/// Paste a TikTok link, watch it get "processed".
#[derive(Parser, Debug)]
#[command(name = "tikdl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TikTok video URL (prompted for when omitted)
    url: Option<String>,

    /// Output quality: fhd, hd, sd or mp3
    #[arg(short, long, value_parser = parse_quality)]
    quality: Option<QualityOption>,

    /// Print the result as JSON instead of a card
    #[arg(long)]
    json: bool,

    /// Shorten every step
    #[arg(long)]
    fast: bool,

    /// Edit the configuration file
    #[arg(short, long)]
    edit: bool,
}

fn parse_quality(s: &str) -> Result<QualityOption, String> {
    s.parse().map_err(|e: TikdlError| e.to_string())
}

/// URL from the argument, a prompt, or a line of piped stdin
fn read_url(cli: &Cli, interactive: bool) -> anyhow::Result<String> {
    if let Some(ref url) = cli.url {
        return Ok(url.clone());
    }
    if interactive {
        return Ok(prompt_url()?);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Send panic reports to the log instead of the terminal; a failed run
/// already prints its own message.
fn log_panics() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }
    log_panics();

    match run(cli).await {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red(), err);
            let status = err
                .downcast_ref::<TikdlError>()
                .map(|e| e.code().exit_status())
                .unwrap_or(1);
            ExitCode::from(status)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Handle --edit flag before anything that could reject the config
    if cli.edit {
        let editor = config::resolve_editor().await;
        config::edit_config(&editor).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = config::load_config().await?;
    if !cfg.color {
        colored::control::set_override(false);
    }

    let mut pipeline = Pipeline::from_config(cfg.steps.as_deref())?;
    if cli.fast {
        pipeline = pipeline.scaled(FAST_FACTOR);
    }

    let interactive = std::io::stdin().is_terminal();
    let url = read_url(&cli, interactive)?;

    let session = Session::new(pipeline, cfg.default_quality);
    let quality = match cli.quality {
        Some(q) => Some(q),
        None if interactive => pick_quality(cfg.default_quality)?,
        None => None,
    };
    if let Some(quality) = quality {
        let label = session.select_quality(quality);
        eprintln!("{}", label.dimmed());
    }

    let sink = SpinnerSink::new();
    match session.submit(&url, &sink).await {
        Ok(Some(record)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", format_card(&record));
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        // Already reported through the sink
        Err(err) => Ok(ExitCode::from(err.code().exit_status())),
    }
}
