//! Tikloader - TikTok video downloader
//!
//! Recognizes a TikTok link, looks it up through the tikwm API and saves the
//! chosen variant into the downloads folder.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tikloader::downloader::{DownloadConfig, DownloadEngine, DownloadOutcome, DownloadProgress, DownloadStatus, Handoff};
use tikloader::extractor::{recognize, TikwmExtractor, VideoInfo};
use tikloader::utils::clipboard::get_clipboard_content;
use tikloader::utils::{format_bytes, format_duration, format_number, AppSettings};
use tikloader::{OptionSelector, Session};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "tikloader", version, about = "Download TikTok videos without watermark")]
struct Args {
    /// TikTok video link
    url: Option<String>,

    /// Read the link from the clipboard
    #[arg(long)]
    paste: bool,

    /// Variant to download: 1-based index, hd, sd, wm or audio
    #[arg(short, long, default_value = "best")]
    format: OptionSelector,

    /// Output directory (default: ~/Downloads/tikloader)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show metadata and download options only
    #[arg(long)]
    info: bool,

    /// Print metadata as JSON and exit
    #[arg(long)]
    json: bool,

    /// Send the link upstream even if it is not recognized
    #[arg(long)]
    force: bool,

    /// Print the asset URL instead of opening a browser when a download fails
    #[arg(long)]
    no_browser: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stderr keeps stdout clean for --json
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let input = match (&args.url, args.paste) {
        (Some(url), _) => url.trim().to_string(),
        (None, true) => get_clipboard_content()?,
        (None, false) => bail!("No link given. Pass a TikTok URL or use --paste"),
    };

    match recognize(&input) {
        Some(link) => debug!("Recognized {:?} link with id {}", link.kind, link.id),
        None if args.force => warn!("Link not recognized, sending it anyway"),
        None => bail!(
            "Not a recognized TikTok link: {} (use --force to send it anyway)",
            input
        ),
    }

    let mut settings = AppSettings::default();
    if let Some(dir) = args.output {
        settings.download_location = dir;
    }
    if args.no_browser {
        settings.open_in_browser = false;
    }

    let extractor = TikwmExtractor::new(&settings)?;
    debug!("Metadata endpoint: {}", extractor.endpoint());
    let engine = DownloadEngine::new(DownloadConfig::from_settings(&settings))?;
    debug!("Saving into {:?}", engine.output_dir());
    let mut session = Session::new(extractor, engine);

    let info = session.fetch(&input).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }
    print_summary(info);
    if args.info {
        return Ok(());
    }
    if !info.has_downloads() {
        bail!("No downloadable media found for this video");
    }

    let (progress_tx, mut progress_rx) = mpsc::channel::<DownloadProgress>(100);

    // Spawn progress reporter
    let printer = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            eprint!("\r{:>3}% {:<12}", progress.percent, status_label(&progress.status));
            if progress.is_finished() {
                eprintln!();
            }
        }
    });

    let outcome = session.download(args.format, Some(progress_tx)).await;
    if let Err(e) = printer.await {
        warn!("Progress printer stopped: {}", e);
    }

    match outcome? {
        DownloadOutcome::Saved { path, bytes } => {
            println!("Saved {} ({})", path.display(), format_bytes(bytes));
        }
        DownloadOutcome::Fallback {
            handoff, reason, ..
        } => {
            eprintln!("Direct download failed: {}", reason);
            if handoff == Handoff::Browser {
                println!("Opened the file in your browser; save it from there.");
            }
        }
    }

    Ok(())
}

fn print_summary(info: &VideoInfo) {
    println!("Title:    {}", info.title);
    println!("Author:   {}", info.author);
    println!(
        "Duration: {}   Views: {}   Likes: {}",
        format_duration(info.duration),
        format_number(info.views),
        format_number(info.likes)
    );
    if info.downloads.is_empty() {
        println!("No download options");
        return;
    }
    println!("Options:");
    for (i, option) in info.downloads.iter().enumerate() {
        println!(
            "  {}. {:<26} {:<4} {}",
            i + 1,
            option.quality,
            option.format,
            option.size
        );
    }
}

fn status_label(status: &DownloadStatus) -> &'static str {
    match status {
        DownloadStatus::Initializing => "starting",
        DownloadStatus::Downloading => "downloading",
        DownloadStatus::Saving => "saving",
        DownloadStatus::Completed => "done",
        DownloadStatus::HandedOff => "handed off",
    }
}
