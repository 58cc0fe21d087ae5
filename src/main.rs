use clap::Parser;
use docchat::core::config::{self, DEFAULT_LOG_FILE, DocchatConfig};
use docchat::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docchat", about = "Terminal chat client for a document Q&A service")]
struct Args {
    /// Base URL of the chat service (overrides config and DOCCHAT_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Where to write the log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Debug
    };

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("docchat: {e}; using defaults");
        log::warn!("Falling back to default config: {}", e);
        DocchatConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    log::info!(
        "docchat starting up against {} (history window {})",
        resolved.base_url,
        resolved.history_window
    );

    tui::run(resolved)
}
