use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::process::ExitCode;

use tulcea_guide::cli::{self, Args};
use tulcea_guide::core::config;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ~/.tulcea/tulcea.log (or ./tulcea.log)
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_path = match config::config_dir() {
        Some(dir) if fs::create_dir_all(&dir).is_ok() => dir.join("tulcea.log"),
        _ => "tulcea.log".into(),
    };

    if let Ok(log_file) = File::options().create(true).append(true).open(&log_path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    log::info!("Tulcea guide starting: {:?}", args.command);

    cli::run(args).await
}
