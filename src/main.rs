use clap::Parser;
use rosterget::core::config::{self, RosterConfig};
use rosterget::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rosterget",
    version,
    about = "Search community rosters in a spreadsheet from the terminal"
)]
struct Args {
    /// Spreadsheet or CSV file to load on startup
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // The config names the log file, so it is read before logging starts;
    // a load failure is reported once the logger is up.
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (RosterConfig::default(), Some(e)),
    };
    let config = config::resolve(&file_config);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    log::info!("rosterget {} starting up", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        log::warn!("Config error, using defaults: {}", e);
    }
    log::debug!("Resolved config: {:?}", config);

    tui::run(config, args.file)
}
