mod config;
mod data;
mod error;
mod report;
mod session;
mod ui;

use std::io;

use config::Config;
use session::Session;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    log::info!("reading trip logs from {}", config.data_dir.display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(config, stdin.lock(), stdout.lock()).run()
}
