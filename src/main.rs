use std::env;

use mountforge::cli;
use mountforge::config::{AppConfig, DEFAULT_LOG_FILTER};

fn main() {
    let config = AppConfig::from_env();
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
