mod app;
mod config;
mod effects;
mod ui;

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = config::Cli::parse();
    let config = config::AppConfig::from_cli(cli).context("refusing to start")?;

    news_logging::initialize(
        config.log_destination,
        config.log_level,
        std::path::Path::new(news_logging::DEFAULT_LOG_FILE),
    );

    app::run_app(config)
}
