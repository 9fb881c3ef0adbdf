mod app;
mod cli;
mod config;
mod logging;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::Cli;
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_filter.as_deref());

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.windowed {
        config.display.fullscreen = false;
    }
    if cli.debug_cursor {
        config.display.debug_cursor_ring = true;
    }
    if let Some(font) = cli.font {
        config.display.font_path = Some(font);
    }
    tracing::debug!(?config, "configuration resolved");

    App::new(config, cli.seed)?.run()
}
