use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fovea", about = "Gaze-contingent T/L visual search task", version)]
pub struct Cli {
    /// TOML file with [experiment], [mask] and [display] tables
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run in a window instead of borderless fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Draw a red ring at the focus point
    #[arg(long)]
    pub debug_cursor: bool,

    /// TTF/OTF used for feedback and button labels
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Seed for layout generation, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Explicit tracing filter directive, overrides --log-level and RUST_LOG
    /// e.g. "fovea_experiment=trace,fovea::trial_events=info"
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_fullscreen_without_overrides() {
        let cli = Cli::parse_from(["fovea"]);
        assert!(!cli.windowed);
        assert!(!cli.debug_cursor);
        assert!(cli.config.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_from([
            "fovea",
            "--config",
            "task.toml",
            "--windowed",
            "--debug-cursor",
            "--font",
            "DejaVuSans.ttf",
            "--seed",
            "42",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("task.toml")));
        assert!(cli.windowed && cli.debug_cursor);
        assert_eq!(cli.font, Some(PathBuf::from("DejaVuSans.ttf")));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
