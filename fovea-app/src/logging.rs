use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Targets that make up "our" logs.
const OUR_CRATES: &[&str] = &[
    "fovea",
    "fovea_app",
    "fovea_experiment",
    "fovea_render",
    "fovea_timing",
];

pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    OUR_CRATES
        .iter()
        .map(|t| format!("{t}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter precedence: `--log-filter`, then `--log-level`, then `RUST_LOG`,
/// then `info` for our crates.
pub fn compute_spec(log_level: Option<&str>, log_filter: Option<&str>) -> String {
    if let Some(filter) = log_filter {
        return filter.to_string();
    }
    if let Some(level) = log_level {
        return level_spec_for(level);
    }
    match env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => spec,
        _ => level_spec_for("info"),
    }
}

pub fn init(log_level: Option<&str>, log_filter: Option<&str>) {
    let spec = compute_spec(log_level, log_filter);
    let filter = EnvFilter::try_new(&spec).unwrap_or_else(|e| {
        eprintln!("invalid log filter {spec:?} ({e}), falling back to info");
        EnvFilter::new(level_spec_for("info"))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
