use crate::error::ExperimentError;
use serde::{Deserialize, Serialize};

/// Placement parameters for one search display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub item_counts: Vec<usize>,
    pub item_size: f32,
    pub margin: f32,
    /// Rejected candidates tolerated before the separation is relaxed
    pub attempts_per_round: usize,
    /// Factor applied to the working separation after each failed round
    pub relax_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_counts: vec![1, 2, 4, 8, 16],
            item_size: 60.0,
            margin: 10.0,
            attempts_per_round: 500,
            relax_factor: 0.9,
        }
    }
}

impl LayoutConfig {
    pub fn min_distance(&self) -> f32 {
        self.item_size + self.margin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub layout: LayoutConfig,
    pub target_present_probability: f64,
    pub feedback_delay_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            target_present_probability: 0.5,
            feedback_delay_ms: 1000,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ExperimentError> {
        let layout = &self.layout;
        if layout.item_counts.is_empty() {
            return Err(invalid("layout.item_counts must not be empty"));
        }
        if layout.item_counts.contains(&0) {
            return Err(invalid("layout.item_counts must be positive"));
        }
        if !(layout.item_size > 0.0) {
            return Err(invalid("layout.item_size must be positive"));
        }
        if !(layout.margin >= 0.0) {
            return Err(invalid("layout.margin must not be negative"));
        }
        if layout.attempts_per_round == 0 {
            return Err(invalid("layout.attempts_per_round must be at least 1"));
        }
        if !(layout.relax_factor > 0.0 && layout.relax_factor < 1.0) {
            return Err(invalid("layout.relax_factor must lie in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.target_present_probability) {
            return Err(invalid("target_present_probability must lie in [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ExperimentError {
    ExperimentError::InvalidConfig(msg.to_string())
}
