//! Rejection sampling of non-overlapping item positions.
//!
//! Candidates are drawn uniformly so that the whole item square stays inside
//! the display. A candidate closer than the working separation to any earlier
//! position is rejected. Dense configurations can make the full separation
//! infeasible, so rejection is bounded by an [`AttemptBudget`]: every
//! `attempts_per_round` rejections the separation shrinks by `relax_factor`,
//! and below one pixel the next candidate is taken as is.

use crate::config::LayoutConfig;
use fovea_core::{Bounds, Position};
use rand::Rng;

/// Separation below which sampling stops rejecting
const MIN_RELAXED_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptBudget {
    pub attempts_per_round: usize,
    pub relax_factor: f32,
}

impl AttemptBudget {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            attempts_per_round: layout.attempts_per_round.max(1),
            relax_factor: layout.relax_factor,
        }
    }
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self::from_layout(&LayoutConfig::default())
    }
}

/// Accepted position and the separation it was checked against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub min_distance: f32,
    pub attempts: usize,
}

impl Placement {
    pub fn was_relaxed(&self, requested: f32) -> bool {
        self.min_distance < requested
    }
}

pub fn sample<R: Rng>(
    rng: &mut R,
    existing: &[Position],
    item_size: f32,
    min_distance: f32,
    bounds: Bounds,
    budget: &AttemptBudget,
) -> Placement {
    let max_x = (bounds.width - item_size).max(0.0);
    let max_y = (bounds.height - item_size).max(0.0);

    let mut working = min_distance;
    let mut attempts = 0;
    let mut in_round = 0;

    loop {
        let x = rng.random_range(0.0..=max_x);
        let y = rng.random_range(0.0..=max_y);
        let candidate = Position::new(x, y);
        attempts += 1;

        if working < MIN_RELAXED_DISTANCE || is_clear(&candidate, existing, working) {
            return Placement {
                position: candidate,
                min_distance: working,
                attempts,
            };
        }

        in_round += 1;
        if in_round >= budget.attempts_per_round {
            in_round = 0;
            working *= budget.relax_factor;
            tracing::warn!(
                placed = existing.len(),
                attempts,
                min_distance = working,
                "placement infeasible, relaxing separation"
            );
        }
    }
}

fn is_clear(candidate: &Position, existing: &[Position], min_distance: f32) -> bool {
    existing.iter().all(|p| candidate.distance(p) >= min_distance)
}
