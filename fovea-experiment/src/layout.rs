use crate::config::LayoutConfig;
use crate::sampler::{self, AttemptBudget};
use fovea_core::{Bounds, Position, Rotation, StimulusSpec};
use rand::Rng;

/// Stimuli of one trial plus the facts needed to score it
#[derive(Debug, Clone, PartialEq)]
pub struct TrialLayout {
    pub items: Vec<StimulusSpec>,
    pub is_target_present: bool,
    pub target_index: Option<usize>,
    pub num_items: usize,
}

impl TrialLayout {
    /// Index of the item under `(x, y)`. Later items are drawn on top, so they win.
    pub fn item_at(&self, x: f32, y: f32, item_size: f32) -> Option<usize> {
        self.items.iter().rposition(|item| item.contains(x, y, item_size))
    }

    pub fn target_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_target).count()
    }
}

#[derive(Debug, Clone)]
pub struct StimulusSetBuilder {
    layout: LayoutConfig,
    target_present_probability: f64,
    budget: AttemptBudget,
}

impl StimulusSetBuilder {
    pub fn new(layout: LayoutConfig, target_present_probability: f64) -> Self {
        let budget = AttemptBudget::from_layout(&layout);
        Self {
            layout,
            target_present_probability,
            budget,
        }
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn build_trial<R: Rng>(&self, rng: &mut R, bounds: Bounds) -> TrialLayout {
        let is_target_present = rng.random_bool(self.target_present_probability);
        let counts = &self.layout.item_counts;
        let num_items = counts[rng.random_range(0..counts.len())];
        let target_index = is_target_present.then(|| rng.random_range(0..num_items));

        self.build_with(rng, bounds, num_items, target_index)
    }

    /// Materialises `num_items` stimuli with the target (if any) at `target_index`.
    pub fn build_with<R: Rng>(
        &self,
        rng: &mut R,
        bounds: Bounds,
        num_items: usize,
        target_index: Option<usize>,
    ) -> TrialLayout {
        let min_distance = self.layout.min_distance();
        let mut positions: Vec<Position> = Vec::with_capacity(num_items);
        let mut items = Vec::with_capacity(num_items);

        for index in 0..num_items {
            let placement = sampler::sample(
                rng,
                &positions,
                self.layout.item_size,
                min_distance,
                bounds,
                &self.budget,
            );
            positions.push(placement.position);

            let rotation = Rotation::ALL[rng.random_range(0..Rotation::ALL.len())];
            items.push(StimulusSpec {
                position: placement.position,
                is_target: target_index == Some(index),
                rotation,
            });
        }

        TrialLayout {
            items,
            is_target_present: target_index.is_some_and(|i| i < num_items),
            target_index: target_index.filter(|&i| i < num_items),
            num_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn builder() -> StimulusSetBuilder {
        StimulusSetBuilder::new(LayoutConfig::default(), 0.5)
    }

    #[test]
    fn item_count_comes_from_candidates() {
        let b = builder();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let t = b.build_trial(&mut rng, Bounds::new(1024.0, 768.0));
            assert!([1, 2, 4, 8, 16].contains(&t.num_items));
            assert_eq!(t.items.len(), t.num_items);
        }
    }

    #[test]
    fn both_trial_kinds_occur() {
        let b = builder();
        let mut rng = StdRng::seed_from_u64(5);
        let trials: Vec<TrialLayout> = (0..200)
            .map(|_| b.build_trial(&mut rng, Bounds::new(1024.0, 768.0)))
            .collect();
        assert!(trials.iter().any(|t| t.is_target_present));
        assert!(trials.iter().any(|t| !t.is_target_present));
    }

    #[test]
    fn forced_layout_places_target_at_index() {
        let b = builder();
        let mut rng = StdRng::seed_from_u64(2);
        let t = b.build_with(&mut rng, Bounds::new(800.0, 600.0), 4, Some(2));
        assert!(t.is_target_present);
        assert_eq!(t.target_index, Some(2));
        assert!(t.items[2].is_target);
        assert_eq!(t.target_count(), 1);

        let absent = b.build_with(&mut rng, Bounds::new(800.0, 600.0), 4, None);
        assert!(!absent.is_target_present);
        assert_eq!(absent.target_count(), 0);
    }

    #[test]
    fn item_at_prefers_topmost() {
        let item = |x: f32, y: f32| StimulusSpec {
            position: Position::new(x, y),
            is_target: false,
            rotation: Rotation::Deg0,
        };
        let layout = TrialLayout {
            items: vec![item(0.0, 0.0), item(40.0, 40.0), item(300.0, 300.0)],
            is_target_present: false,
            target_index: None,
            num_items: 3,
        };
        assert_eq!(layout.item_at(10.0, 10.0, 60.0), Some(0));
        assert_eq!(layout.item_at(50.0, 50.0, 60.0), Some(1));
        assert_eq!(layout.item_at(310.0, 350.0, 60.0), Some(2));
        assert_eq!(layout.item_at(200.0, 200.0, 60.0), None);
    }

    #[test]
    fn rotations_cover_all_quarter_turns() {
        let b = builder();
        let mut rng = StdRng::seed_from_u64(9);
        let t = b.build_with(&mut rng, Bounds::new(1280.0, 720.0), 16, None);
        let mut seen: Vec<Rotation> = t.items.iter().map(|i| i.rotation).collect();
        let more = b.build_with(&mut rng, Bounds::new(1280.0, 720.0), 16, None);
        seen.extend(more.items.iter().map(|i| i.rotation));
        for r in Rotation::ALL {
            assert!(seen.contains(&r));
        }
    }
}
