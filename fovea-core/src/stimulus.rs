use crate::geometry::Position;
use serde::{Deserialize, Serialize};

/// Orientation of a stimulus glyph, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(&self) -> f32 {
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => 90.0,
            Rotation::Deg180 => 180.0,
            Rotation::Deg270 => 270.0,
        }
    }
}

/// One item of a search display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusSpec {
    pub position: Position,
    pub is_target: bool,
    pub rotation: Rotation,
}

impl StimulusSpec {
    /// Letter drawn for this item: the target is a T, distractors are Ls.
    pub fn glyph(&self) -> char {
        if self.is_target { 'T' } else { 'L' }
    }

    /// Whether `(x, y)` falls inside the item's square of side `item_size`.
    pub fn contains(&self, x: f32, y: f32, item_size: f32) -> bool {
        x >= self.position.x
            && y >= self.position.y
            && x < self.position.x + item_size
            && y < self.position.y + item_size
    }

    pub fn center(&self, item_size: f32) -> (f32, f32) {
        (
            self.position.x + item_size / 2.0,
            self.position.y + item_size / 2.0,
        )
    }
}
