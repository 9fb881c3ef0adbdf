pub mod geometry;
pub mod stimulus;
pub mod trial;

pub use geometry::{Bounds, FocusPoint, Position};
pub use stimulus::{Rotation, StimulusSpec};
pub use trial::{Feedback, ResponseKind, TrialEvent, TrialState};
