pub mod error;
pub mod mask;
pub mod render;
pub mod stimuli;
pub mod text;

pub use error::RenderError;
pub use mask::{MaskConfig, OcclusionMask};
pub use render::{FrameStats, Scene, SkiaRenderer};
pub use text::TextPainter;
