pub mod config;
pub mod dispatch;
pub mod error;
pub mod layout;
pub mod sampler;
pub mod sink;
pub mod state;
pub use config::{ExperimentConfig, LayoutConfig};
pub use dispatch::{Action, ExperimentEvent, Guards};
pub use error::ExperimentError;
pub use layout::{StimulusSetBuilder, TrialLayout};
pub use sampler::{AttemptBudget, Placement};
pub use sink::{TracingSink, TrialEventSink};
pub use state::ExperimentSession;
