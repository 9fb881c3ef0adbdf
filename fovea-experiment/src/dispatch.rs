//! Event-to-transition table for the trial controller.
//!
//! [`transition`] is pure: it looks only at the current state and guard flags
//! and names the [`Action`] the session must apply. All randomness, timing and
//! display mutation happen in [`crate::ExperimentSession`].

use fovea_core::TrialState;

/// Input delivered by the host event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExperimentEvent {
    StartPressed,
    PointerMoved { x: f32, y: f32 },
    StimulusClicked { index: usize },
    AbsentKeyPressed,
    AbsentKeyReleased,
    /// The current layout has reached the screen
    Presented,
    /// The inter-trial delay has run out
    AdvanceElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Ignore,
    MoveFocus { x: f32, y: f32 },
    StartTrial,
    OpenResponseWindow,
    ScoreClick { index: usize },
    /// Score the "target absent" claim and latch the key as held
    ScoreAbsent,
    LatchKey,
    ReleaseKey,
}

/// Response guard and key latch, owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Guards {
    pub responded: bool,
    pub absent_key_held: bool,
}

pub fn transition(state: TrialState, guards: Guards, event: ExperimentEvent) -> Action {
    use ExperimentEvent as E;
    use TrialState as S;

    match (state, event) {
        (_, E::PointerMoved { x, y }) => Action::MoveFocus { x, y },

        (S::Idle, E::StartPressed) => Action::StartTrial,
        (S::Presenting, E::Presented) => Action::OpenResponseWindow,
        (S::FeedbackShown, E::AdvanceElapsed) => Action::StartTrial,

        (s, E::StimulusClicked { index }) if s.allows_response() && !guards.responded => {
            Action::ScoreClick { index }
        }
        (s, E::AbsentKeyPressed)
            if s.allows_response() && !guards.responded && !guards.absent_key_held =>
        {
            Action::ScoreAbsent
        }

        (_, E::AbsentKeyPressed) if !guards.absent_key_held => Action::LatchKey,
        (_, E::AbsentKeyReleased) if guards.absent_key_held => Action::ReleaseKey,

        _ => Action::Ignore,
    }
}
