use serde::{Deserialize, Serialize};

/// Trial state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrialState {
    #[default]
    Idle,
    Presenting,
    AwaitingResponse,
    FeedbackShown,
}

impl TrialState {
    pub fn allows_response(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }

    pub fn shows_stimuli(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Channel a response arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Click,
    Keypress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feedback::Correct => "Correct!",
            Feedback::Incorrect => "Incorrect!",
        }
    }

    pub fn color(&self) -> [u8; 4] {
        match self {
            Feedback::Correct => [0, 128, 0, 255],
            Feedback::Incorrect => [255, 0, 0, 255],
        }
    }
}

/// Outcome events published for external loggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrialEvent {
    Started {
        trial_id: usize,
        num_items: usize,
        is_target_present: bool,
        target_index: Option<usize>,
    },
    Scored {
        trial_id: usize,
        is_correct: bool,
        response: ResponseKind,
    },
}
