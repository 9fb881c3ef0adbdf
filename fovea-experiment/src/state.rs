use crate::config::ExperimentConfig;
use crate::dispatch::{self, Action, ExperimentEvent, Guards};
use crate::error::ExperimentError;
use crate::layout::{StimulusSetBuilder, TrialLayout};
use fovea_core::{Bounds, Feedback, FocusPoint, ResponseKind, TrialEvent, TrialState};
use fovea_timing::Timer;
use rand::Rng;
use std::time::Duration;

/// Everything one participant's running task needs, passed to handlers by `&mut`
pub struct ExperimentSession<T, R>
where
    T: Timer,
    R: Rng,
{
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    builder: StimulusSetBuilder,
    state: TrialState,
    focus: FocusPoint,
    bounds: Option<Bounds>,
    current: Option<TrialLayout>,
    feedback: Option<Feedback>,
    guards: Guards,
    advance_at: Option<T::Timestamp>,
    trial_number: usize,
}

impl<T, R> ExperimentSession<T, R>
where
    T: Timer,
    R: Rng,
{
    pub fn new(config: ExperimentConfig, timer: T, rng: R) -> Result<Self, ExperimentError> {
        config.validate()?;
        let builder = StimulusSetBuilder::new(
            config.layout.clone(),
            config.target_present_probability,
        );
        Ok(Self {
            timer,
            rng,
            config,
            builder,
            state: TrialState::Idle,
            focus: FocusPoint::default(),
            bounds: None,
            current: None,
            feedback: None,
            guards: Guards::default(),
            advance_at: None,
            trial_number: 0,
        })
    }

    /// Sets the display region stimuli are placed in. Called at setup and on resize.
    pub fn attach_display(&mut self, bounds: Bounds) {
        tracing::debug!(width = bounds.width, height = bounds.height, "display attached");
        self.bounds = Some(bounds);
    }

    pub fn detach_display(&mut self) {
        self.bounds = None;
    }

    /// Polls the inter-trial timer. Yields `AdvanceElapsed` once per scheduled delay.
    pub fn update(&mut self) -> Vec<ExperimentEvent> {
        let mut events = Vec::new();
        if let Some(deadline) = self.advance_at {
            if self.timer.now() >= deadline {
                self.advance_at = None;
                events.push(ExperimentEvent::AdvanceElapsed);
            }
        }
        events
    }

    /// Applies one input event. Returns the trial event it produced, if any.
    pub fn handle_event(&mut self, event: ExperimentEvent) -> Option<TrialEvent> {
        match dispatch::transition(self.state, self.guards, event) {
            Action::Ignore => {
                tracing::trace!(?event, state = ?self.state, "event ignored");
                None
            }
            Action::MoveFocus { x, y } => {
                self.focus = FocusPoint::new(x, y);
                None
            }
            Action::StartTrial => match self.start_task() {
                Ok(started) => Some(started),
                Err(e) => {
                    tracing::error!(error = %e, "start aborted");
                    None
                }
            },
            Action::OpenResponseWindow => {
                self.state = TrialState::AwaitingResponse;
                tracing::debug!(trial = self.trial_number, "response window open");
                None
            }
            Action::ScoreClick { index } => self.score(ResponseKind::Click, Some(index)),
            Action::ScoreAbsent => {
                self.guards.absent_key_held = true;
                self.score(ResponseKind::Keypress, None)
            }
            Action::LatchKey => {
                self.guards.absent_key_held = true;
                if self.guards.responded {
                    tracing::debug!(trial = self.trial_number, "repeat response ignored");
                }
                None
            }
            Action::ReleaseKey => {
                self.guards.absent_key_held = false;
                None
            }
        }
    }

    /// Clears the previous trial and presents a freshly generated layout.
    pub fn start_task(&mut self) -> Result<TrialEvent, ExperimentError> {
        let bounds = self.bounds.ok_or(ExperimentError::MissingDisplay)?;
        let layout = self.builder.build_trial(&mut self.rng, bounds);
        Ok(self.present_layout(layout))
    }

    /// Starts a trial on a given layout instead of a generated one.
    pub fn present_layout(&mut self, layout: TrialLayout) -> TrialEvent {
        self.feedback = None;
        self.advance_at = None;
        self.guards.responded = false;
        self.trial_number += 1;

        tracing::info!(
            trial = self.trial_number,
            num_items = layout.num_items,
            target_present = layout.is_target_present,
            "trial started"
        );
        let started = TrialEvent::Started {
            trial_id: self.trial_number,
            num_items: layout.num_items,
            is_target_present: layout.is_target_present,
            target_index: layout.target_index,
        };

        self.current = Some(layout);
        self.state = TrialState::Presenting;
        started
    }

    fn score(&mut self, response: ResponseKind, clicked: Option<usize>) -> Option<TrialEvent> {
        let layout = self.current.as_ref()?;
        let is_correct = match clicked {
            Some(index) => layout.items.get(index)?.is_target,
            None => !layout.is_target_present,
        };

        self.guards.responded = true;
        let feedback = Feedback::from_correct(is_correct);
        self.feedback = Some(feedback);
        self.state = TrialState::FeedbackShown;

        let delay = Duration::from_millis(self.config.feedback_delay_ms);
        self.advance_at = Some(self.timer.offset(self.timer.now(), delay));

        tracing::info!(
            trial = self.trial_number,
            ?response,
            correct = is_correct,
            "trial scored"
        );
        Some(TrialEvent::Scored {
            trial_id: self.trial_number,
            is_correct,
            response,
        })
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn focus(&self) -> FocusPoint {
        self.focus
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn current_layout(&self) -> Option<&TrialLayout> {
        self.current.as_ref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn has_responded(&self) -> bool {
        self.guards.responded
    }

    pub fn trial_number(&self) -> usize {
        self.trial_number
    }

    pub fn item_size(&self) -> f32 {
        self.builder.layout_config().item_size
    }

    /// Index of the stimulus under `(x, y)` in the current layout.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.current
            .as_ref()
            .and_then(|layout| layout.item_at(x, y, self.item_size()))
    }

    pub fn is_advance_pending(&self) -> bool {
        self.advance_at.is_some()
    }
}
