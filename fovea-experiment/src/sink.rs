use fovea_core::TrialEvent;

/// Consumer of trial outcome events
pub trait TrialEventSink {
    fn publish(&mut self, event: &TrialEvent);
}

/// Writes each event as a JSON object into the `info` log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TrialEventSink for TracingSink {
    fn publish(&mut self, event: &TrialEvent) {
        match serde_json::to_string(event) {
            Ok(json) => {
                tracing::info!(target: "fovea::trial_events", payload = %json, "trial event")
            }
            Err(e) => tracing::warn!(error = %e, "trial event not serializable"),
        }
    }
}

impl TrialEventSink for Vec<TrialEvent> {
    fn publish(&mut self, event: &TrialEvent) {
        self.push(event.clone());
    }
}
