use super::super::super::state::{AppState, NotificationLevel};
use super::super::action::AnalysisAction;
use super::super::command::Command;
use crate::domain::{ActivityEvent, ActivityKind, AnalysisResult};
use crate::infra::realtime::OutboundEvent;

pub fn reduce(state: &mut AppState, action: AnalysisAction) -> Vec<Command> {
    match action {
        AnalysisAction::UpdateCode(code) => {
            state.analysis.code = code;
            Vec::new()
        }
        AnalysisAction::Run => {
            if state.analysis.code.trim().is_empty() {
                state.notify(NotificationLevel::Error, "Please enter some code to analyze");
                return Vec::new();
            }
            if !state.connection.connected {
                state.notify(NotificationLevel::Error, "Not connected to the DebugFlow backend");
                return Vec::new();
            }

            let request = state.analysis.tracker.begin(state.analysis.code.clone());
            state.analysis.is_analyzing = true;
            state.notify(NotificationLevel::Info, "Starting code analysis...");
            vec![Command::Emit(OutboundEvent::AnalyzeCode(request))]
        }
        AnalysisAction::ClearResults => {
            state.analysis.results.clear();
            Vec::new()
        }
    }
}

/// Applies an `analysis-complete` push to the request it answers.
pub fn complete(state: &mut AppState, result: AnalysisResult) {
    match state.analysis.tracker.resolve(&result) {
        Ok(pending) => {
            log::info!(
                "Analysis {} finished in {} ms",
                pending.id,
                (chrono::Utc::now() - pending.started_at).num_milliseconds()
            );
            state
                .feed
                .push(ActivityEvent::new(ActivityKind::Analysis, result.summary()));
            state.analysis.results.push(result);
            state.analysis.is_analyzing = state.analysis.tracker.outstanding() > 0;
            state.notify(NotificationLevel::Success, "Analysis complete!");
        }
        Err(unmatched) => {
            log::debug!("ignoring analysis-complete push: {:?}", unmatched);
        }
    }
}

/// Drops a request whose `analyze-code` never reached the backend.
pub fn emit_failed(state: &mut AppState, id: &str) {
    if state.analysis.tracker.cancel(id).is_none() {
        return;
    }
    state.analysis.is_analyzing = state.analysis.tracker.outstanding() > 0;
    state.notify(NotificationLevel::Error, "Could not send code for analysis");
}
