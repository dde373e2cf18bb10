use super::super::super::state::{AppState, NotificationLevel};
use super::super::action::AsyncAction;
use super::super::command::Command;
use super::{analysis, connection};
use crate::domain::{ActivityEvent, ActivityKind};
use crate::infra::api::fallback_projects;
use crate::infra::realtime::{DebugResponse, InboundEvent, ProjectUpdate};

pub fn reduce(state: &mut AppState, action: AsyncAction) -> Vec<Command> {
    match action {
        AsyncAction::ProjectsLoaded(projects) => {
            state.is_loading_projects = false;
            if let Err(err) = state.projects.replace_all(projects) {
                log::warn!("Rejected project list ({}), using fallback data", err);
                if let Err(err) = state.projects.replace_all(fallback_projects()) {
                    log::warn!("Fallback project list rejected: {}", err);
                }
            }
            Vec::new()
        }
        AsyncAction::ProjectSubmitted(result) => {
            if let Err(err) = state.upload.complete_submit(result.is_ok()) {
                log::debug!("submit result without a pending submit: {}", err);
                return Vec::new();
            }
            match result {
                Ok(project) => {
                    let name = project.name.clone();
                    match state.projects.insert(project) {
                        Ok(()) => log::info!("Added project {}", name),
                        Err(err) => log::warn!("Could not add project {}: {}", name, err),
                    }
                    state.notify(NotificationLevel::Success, "Project uploaded successfully!");
                }
                Err(err) => {
                    log::warn!("Project upload failed: {}", err);
                    state.notify(NotificationLevel::Error, "Failed to upload project");
                }
            }
            Vec::new()
        }
        AsyncAction::ConnectFinished(result) => {
            // on success the `connect` channel event clears `is_connecting`
            if let Err(err) = result {
                state.connection.is_connecting = false;
                state.connection.last_error = Some(err);
            }
            Vec::new()
        }
        AsyncAction::AnalysisEmitFailed(id) => {
            analysis::emit_failed(state, &id);
            Vec::new()
        }
        AsyncAction::Channel(event) => reduce_channel_event(state, event),
    }
}

fn reduce_channel_event(state: &mut AppState, event: InboundEvent) -> Vec<Command> {
    match event {
        InboundEvent::Connected => connection::set_connected(state, true),
        InboundEvent::Disconnected => connection::set_connected(state, false),
        InboundEvent::AnalysisComplete(result) => {
            analysis::complete(state, result);
            Vec::new()
        }
        InboundEvent::DebugResponse(DebugResponse { message, timestamp }) => {
            let mut event = ActivityEvent::new(ActivityKind::Debug, message);
            if let Some(timestamp) = timestamp {
                event = event.reported_at(timestamp);
            }
            state.feed.push(event);
            Vec::new()
        }
        InboundEvent::ProjectUpdate(ProjectUpdate { id, patch }) => {
            match state.projects.update(&id, &patch) {
                Ok(project) => {
                    let message = format!(
                        "{} is now {} ({}/{} bugs fixed)",
                        project.name, project.status, project.bugs_fixed, project.bugs_found
                    );
                    state
                        .feed
                        .push(ActivityEvent::new(ActivityKind::Project, message));
                }
                Err(err) => log::warn!("Ignoring project-update for {}: {}", id, err),
            }
            Vec::new()
        }
    }
}
