use super::super::super::state::AppState;
use super::super::action::ConnectionAction;
use super::super::command::Command;
use crate::infra::realtime::OutboundEvent;

pub fn reduce(state: &mut AppState, action: ConnectionAction) -> Vec<Command> {
    match action {
        ConnectionAction::Connect => {
            if state.connection.connected || state.connection.is_connecting {
                return Vec::new();
            }
            state.connection.is_connecting = true;
            state.connection.last_error = None;
            vec![Command::Connect]
        }
        ConnectionAction::Disconnect => {
            state.connection.is_connecting = false;
            vec![Command::Disconnect]
        }
    }
}

/// Applies a channel state transition. On connect every joined project is subscribed again.
pub fn set_connected(state: &mut AppState, connected: bool) -> Vec<Command> {
    if connected {
        state.connection.is_connecting = false;
    }
    if state.connection.connected == connected {
        return Vec::new();
    }
    state.connection.connected = connected;
    if !connected {
        return Vec::new();
    }

    state
        .joined_projects
        .iter()
        .cloned()
        .map(|project_id| Command::Emit(OutboundEvent::JoinProject(project_id)))
        .collect()
}
