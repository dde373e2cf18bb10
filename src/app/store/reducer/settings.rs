use super::super::super::state::{AppState, NotificationLevel};
use super::super::action::SettingsAction;
use super::super::command::Command;
use crate::application::settings::SettingsCommand;

pub fn reduce(state: &mut AppState, action: SettingsAction) -> Vec<Command> {
    let (command, success) = match action {
        SettingsAction::Connect { kind, name } => {
            let message = format!("{} connected", name.trim());
            (SettingsCommand::Connect { kind, name }, message)
        }
        SettingsAction::Disconnect { kind, name } => {
            let message = format!("{} disconnected", name.trim());
            (SettingsCommand::Disconnect { kind, name }, message)
        }
        SettingsAction::Undo => {
            match state.settings.undo().map(|_| ()) {
                Ok(_) => state.notify(NotificationLevel::Info, "Integration change undone"),
                Err(err) => log::debug!("settings undo rejected: {}", err),
            }
            return Vec::new();
        }
    };

    match state.settings.apply(&command).map(|_| ()) {
        Ok(_) => state.notify(NotificationLevel::Success, success),
        Err(err) => state.notify(NotificationLevel::Error, err.to_string()),
    }
    Vec::new()
}
