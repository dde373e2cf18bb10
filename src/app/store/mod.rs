//! Reducer-style state updates + side-effect commands.

mod action;
mod command;
mod reducer;
mod runtime;

pub use action::{
    Action, AnalysisAction, AsyncAction, ConnectionAction, NavigationAction, ProjectsAction,
    SettingsAction, UploadAction,
};
pub use command::Command;

use super::DebugFlowApp;

impl DebugFlowApp {
    pub fn dispatch(&mut self, action: Action) {
        let commands = reducer::reduce(&mut self.state, action);
        if self.skip_runtime {
            for command in commands {
                log::debug!("runtime disabled, dropping {:?}", command);
            }
            return;
        }
        for command in commands {
            runtime::run(self, command);
        }
    }
}
