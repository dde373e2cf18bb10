pub mod channel;
pub mod projects;
pub mod upload;


use super::super::DebugFlowApp;
use super::command::Command;

pub fn run(app: &mut DebugFlowApp, command: Command) {
    match command {
        Command::Connect => channel::connect(app),
        Command::Disconnect => channel::disconnect(app),
        Command::Emit(event) => channel::emit(app, event),
        Command::LoadProjects => projects::load_projects(app),
        Command::SubmitProject(request) => upload::submit_project(app, request),
    }
}
