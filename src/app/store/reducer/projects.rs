use super::super::super::state::AppState;
use super::super::action::ProjectsAction;
use super::super::command::Command;
use crate::infra::realtime::OutboundEvent;

pub fn reduce(state: &mut AppState, action: ProjectsAction) -> Vec<Command> {
    match action {
        ProjectsAction::Refresh => {
            if state.is_loading_projects {
                return Vec::new();
            }
            state.is_loading_projects = true;
            vec![Command::LoadProjects]
        }
        ProjectsAction::Join(project_id) => {
            if !state.joined_projects.contains(&project_id) {
                state.joined_projects.push(project_id.clone());
            }
            if state.connection.connected {
                vec![Command::Emit(OutboundEvent::JoinProject(project_id))]
            } else {
                log::debug!("{} will be joined once connected", project_id);
                Vec::new()
            }
        }
        ProjectsAction::SetSearch(search) => {
            state.project_query.search = search;
            Vec::new()
        }
        ProjectsAction::SetStatusFilter(status) => {
            state.project_query.status = status;
            Vec::new()
        }
        ProjectsAction::SetSort(sort) => {
            state.project_query.sort = sort;
            Vec::new()
        }
    }
}
