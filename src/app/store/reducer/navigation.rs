use super::super::super::state::{AppState, AppView};
use super::super::action::NavigationAction;
use super::super::command::Command;

pub fn reduce(state: &mut AppState, action: NavigationAction) -> Vec<Command> {
    match action {
        NavigationAction::SwitchTo(view) => {
            state.current_view = view;
            if matches!(view, AppView::Projects) && !state.is_loading_projects {
                state.is_loading_projects = true;
                return vec![Command::LoadProjects];
            }
            Vec::new()
        }
    }
}
