use super::super::super::state::{AppState, NotificationLevel};
use super::super::action::UploadAction;
use super::super::command::Command;
use crate::domain::UploadError;

pub fn reduce(state: &mut AppState, action: UploadAction) -> Vec<Command> {
    let workflow = &mut state.upload;
    let result: Result<(), UploadError> = match action {
        UploadAction::SelectType(project_type) => workflow.select_type(project_type).map(|_| ()),
        UploadAction::SetName(name) => workflow.set_name(name),
        UploadAction::SetDescription(description) => workflow.set_description(description),
        UploadAction::SetCodebaseUrl(url) => workflow.set_codebase_url(url),
        UploadAction::SetAccessType(access_type) => workflow.set_access_type(access_type),
        UploadAction::AddFiles(files) => match workflow.add_files(files) {
            Ok(added) => {
                if added.accepted > 0 {
                    state.notify(
                        NotificationLevel::Success,
                        format!("Added {} files", added.accepted),
                    );
                }
                if !added.rejected.is_empty() {
                    state.notify(
                        NotificationLevel::Error,
                        format!("Unsupported file type: {}", added.rejected.join(", ")),
                    );
                }
                Ok(())
            }
            Err(err) => Err(err),
        },
        UploadAction::RemoveFile(index) => workflow.remove_file(index).map(|_| ()),
        UploadAction::Continue => workflow.continue_to_codebase_access().map(|_| ()),
        UploadAction::Back => workflow.back().map(|_| ()),
        UploadAction::Cancel => workflow.cancel(),
        UploadAction::Submit => match workflow.begin_submit() {
            Ok(request) => return vec![Command::SubmitProject(request)],
            Err(err) => Err(err),
        },
    };

    if let Err(err) = result {
        log::debug!("upload step {} rejected: {}", state.upload.step(), err);
    }
    Vec::new()
}
