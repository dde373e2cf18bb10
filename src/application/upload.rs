//! Upload workflow state machine.
//!
//! `choose-type → details → codebase-access → submitted` for applications and
//! `choose-type → file-upload → submitted` for loose files. A successful submission resets the
//! machine to a fresh draft; a failed one leaves the draft untouched for a retry.

use chrono::{DateTime, Utc};

use crate::domain::{
    AccessType, DraftFile, LOCAL_FILES, Project, ProjectId, ProjectKind, ProjectStatus,
    ProjectType, SubmitRequest, UploadDraft, UploadError, UploadStep,
};

/// Name given to projects submitted without one.
pub const DEFAULT_PROJECT_NAME: &str = "New Project";

/// Language reported when no attached file has a recognizable extension.
pub const DEFAULT_LANGUAGE: &str = "JavaScript";

/// Outcome of attaching files to the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesAdded {
    pub accepted: usize,
    /// Names of files refused because of their extension.
    pub rejected: Vec<String>,
}

/// Drives one upload draft through its steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadWorkflow {
    draft: UploadDraft,
    submitting: bool,
}

impl UploadWorkflow {
    pub fn new(draft: UploadDraft) -> Self {
        Self {
            draft,
            submitting: false,
        }
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn step(&self) -> UploadStep {
        self.draft.step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn ensure_idle(&self) -> Result<(), UploadError> {
        if self.submitting {
            return Err(UploadError::SubmitInProgress);
        }
        Ok(())
    }

    fn ensure_step(&self, expected: UploadStep) -> Result<(), UploadError> {
        if self.draft.step != expected {
            return Err(UploadError::UnexpectedStep(self.draft.step));
        }
        Ok(())
    }

    pub fn select_type(&mut self, project_type: ProjectType) -> Result<UploadStep, UploadError> {
        self.ensure_idle()?;
        self.ensure_step(UploadStep::ChooseType)?;
        self.draft.project_type = Some(project_type);
        self.draft.step = match project_type {
            ProjectType::App => UploadStep::Details,
            ProjectType::Files => UploadStep::FileUpload,
        };
        Ok(self.draft.step)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), UploadError> {
        self.ensure_idle()?;
        self.draft.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), UploadError> {
        self.ensure_idle()?;
        self.draft.description = description.into();
        Ok(())
    }

    pub fn set_codebase_url(&mut self, url: impl Into<String>) -> Result<(), UploadError> {
        self.ensure_idle()?;
        self.draft.codebase_url = url.into();
        Ok(())
    }

    pub fn set_access_type(&mut self, access_type: AccessType) -> Result<(), UploadError> {
        self.ensure_idle()?;
        self.draft.access_type = access_type;
        Ok(())
    }

    /// Appends accepted files in order. Duplicate names are kept.
    pub fn add_files(&mut self, files: Vec<DraftFile>) -> Result<FilesAdded, UploadError> {
        self.ensure_idle()?;
        if self.draft.project_type.is_none() {
            return Err(UploadError::NoProjectType);
        }

        let mut outcome = FilesAdded::default();
        for file in files {
            if file.is_accepted() {
                self.draft.files.push(file);
                outcome.accepted += 1;
            } else {
                outcome.rejected.push(file.name);
            }
        }
        Ok(outcome)
    }

    pub fn remove_file(&mut self, index: usize) -> Result<DraftFile, UploadError> {
        self.ensure_idle()?;
        if index >= self.draft.files.len() {
            return Err(UploadError::FileIndexOutOfRange(index));
        }
        Ok(self.draft.files.remove(index))
    }

    pub fn can_continue(&self) -> bool {
        self.draft.step == UploadStep::Details
            && !self.draft.name.trim().is_empty()
            && !self.draft.files.is_empty()
    }

    /// `details → codebase-access`.
    pub fn continue_to_codebase_access(&mut self) -> Result<UploadStep, UploadError> {
        self.ensure_idle()?;
        self.ensure_step(UploadStep::Details)?;
        if self.draft.name.trim().is_empty() {
            return Err(UploadError::NameRequired);
        }
        if self.draft.files.is_empty() {
            return Err(UploadError::FilesRequired);
        }
        self.draft.step = UploadStep::CodebaseAccess;
        Ok(self.draft.step)
    }

    /// One step backward. Field values are kept.
    pub fn back(&mut self) -> Result<UploadStep, UploadError> {
        self.ensure_idle()?;
        self.draft.step = match self.draft.step {
            UploadStep::ChooseType => {
                return Err(UploadError::UnexpectedStep(UploadStep::ChooseType));
            }
            UploadStep::Details | UploadStep::FileUpload => UploadStep::ChooseType,
            UploadStep::CodebaseAccess => UploadStep::Details,
        };
        Ok(self.draft.step)
    }

    /// Discards the draft.
    pub fn cancel(&mut self) -> Result<(), UploadError> {
        self.ensure_idle()?;
        self.draft = UploadDraft::default();
        Ok(())
    }

    fn check_submittable(&self) -> Result<(), UploadError> {
        match self.draft.step {
            UploadStep::CodebaseAccess => {
                if self.draft.codebase_url.trim().is_empty() {
                    return Err(UploadError::CodebaseUrlRequired);
                }
            }
            UploadStep::FileUpload => {
                if self.draft.files.is_empty() {
                    return Err(UploadError::FilesRequired);
                }
            }
            step => return Err(UploadError::UnexpectedStep(step)),
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.check_submittable().is_ok()
    }

    /// Validates the final gate and locks the workflow until [`Self::complete_submit`].
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, UploadError> {
        self.ensure_idle()?;
        self.check_submittable()?;
        let project_type = self.draft.project_type.ok_or(UploadError::NoProjectType)?;

        self.submitting = true;
        Ok(SubmitRequest {
            project_type,
            name: self.draft.name.clone(),
            description: self.draft.description.clone(),
            files: self.draft.files.clone(),
            codebase_url: self.draft.codebase_url.trim().to_string(),
            access_type: self.draft.access_type,
        })
    }

    /// Unlocks the workflow. On success the draft is reset, otherwise it is kept as is.
    pub fn complete_submit(&mut self, succeeded: bool) -> Result<(), UploadError> {
        if !self.submitting {
            return Err(UploadError::NoSubmitInProgress);
        }
        self.submitting = false;
        if succeeded {
            self.draft = UploadDraft::default();
        }
        Ok(())
    }
}

/// Most common language among the attached files.
pub fn infer_language(files: &[DraftFile]) -> &'static str {
    let mut tally: Vec<(&'static str, usize)> = Vec::new();
    for language in files.iter().filter_map(DraftFile::language) {
        match tally.iter_mut().find(|(seen, _)| *seen == language) {
            Some((_, count)) => *count += 1,
            None => tally.push((language, 1)),
        }
    }

    // max_by_key keeps the last maximum; reversing makes ties go to the first attached
    tally
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(language, _)| language)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Hands out `proj_<unix-millis>` ids, bumped past the previous one so ids never repeat.
#[derive(Debug, Clone, Default)]
pub struct ProjectIds {
    last: i64,
}

impl ProjectIds {
    pub fn next(&mut self, now: DateTime<Utc>) -> ProjectId {
        let millis = now.timestamp_millis().max(self.last + 1);
        self.last = millis;
        format!("proj_{millis}")
    }
}

/// Builds the project record for an accepted submission.
pub fn build_project(request: &SubmitRequest, id: ProjectId, now: DateTime<Utc>) -> Project {
    let name = request.name.trim();
    Project {
        id,
        name: if name.is_empty() {
            DEFAULT_PROJECT_NAME.to_string()
        } else {
            name.to_string()
        },
        kind: match request.project_type {
            ProjectType::App => ProjectKind::WebApplication,
            ProjectType::Files => ProjectKind::Script,
        },
        status: ProjectStatus::Analyzing,
        last_modified: now,
        bugs_found: 0,
        bugs_fixed: 0,
        codebase_ref: if request.codebase_url.is_empty() {
            LOCAL_FILES.to_string()
        } else {
            request.codebase_url.clone()
        },
        language: infer_language(&request.files).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> DraftFile {
        DraftFile::new(name, 100, format!("/tmp/{name}"))
    }

    fn app_at_codebase_access() -> UploadWorkflow {
        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::App).unwrap();
        wf.set_name("Storefront").unwrap();
        wf.add_files(vec![file("index.js")]).unwrap();
        wf.continue_to_codebase_access().unwrap();
        wf
    }

    #[test]
    fn select_type_branches() {
        let mut wf = UploadWorkflow::default();
        assert_eq!(wf.select_type(ProjectType::App), Ok(UploadStep::Details));

        let mut wf = UploadWorkflow::default();
        assert_eq!(wf.select_type(ProjectType::Files), Ok(UploadStep::FileUpload));
        assert_eq!(
            wf.select_type(ProjectType::App),
            Err(UploadError::UnexpectedStep(UploadStep::FileUpload))
        );
    }

    #[test]
    fn details_gate_requires_name_and_files() {
        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::App).unwrap();

        assert_eq!(wf.continue_to_codebase_access(), Err(UploadError::NameRequired));
        wf.set_name("   ").unwrap();
        assert_eq!(wf.continue_to_codebase_access(), Err(UploadError::NameRequired));

        wf.set_name("Site").unwrap();
        assert_eq!(wf.continue_to_codebase_access(), Err(UploadError::FilesRequired));
        assert_eq!(wf.step(), UploadStep::Details);

        wf.add_files(vec![file("a.ts")]).unwrap();
        assert!(wf.can_continue());
        assert_eq!(wf.continue_to_codebase_access(), Ok(UploadStep::CodebaseAccess));
    }

    #[test]
    fn app_submit_requires_codebase_url() {
        let mut wf = app_at_codebase_access();
        assert!(!wf.can_submit());
        assert_eq!(wf.begin_submit(), Err(UploadError::CodebaseUrlRequired));
        assert!(!wf.is_submitting());

        wf.set_codebase_url("https://github.com/user/storefront").unwrap();
        let request = wf.begin_submit().unwrap();
        assert_eq!(request.project_type, ProjectType::App);
        assert_eq!(request.access_type, AccessType::ReadOnly);
        assert!(wf.is_submitting());
    }

    #[test]
    fn files_submit_requires_files() {
        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::Files).unwrap();
        assert_eq!(wf.begin_submit(), Err(UploadError::FilesRequired));

        wf.add_files(vec![file("a.py"), file("b.py")]).unwrap();
        let request = wf.begin_submit().unwrap();
        assert_eq!(request.files.len(), 2);
    }

    #[test]
    fn cannot_submit_from_details() {
        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::App).unwrap();
        wf.set_codebase_url("https://example.com/repo").unwrap();
        assert_eq!(
            wf.begin_submit(),
            Err(UploadError::UnexpectedStep(UploadStep::Details))
        );
    }

    #[test]
    fn submit_is_exclusive_and_locks_edits() {
        let mut wf = app_at_codebase_access();
        wf.set_codebase_url("https://github.com/user/storefront").unwrap();
        wf.begin_submit().unwrap();

        assert_eq!(wf.begin_submit(), Err(UploadError::SubmitInProgress));
        assert_eq!(wf.set_name("other"), Err(UploadError::SubmitInProgress));
        assert_eq!(wf.remove_file(0), Err(UploadError::SubmitInProgress));
        assert_eq!(wf.cancel(), Err(UploadError::SubmitInProgress));
    }

    #[test]
    fn successful_submit_resets_draft() {
        let mut wf = app_at_codebase_access();
        wf.set_codebase_url("https://github.com/user/storefront").unwrap();
        wf.set_access_type(AccessType::ReadWrite).unwrap();
        wf.set_description("desc").unwrap();
        wf.begin_submit().unwrap();

        wf.complete_submit(true).unwrap();
        assert!(!wf.is_submitting());
        assert_eq!(*wf.draft(), UploadDraft::default());
    }

    #[test]
    fn failed_submit_keeps_draft_for_retry() {
        let mut wf = app_at_codebase_access();
        wf.set_codebase_url("https://github.com/user/storefront").unwrap();
        let before = wf.draft().clone();
        wf.begin_submit().unwrap();

        wf.complete_submit(false).unwrap();
        assert_eq!(*wf.draft(), before);
        assert!(wf.begin_submit().is_ok());
    }

    #[test]
    fn complete_without_begin_is_rejected() {
        let mut wf = UploadWorkflow::default();
        assert_eq!(wf.complete_submit(true), Err(UploadError::NoSubmitInProgress));
    }

    #[test]
    fn remove_file_keeps_other_entries() {
        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::Files).unwrap();
        let files = vec![file("a.js"), file("b.js"), file("c.js")];
        wf.add_files(files).unwrap();

        let removed = wf.remove_file(1).unwrap();
        assert_eq!(removed.name, "b.js");
        let names: Vec<_> = wf.draft().files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "c.js"]);
        assert_eq!(wf.step(), UploadStep::FileUpload);

        wf.add_files(vec![file("b.js")]).unwrap();
        let names: Vec<_> = wf.draft().files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "c.js", "b.js"]);

        assert_eq!(wf.remove_file(3), Err(UploadError::FileIndexOutOfRange(3)));
    }

    #[test]
    fn add_files_filters_extensions_and_keeps_duplicates() {
        let mut wf = UploadWorkflow::default();
        let untyped = wf.add_files(vec![file("a.js")]);
        assert_eq!(untyped, Err(UploadError::NoProjectType));

        wf.select_type(ProjectType::Files).unwrap();
        let added = wf
            .add_files(vec![file("a.js"), file("logo.png"), file("a.js")])
            .unwrap();
        assert_eq!(added.accepted, 2);
        assert_eq!(added.rejected, vec!["logo.png".to_string()]);
        assert_eq!(wf.draft().files.len(), 2);
    }

    #[test]
    fn back_navigation_keeps_fields() {
        let mut wf = app_at_codebase_access();
        assert_eq!(wf.back(), Ok(UploadStep::Details));
        assert_eq!(wf.draft().name, "Storefront");
        assert_eq!(wf.back(), Ok(UploadStep::ChooseType));
        assert_eq!(
            wf.back(),
            Err(UploadError::UnexpectedStep(UploadStep::ChooseType))
        );

        let mut wf = UploadWorkflow::default();
        wf.select_type(ProjectType::Files).unwrap();
        assert_eq!(wf.back(), Ok(UploadStep::ChooseType));
    }

    #[test]
    fn cancel_discards_everything() {
        let mut wf = app_at_codebase_access();
        wf.cancel().unwrap();
        assert!(wf.draft().is_pristine());
    }

    #[test]
    fn infer_language_picks_majority_then_first() {
        assert_eq!(infer_language(&[]), DEFAULT_LANGUAGE);
        assert_eq!(infer_language(&[file("notes.md")]), DEFAULT_LANGUAGE);
        assert_eq!(
            infer_language(&[file("a.py"), file("b.rs"), file("c.rs")]),
            "Rust"
        );
        assert_eq!(infer_language(&[file("a.go"), file("b.rb")]), "Go");
    }

    #[test]
    fn build_project_for_each_branch() {
        let now = Utc::now();
        let app = SubmitRequest {
            project_type: ProjectType::App,
            name: "Storefront".into(),
            description: String::new(),
            files: vec![file("index.js")],
            codebase_url: "https://github.com/user/storefront".into(),
            access_type: AccessType::ReadOnly,
        };
        let mut ids = ProjectIds::default();
        let project = build_project(&app, ids.next(now), now);
        assert_eq!(project.id, format!("proj_{}", now.timestamp_millis()));
        assert_eq!(project.kind, ProjectKind::WebApplication);
        assert_eq!(project.status, ProjectStatus::Analyzing);
        assert_eq!((project.bugs_found, project.bugs_fixed), (0, 0));
        assert_eq!(project.codebase_ref, "https://github.com/user/storefront");

        let files = SubmitRequest {
            project_type: ProjectType::Files,
            name: String::new(),
            codebase_url: String::new(),
            files: vec![file("a.py"), file("b.py")],
            ..app
        };
        let project = build_project(&files, ids.next(now), now);
        assert_eq!(project.id, format!("proj_{}", now.timestamp_millis() + 1));
        assert_eq!(project.kind, ProjectKind::Script);
        assert_eq!(project.name, DEFAULT_PROJECT_NAME);
        assert_eq!(project.codebase_ref, LOCAL_FILES);
        assert_eq!(project.language, "Python");
    }
}
