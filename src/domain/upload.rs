use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions accepted by the upload drop zone.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "js", "ts", "jsx", "tsx", "py", "java", "php", "rb", "go", "rs", "swift", "json", "txt", "md",
    "yml", "yaml",
];

/// Step of the upload workflow currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStep {
    #[default]
    ChooseType,
    Details,
    FileUpload,
    CodebaseAccess,
}

impl fmt::Display for UploadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChooseType => write!(f, "choose-type"),
            Self::Details => write!(f, "details"),
            Self::FileUpload => write!(f, "file-upload"),
            Self::CodebaseAccess => write!(f, "codebase-access"),
        }
    }
}

/// What the user is uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    /// A complete application or website; requires repository access.
    App,
    /// Individual code files.
    Files,
}

/// Repository permission requested at the codebase-access step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    #[default]
    ReadOnly,
    ReadWrite,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// A file attached to the draft. Content stays on disk; `source` is the handle to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftFile {
    pub name: String,
    pub size: u64,
    pub source: PathBuf,
}

impl DraftFile {
    pub fn new(name: impl Into<String>, size: u64, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            source: source.into(),
        }
    }

    /// Builds a draft file from a path on disk, reading its size from metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, metadata.len(), path))
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    pub fn is_accepted(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Programming language implied by the extension, if it is a source file.
    pub fn language(&self) -> Option<&'static str> {
        let language = match self.extension()?.as_str() {
            "js" | "jsx" => "JavaScript",
            "ts" | "tsx" => "TypeScript",
            "py" => "Python",
            "java" => "Java",
            "php" => "PHP",
            "rb" => "Ruby",
            "go" => "Go",
            "rs" => "Rust",
            "swift" => "Swift",
            _ => return None,
        };
        Some(language)
    }
}

/// In-progress, unsaved state of one run of the upload workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadDraft {
    pub step: UploadStep,
    pub project_type: Option<ProjectType>,
    pub name: String,
    pub description: String,
    pub files: Vec<DraftFile>,
    pub codebase_url: String,
    pub access_type: AccessType,
}

impl UploadDraft {
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Snapshot of a draft handed to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub project_type: ProjectType,
    pub name: String,
    pub description: String,
    pub files: Vec<DraftFile>,
    pub codebase_url: String,
    pub access_type: AccessType,
}
