use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use engine_logging::engine_warn;
use uuid::Uuid;

use crate::status::{JobStatus, Transition};
use crate::view_model::{AppViewModel, UploadRowView};
use crate::workspace::WorkspaceContext;

/// Client-generated identifier for one uploaded document.
///
/// Minted before any network call so the entry can be shown optimistically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Path below the dropped folder, e.g. `case-42/scans/page1.pdf`.
    pub relative_path: Option<String>,
}

/// Pipeline counters summarised from a status response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusDetails {
    pub documents: Option<u64>,
    pub timeline_events: Option<u64>,
    pub graph_nodes: Option<u64>,
    pub forensic_artifacts: usize,
}

/// One status poll result, already decoded by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub job_id: String,
    pub status: JobStatus,
    pub updated_at: Option<String>,
    pub details: StatusDetails,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadEntry {
    pub(crate) document_id: DocumentId,
    pub(crate) file_name: String,
    pub(crate) relative_path: Option<String>,
    pub(crate) job_id: Option<String>,
    pub(crate) status: JobStatus,
    pub(crate) error: Option<String>,
    pub(crate) updated_at: Option<String>,
    pub(crate) details: Option<StatusDetails>,
    pub(crate) poll_error: Option<String>,
    pub(crate) polls: u32,
    pub(crate) poll_pending: bool,
}

impl UploadEntry {
    fn queued(document_id: DocumentId, file: &SelectedFile) -> Self {
        Self {
            document_id,
            file_name: file.file_name.clone(),
            relative_path: file.relative_path.clone(),
            job_id: None,
            status: JobStatus::Queued,
            error: None,
            updated_at: None,
            details: None,
            poll_error: None,
            polls: 0,
            poll_pending: false,
        }
    }

    /// Moves to `next` if the lifecycle allows it; returns whether anything changed.
    pub(crate) fn advance(&mut self, next: JobStatus) -> bool {
        match self.status.transition(next) {
            Transition::Applied => {
                self.status = next;
                true
            }
            Transition::Unchanged => false,
            Transition::Rejected => {
                engine_warn!(
                    "Ignoring status {:?} -> {:?} for document {}",
                    self.status,
                    next,
                    self.document_id
                );
                false
            }
        }
    }

    /// Claims the single poll slot; `false` when a poll is already scheduled
    /// or the job is settled.
    pub(crate) fn claim_poll(&mut self) -> bool {
        if self.status.is_terminal() || self.poll_pending {
            return false;
        }
        self.poll_pending = true;
        true
    }

    fn row(&self) -> UploadRowView {
        UploadRowView {
            document_id: self.document_id.clone(),
            file_name: self.file_name.clone(),
            relative_path: self.relative_path.clone(),
            status: self.status,
            status_label: self.status.label(),
            job_label: self
                .job_id
                .clone()
                .unwrap_or_else(|| "pending".to_string()),
            updated_at: self.updated_at.clone(),
            details: self.details.clone(),
            error: self.error.clone().or_else(|| self.poll_error.clone()),
            monitoring: !self.status.is_terminal(),
        }
    }
}

/// Session state: the append-only upload list plus the workspace context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    uploads: Vec<UploadEntry>,
    index: HashMap<DocumentId, usize>,
    workspace: WorkspaceContext,
    batch_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            uploads: self.uploads.iter().map(UploadEntry::row).collect(),
            workspace: self.workspace.clone(),
            batch_error: self.batch_error.clone(),
            active_polls: self.uploads.iter().filter(|e| e.poll_pending).count(),
            settled: self.is_settled(),
            dirty: self.dirty,
        }
    }

    /// True once every entry has reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.uploads.iter().all(|entry| entry.status.is_terminal())
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.len()
    }

    pub fn workspace(&self) -> &WorkspaceContext {
        &self.workspace
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_queued(&mut self, file: &SelectedFile) -> DocumentId {
        let mut document_id = DocumentId::generate();
        while self.index.contains_key(&document_id) {
            document_id = DocumentId::generate();
        }
        self.index.insert(document_id.clone(), self.uploads.len());
        self.uploads
            .push(UploadEntry::queued(document_id.clone(), file));
        self.mark_dirty();
        document_id
    }

    pub(crate) fn entry_mut(&mut self, document_id: &DocumentId) -> Option<&mut UploadEntry> {
        let position = *self.index.get(document_id)?;
        self.uploads.get_mut(position)
    }

    pub(crate) fn set_batch_error(&mut self, error: Option<String>) {
        if self.batch_error != error {
            self.batch_error = error;
            self.mark_dirty();
        }
    }

    pub(crate) fn workspace_mut(&mut self) -> &mut WorkspaceContext {
        &mut self.workspace
    }
}
