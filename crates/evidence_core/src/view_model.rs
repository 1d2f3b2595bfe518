use crate::{DocumentId, JobStatus, StatusDetails, WorkspaceContext};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub uploads: Vec<UploadRowView>,
    pub workspace: WorkspaceContext,
    /// Most recent upload failure of the current batch.
    pub batch_error: Option<String>,
    pub active_polls: usize,
    /// Every upload has reached a terminal status.
    pub settled: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn count(&self, status: JobStatus) -> usize {
        self.uploads.iter().filter(|row| row.status == status).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRowView {
    pub document_id: DocumentId,
    pub file_name: String,
    pub relative_path: Option<String>,
    pub status: JobStatus,
    pub status_label: &'static str,
    /// Backend job id, or `pending` until the upload is acknowledged.
    pub job_label: String,
    pub updated_at: Option<String>,
    pub details: Option<StatusDetails>,
    /// Upload or job error, falling back to the last poll error.
    pub error: Option<String>,
    pub monitoring: bool,
}
