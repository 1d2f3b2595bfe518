use crate::{CaseInfo, DocumentId, JobStatus, SelectedFile, StatusReport, WorkspaceContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User dropped or picked files; one upload entry per file.
    FilesSubmitted(Vec<SelectedFile>),
    /// Ingestion endpoint acknowledged an upload.
    UploadAccepted {
        document_id: DocumentId,
        job_id: String,
        status: JobStatus,
    },
    /// Upload request failed (network, HTTP status, unreadable file).
    UploadFailed {
        document_id: DocumentId,
        error: String,
    },
    /// Status endpoint answered a poll.
    StatusReceived {
        document_id: DocumentId,
        report: StatusReport,
    },
    /// Status poll failed; polling continues.
    StatusPollFailed {
        document_id: DocumentId,
        error: String,
    },
    /// Restore the workspace context saved by a previous session.
    WorkspaceRestored(WorkspaceContext),
    /// Backend bootstrap answered; absent fields keep their current value.
    WorkspaceBootstrapped {
        case: Option<CaseInfo>,
        module: Option<String>,
        submodule: Option<String>,
    },
    /// User picked a case, or cleared it with `None`.
    CaseSelected(Option<String>),
    PermissionsChanged(Vec<String>),
    /// User picked a halo module, optionally with a submodule.
    HaloModuleSelected {
        module: String,
        submodule: Option<String>,
    },
    /// Render tick.
    Tick,
    NoOp,
}
