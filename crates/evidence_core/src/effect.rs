use std::path::PathBuf;

use crate::{DocumentId, WorkspaceContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one file to the ingestion endpoint. Uploads run in emission order.
    UploadFile {
        document_id: DocumentId,
        path: PathBuf,
        file_name: String,
        relative_path: Option<String>,
    },
    /// Query the status endpoint once, after the poll interval.
    PollStatus { document_id: DocumentId },
    /// Save the workspace context.
    PersistWorkspace(WorkspaceContext),
}
