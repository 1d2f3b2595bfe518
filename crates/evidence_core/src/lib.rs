//! Evidence core: pure upload-tracking state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;
mod workspace;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, DocumentId, SelectedFile, StatusDetails, StatusReport};
pub use status::{JobStatus, Transition};
pub use update::update;
pub use view_model::{AppViewModel, UploadRowView};
pub use workspace::{CaseInfo, HaloSelection, WorkspaceContext, DEFAULT_MODULE, DEFAULT_SUBMODULE};
