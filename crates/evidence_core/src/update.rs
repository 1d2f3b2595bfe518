use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{AppState, DocumentId, Effect, JobStatus, Msg, SelectedFile, StatusReport};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSubmitted(files) => submit_files(&mut state, files),
        Msg::UploadAccepted {
            document_id,
            job_id,
            status,
        } => {
            let Some(entry) = state.entry_mut(&document_id) else {
                return unknown_document(state, &document_id);
            };
            entry.job_id = Some(job_id);
            entry.advance(status);
            let poll = entry.claim_poll();
            state.mark_dirty();
            poll_effect(poll, document_id)
        }
        Msg::UploadFailed { document_id, error } => {
            let Some(entry) = state.entry_mut(&document_id) else {
                return unknown_document(state, &document_id);
            };
            engine_warn!("Upload of {} failed: {}", entry.file_name, error);
            entry.error = Some(error.clone());
            entry.advance(JobStatus::Failed);
            state.set_batch_error(Some(error));
            state.mark_dirty();
            Vec::new()
        }
        Msg::StatusReceived {
            document_id,
            report,
        } => {
            let Some(entry) = state.entry_mut(&document_id) else {
                return unknown_document(state, &document_id);
            };
            entry.poll_pending = false;
            if entry.status.is_terminal() {
                engine_debug!("Late status for settled document {}", document_id);
                return (state, Vec::new());
            }
            apply_report(entry, report);
            let poll = entry.claim_poll();
            if !poll {
                engine_info!(
                    "Document {} settled as {:?} after {} polls",
                    document_id,
                    entry.status,
                    entry.polls
                );
            }
            state.mark_dirty();
            poll_effect(poll, document_id)
        }
        Msg::StatusPollFailed { document_id, error } => {
            let Some(entry) = state.entry_mut(&document_id) else {
                return unknown_document(state, &document_id);
            };
            entry.poll_pending = false;
            if entry.status.is_terminal() {
                return (state, Vec::new());
            }
            engine_warn!("Status poll for {} failed: {}", document_id, error);
            entry.poll_error = Some(error);
            let poll = entry.claim_poll();
            state.mark_dirty();
            poll_effect(poll, document_id)
        }
        Msg::WorkspaceRestored(context) => {
            if *state.workspace() != context {
                *state.workspace_mut() = context;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::WorkspaceBootstrapped {
            case,
            module,
            submodule,
        } => change_workspace(&mut state, |workspace| {
            if let Some(case) = case {
                workspace.active_case = Some(case);
            }
            workspace.select_halo(module.as_deref(), submodule.as_deref());
        }),
        Msg::CaseSelected(id) => {
            change_workspace(&mut state, |workspace| workspace.select_case(id))
        }
        Msg::PermissionsChanged(permissions) => change_workspace(&mut state, |workspace| {
            workspace.set_permissions(permissions)
        }),
        Msg::HaloModuleSelected { module, submodule } => {
            change_workspace(&mut state, |workspace| {
                workspace.select_halo(Some(module.as_str()), submodule.as_deref())
            })
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_files(state: &mut AppState, files: Vec<SelectedFile>) -> Vec<Effect> {
    if files.is_empty() {
        return Vec::new();
    }
    state.set_batch_error(None);
    engine_info!("Queueing {} file(s) for ingestion", files.len());

    let mut effects = Vec::with_capacity(files.len());
    for file in files {
        let document_id = state.push_queued(&file);
        effects.push(Effect::UploadFile {
            document_id,
            path: file.path,
            file_name: file.file_name,
            relative_path: file.relative_path,
        });
    }
    effects
}

fn apply_report(entry: &mut crate::state::UploadEntry, report: StatusReport) {
    entry.polls += 1;
    if !report.job_id.is_empty() {
        entry.job_id = Some(report.job_id);
    }
    if report.updated_at.is_some() {
        entry.updated_at = report.updated_at;
    }
    entry.details = Some(report.details);
    entry.poll_error = None;
    entry.advance(report.status);

    let unsuccessful = matches!(entry.status, JobStatus::Failed | JobStatus::Cancelled);
    if unsuccessful && entry.error.is_none() && !report.errors.is_empty() {
        entry.error = Some(report.errors.join("; "));
    }
}

fn change_workspace(
    state: &mut AppState,
    change: impl FnOnce(&mut crate::WorkspaceContext),
) -> Vec<Effect> {
    let before = state.workspace().clone();
    change(state.workspace_mut());
    if *state.workspace() == before {
        return Vec::new();
    }
    state.mark_dirty();
    vec![Effect::PersistWorkspace(state.workspace().clone())]
}

fn poll_effect(poll: bool, document_id: DocumentId) -> Vec<Effect> {
    if poll {
        vec![Effect::PollStatus { document_id }]
    } else {
        Vec::new()
    }
}

fn unknown_document(state: AppState, document_id: &DocumentId) -> (AppState, Vec<Effect>) {
    engine_warn!("Message for unknown document {}", document_id);
    (state, Vec::new())
}
