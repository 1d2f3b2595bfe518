use std::path::PathBuf;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use evidence_core::{CaseInfo, DocumentId, Effect, JobStatus, Msg, StatusDetails, StatusReport};
use evidence_engine::wire::{IngestionJobStatus, IngestionStatusResponse, StatusDetailsModel};
use evidence_engine::{EngineEvent, EngineHandle, EngineStopped, UploadRequest};

use super::persistence;

/// Executes core effects against the engine and turns engine events into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    state_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, state_dir: PathBuf) -> Self {
        Self { engine, state_dir }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadFile {
                    document_id,
                    path,
                    file_name,
                    relative_path,
                } => {
                    engine_info!("UploadFile document_id={} file={}", document_id, file_name);
                    self.engine.upload(UploadRequest {
                        document_id: document_id.to_string(),
                        path,
                        file_name,
                        relative_path,
                    });
                }
                Effect::PollStatus { document_id } => {
                    engine_debug!("PollStatus document_id={}", document_id);
                    self.engine.poll(document_id.as_str());
                }
                Effect::PersistWorkspace(workspace) => {
                    persistence::save_workspace(&self.state_dir, &workspace);
                }
            }
        }
    }

    pub fn request_bootstrap(&self) {
        self.engine.bootstrap();
    }

    /// Waits up to `timeout` for the next engine result.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted {
            document_id,
            result,
        } => {
            let document_id = DocumentId::from(document_id);
            match result {
                Ok(receipt) => Msg::UploadAccepted {
                    document_id,
                    job_id: receipt.job_id,
                    status: map_status(receipt.status),
                },
                Err(err) => Msg::UploadFailed {
                    document_id,
                    error: err.message,
                },
            }
        }
        EngineEvent::StatusFetched {
            document_id,
            result,
        } => {
            let document_id = DocumentId::from(document_id);
            match result {
                Ok(response) => Msg::StatusReceived {
                    document_id,
                    report: map_report(response),
                },
                Err(err) => Msg::StatusPollFailed {
                    document_id,
                    error: err.message,
                },
            }
        }
        EngineEvent::BootstrapFetched { case, halo } => {
            let case = match case {
                Ok(case) => case.map(|case| CaseInfo {
                    id: case.id,
                    name: case.name,
                }),
                Err(err) => {
                    engine_warn!("Current case unavailable: {}", err);
                    None
                }
            };
            let (module, submodule) = match halo {
                Ok(halo) => (halo.active_module_id, halo.active_submodule_id),
                Err(err) => {
                    engine_warn!("Halo bootstrap unavailable: {}", err);
                    (None, None)
                }
            };
            Msg::WorkspaceBootstrapped {
                case,
                module,
                submodule,
            }
        }
    }
}

fn map_status(status: IngestionJobStatus) -> JobStatus {
    match status {
        IngestionJobStatus::Queued => JobStatus::Queued,
        IngestionJobStatus::Running => JobStatus::Running,
        IngestionJobStatus::Succeeded => JobStatus::Succeeded,
        IngestionJobStatus::Failed => JobStatus::Failed,
        IngestionJobStatus::Cancelled => JobStatus::Cancelled,
    }
}

fn map_report(response: IngestionStatusResponse) -> StatusReport {
    StatusReport {
        job_id: response.job_id,
        status: map_status(response.status),
        updated_at: response.updated_at,
        details: summarize(&response.status_details),
        errors: response.errors.iter().map(|err| err.describe()).collect(),
    }
}

fn summarize(details: &StatusDetailsModel) -> StatusDetails {
    StatusDetails {
        documents: details.ingestion.as_ref().map(|i| i.documents),
        timeline_events: details.timeline.as_ref().map(|t| t.events),
        graph_nodes: details.graph.as_ref().map(|g| g.nodes),
        forensic_artifacts: details
            .forensics
            .as_ref()
            .map_or(0, |f| f.artifacts.len()),
    }
}
