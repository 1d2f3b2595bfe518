use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};
use tokio::sync::mpsc as async_mpsc;

use crate::client::{ClientSettings, IngestionApi, ReqwestIngestionApi};
use crate::{ApiError, EngineEvent, EngineStopped, UploadRequest};

enum EngineCommand {
    Upload(UploadRequest),
    Poll { document_id: String },
    Bootstrap,
}

/// Runs network work on a background runtime and reports results as events.
///
/// Uploads go through a single worker, one at a time in the order they were
/// queued. Each poll is an independent task: wait one poll interval, query
/// status once, report.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = ReqwestIngestionApi::new(&settings)?;
        Ok(Self::with_api(Arc::new(api), settings.poll_interval))
    }

    pub fn with_api(api: Arc<dyn IngestionApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };

            let (upload_tx, upload_rx) = async_mpsc::unbounded_channel();
            runtime.spawn(upload_worker(api.clone(), upload_rx, event_tx.clone()));

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Upload(request) => {
                        let _ = upload_tx.send(request);
                    }
                    EngineCommand::Poll { document_id } => {
                        runtime.spawn(poll_once(
                            api.clone(),
                            document_id,
                            poll_interval,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Bootstrap => {
                        runtime.spawn(bootstrap(api.clone(), event_tx.clone()));
                    }
                }
            }
            engine_info!("Engine command channel closed; shutting down");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn upload(&self, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Upload(request));
    }

    pub fn poll(&self, document_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Poll {
            document_id: document_id.into(),
        });
    }

    /// Fetch the current case and halo bootstrap payload.
    pub fn bootstrap(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Bootstrap);
    }

    /// `Ok(None)` when nothing arrived within `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

async fn upload_worker(
    api: Arc<dyn IngestionApi>,
    mut queue: async_mpsc::UnboundedReceiver<UploadRequest>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    while let Some(request) = queue.recv().await {
        let result = api.upload(&request).await;
        let _ = event_tx.send(EngineEvent::UploadCompleted {
            document_id: request.document_id,
            result,
        });
    }
}

async fn poll_once(
    api: Arc<dyn IngestionApi>,
    document_id: String,
    delay: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    tokio::time::sleep(delay).await;
    let result = api.status(&document_id).await;
    let _ = event_tx.send(EngineEvent::StatusFetched {
        document_id,
        result,
    });
}

async fn bootstrap(api: Arc<dyn IngestionApi>, event_tx: mpsc::Sender<EngineEvent>) {
    let case = api.current_case().await;
    let halo = api.halo_bootstrap().await;
    let _ = event_tx.send(EngineEvent::BootstrapFetched { case, halo });
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn exited_engine_thread_is_reported_at_once() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        drop(event_tx);
        let engine = EngineHandle { cmd_tx, event_rx };

        let started = Instant::now();
        assert_eq!(engine.recv_timeout(Duration::from_secs(5)), Err(EngineStopped));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn quiet_engine_times_out_without_error() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let engine = EngineHandle { cmd_tx, event_rx };

        assert_eq!(engine.recv_timeout(Duration::from_millis(20)), Ok(None));
    }
}
