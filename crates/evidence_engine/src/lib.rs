//! Evidence engine: HTTP client for the ingestion backend and effect execution.
mod client;
mod discover;
mod engine;
mod persist;
mod types;
pub mod wire;

pub use client::{ClientSettings, IngestionApi, ReqwestIngestionApi};
pub use discover::{discover_files, DiscoverError, DiscoveredFile};
pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use types::{ApiError, EngineEvent, EngineStopped, FailureKind, UploadRequest};
