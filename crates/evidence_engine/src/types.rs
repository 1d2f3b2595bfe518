use std::fmt;
use std::path::PathBuf;

use crate::wire::{HaloBootstrap, IngestionReceipt, IngestionStatusResponse, RemoteCase};

/// One file to send to `POST /ingestion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub document_id: String,
    pub path: PathBuf,
    pub file_name: String,
    pub relative_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UploadCompleted {
        document_id: String,
        result: Result<IngestionReceipt, ApiError>,
    },
    StatusFetched {
        document_id: String,
        result: Result<IngestionStatusResponse, ApiError>,
    },
    BootstrapFetched {
        case: Result<Option<RemoteCase>, ApiError>,
        halo: Result<HaloBootstrap, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The engine thread has exited; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine stopped unexpectedly")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Io,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "file error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
        }
    }
}
