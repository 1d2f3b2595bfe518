//! JSON bodies exchanged with the ingestion and workspace endpoints.
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionJobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// Answer to `POST /ingestion`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestionReceipt {
    pub job_id: String,
    pub status: IngestionJobStatus,
}

/// Answer to `GET /ingestion/{document_id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestionStatusResponse {
    pub job_id: String,
    pub status: IngestionJobStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub documents: Vec<IngestionDocument>,
    #[serde(default)]
    pub errors: Vec<IngestionErrorModel>,
    #[serde(default)]
    pub status_details: StatusDetailsModel,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestionDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestionErrorModel {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl IngestionErrorModel {
    /// `source: message`, or just the message when no source is given.
    pub fn describe(&self) -> String {
        match &self.source {
            Some(source) => format!("{source}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusDetailsModel {
    #[serde(default)]
    pub ingestion: Option<IngestionCounts>,
    #[serde(default)]
    pub timeline: Option<TimelineCounts>,
    #[serde(default)]
    pub forensics: Option<ForensicsSummary>,
    #[serde(default)]
    pub graph: Option<GraphCounts>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestionCounts {
    pub documents: u64,
    #[serde(default)]
    pub skipped: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineCounts {
    pub events: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForensicsSummary {
    #[serde(default)]
    pub artifacts: Vec<Value>,
    #[serde(default)]
    pub last_run_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphCounts {
    pub nodes: u64,
    #[serde(default)]
    pub edges: u64,
    #[serde(default)]
    pub triples: u64,
}

/// Answer to `GET /cases/current`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteCase {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Answer to `GET /bootstrap`. The viewport payload is a browser concern and is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaloBootstrap {
    #[serde(default)]
    pub active_module_id: Option<String>,
    #[serde(default)]
    pub active_submodule_id: Option<String>,
}
