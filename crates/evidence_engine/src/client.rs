use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::wire::{HaloBootstrap, IngestionReceipt, IngestionStatusResponse, RemoteCase};
use crate::{ApiError, FailureKind, UploadRequest};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin plus optional path prefix, e.g. `http://127.0.0.1:8000/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Bounds status and workspace requests.
    pub request_timeout: Duration,
    /// Bounds a whole upload including the body; `None` waits as long as the
    /// backend keeps accepting data.
    pub upload_timeout: Option<Duration>,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            upload_timeout: None,
            poll_interval: Duration::from_secs(5),
        }
    }
}

#[async_trait::async_trait]
pub trait IngestionApi: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<IngestionReceipt, ApiError>;

    async fn status(&self, document_id: &str) -> Result<IngestionStatusResponse, ApiError>;

    /// `Ok(None)` when the backend has no active case.
    async fn current_case(&self) -> Result<Option<RemoteCase>, ApiError>;

    async fn halo_bootstrap(&self) -> Result<HaloBootstrap, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestIngestionApi {
    base_url: String,
    client: reqwest::Client,
    request_timeout: Duration,
    upload_timeout: Option<Duration>,
}

impl ReqwestIngestionApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: settings.base_url.trim().to_string(),
            client,
            request_timeout: settings.request_timeout,
            upload_timeout: settings.upload_timeout,
        })
    }

    /// Appends `segments` to the base path; a trailing `/` on the base is ignored.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            ApiError::new(
                FailureKind::InvalidUrl,
                format!("invalid api base url {:?}: {err}", self.base_url),
            )
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("api base url {:?} cannot carry a path", self.base_url),
                )
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, ApiError> {
        self.client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl IngestionApi for ReqwestIngestionApi {
    async fn upload(&self, request: &UploadRequest) -> Result<IngestionReceipt, ApiError> {
        let url = self.endpoint(&["ingestion"])?;
        let unreadable = |err: std::io::Error| {
            ApiError::new(
                FailureKind::Io,
                format!("could not read {}: {err}", request.path.display()),
            )
        };
        let file = File::open(&request.path).await.map_err(unreadable)?;
        let length = file.metadata().await.map_err(unreadable)?.len();
        engine_info!(
            "Uploading {} ({} bytes) as document {}",
            request.file_name,
            length,
            request.document_id
        );

        let body = Body::wrap_stream(ReaderStream::new(file));
        let mut form = Form::new()
            .part(
                "file",
                Part::stream_with_length(body, length).file_name(request.file_name.clone()),
            )
            .text("document_id", request.document_id.clone());
        if let Some(relative_path) = &request.relative_path {
            form = form.text("relative_path", relative_path.clone());
        }

        let mut builder = self.client.post(url).multipart(form);
        if let Some(limit) = self.upload_timeout {
            builder = builder.timeout(limit);
        }
        let response = builder.send().await.map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn status(&self, document_id: &str) -> Result<IngestionStatusResponse, ApiError> {
        let url = self.endpoint(&["ingestion", document_id, "status"])?;
        engine_debug!("Polling {}", url);
        let response = self.get(url).await?;
        decode_json(response).await
    }

    async fn current_case(&self) -> Result<Option<RemoteCase>, ApiError> {
        let url = self.endpoint(&["cases", "current"])?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: serde_json::Value = decode_json(response).await?;
        match body.get("id").and_then(|id| id.as_str()) {
            Some(_) => serde_json::from_value(body)
                .map(Some)
                .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string())),
            None => Ok(None),
        }
    }

    async fn halo_bootstrap(&self) -> Result<HaloBootstrap, ApiError> {
        let url = self.endpoint(&["bootstrap"])?;
        let response = self.get(url).await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            error_message(status, &body),
        ));
    }
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

/// Prefers the backend's `detail` text, then the reason phrase.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Request failed".to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
