use std::fs;
use std::time::Duration;

use evidence_engine::wire::{HaloBootstrap, IngestionJobStatus};
use evidence_engine::{ClientSettings, FailureKind, IngestionApi, ReqwestIngestionApi, UploadRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestIngestionApi {
    engine_logging::initialize_for_tests();
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestIngestionApi::new(&settings).expect("client")
}

fn request_for(dir: &TempDir, name: &str, relative_path: Option<&str>) -> UploadRequest {
    let path = dir.path().join(name);
    fs::write(&path, b"%PDF-1.7 exhibit").unwrap();
    UploadRequest {
        document_id: "doc-1".to_string(),
        path,
        file_name: name.to_string(),
        relative_path: relative_path.map(str::to_string),
    }
}

#[tokio::test]
async fn upload_sends_multipart_fields_and_decodes_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .and(body_string_contains("name=\"document_id\""))
        .and(body_string_contains("doc-1"))
        .and(body_string_contains("name=\"relative_path\""))
        .and(body_string_contains("case-7/exhibit.pdf"))
        .and(body_string_contains("filename=\"exhibit.pdf\""))
        .and(body_string_contains("%PDF-1.7 exhibit"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-42", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = request_for(&dir, "exhibit.pdf", Some("case-7/exhibit.pdf"));
    let receipt = api_for(&server).upload(&request).await.expect("upload ok");

    assert_eq!(receipt.job_id, "job-42");
    assert_eq!(receipt.status, IngestionJobStatus::Queued);
}

#[tokio::test]
async fn upload_without_relative_path_omits_the_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-1", "status": "running"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = request_for(&dir, "memo.txt", None);
    api_for(&server).upload(&request).await.expect("upload ok");

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body).into_owned();
    assert!(body.contains("name=\"document_id\""));
    assert!(!body.contains("relative_path"));
}

#[tokio::test]
async fn upload_error_uses_detail_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "Missing ingest:enqueue scope"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = request_for(&dir, "a.pdf", None);
    let err = api_for(&server).upload(&request).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(403));
    assert_eq!(err.message, "Missing ingest:enqueue scope");
}

#[tokio::test]
async fn upload_of_missing_file_fails_without_a_request() {
    let server = MockServer::start().await;
    let request = UploadRequest {
        document_id: "doc-1".to_string(),
        path: "/definitely/not/here.pdf".into(),
        file_name: "here.pdf".to_string(),
        relative_path: None,
    };

    let err = api_for(&server).upload(&request).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Io);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn status_decodes_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ingestion/doc-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "status": "succeeded",
            "submitted_at": "2026-10-19T09:00:00Z",
            "updated_at": "2026-10-19T09:05:00Z",
            "documents": [{"id": "doc-1", "title": "Exhibit A", "type": "pdf", "metadata": {}}],
            "errors": [],
            "status_details": {
                "ingestion": {"documents": 1, "skipped": []},
                "timeline": {"events": 3},
                "forensics": {"artifacts": [{"kind": "hash"}], "last_run_at": null},
                "graph": {"nodes": 17, "edges": 20, "triples": 31}
            }
        })))
        .mount(&server)
        .await;

    let status = api_for(&server).status("doc-1").await.expect("status ok");

    assert_eq!(status.status, IngestionJobStatus::Succeeded);
    assert_eq!(status.updated_at.as_deref(), Some("2026-10-19T09:05:00Z"));
    assert_eq!(status.documents[0].kind, "pdf");
    let details = status.status_details;
    assert_eq!(details.ingestion.unwrap().documents, 1);
    assert_eq!(details.timeline.unwrap().events, 3);
    assert_eq!(details.graph.unwrap().nodes, 17);
    assert_eq!(details.forensics.unwrap().artifacts.len(), 1);
}

#[tokio::test]
async fn status_with_unknown_value_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ingestion/doc-1/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "j", "status": "paused"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).status("doc-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn status_http_error_without_detail_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ingestion/doc-1/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).status("doc-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "Service Unavailable");
}

#[tokio::test]
async fn slow_status_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ingestion/doc-1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"job_id": "j", "status": "running"})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let api = ReqwestIngestionApi::new(&settings).unwrap();
    let err = api.status("doc-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn base_url_prefix_is_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ingestion/doc-9/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "j", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: format!("{}/api/", server.uri()),
        ..ClientSettings::default()
    };
    let api = ReqwestIngestionApi::new(&settings).unwrap();
    api.status("doc-9").await.expect("status ok");
}

#[tokio::test]
async fn current_case_handles_missing_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cases/current"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).current_case().await.unwrap(), None);
}

#[tokio::test]
async fn current_case_and_bootstrap_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cases/current"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "CASE-1", "name": "Doe v. Acme"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bootstrap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activeModuleId": "graph",
            "activeSubmoduleId": "vector",
            "viewportPayload": {"zoom": 1.5, "center": [0, 0]}
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let case = api.current_case().await.unwrap().expect("case");
    assert_eq!(case.id, "CASE-1");
    assert_eq!(case.name.as_deref(), Some("Doe v. Acme"));

    let halo = api.halo_bootstrap().await.unwrap();
    assert_eq!(
        halo,
        HaloBootstrap {
            active_module_id: Some("graph".to_string()),
            active_submodule_id: Some("vector".to_string()),
        }
    );
}

#[tokio::test]
async fn current_case_without_id_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cases/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "draft"})))
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).current_case().await.unwrap(), None);
}

#[tokio::test]
async fn slow_upload_is_not_cut_off_by_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"job_id": "job-slow", "status": "queued"})),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let api = ReqwestIngestionApi::new(&settings).unwrap();
    let receipt = api
        .upload(&request_for(&dir, "exhibit.pdf", None))
        .await
        .unwrap();

    assert_eq!(receipt.job_id, "job-slow");
}

#[tokio::test]
async fn explicit_upload_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"job_id": "job-slow", "status": "queued"})),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let settings = ClientSettings {
        base_url: server.uri(),
        upload_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::default()
    };
    let api = ReqwestIngestionApi::new(&settings).unwrap();
    let err = api
        .upload(&request_for(&dir, "exhibit.pdf", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn large_file_is_streamed_whole() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingestion"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-big", "status": "queued"})),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan.tiff");
    let content: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &content).unwrap();

    let request = UploadRequest {
        document_id: "doc-big".to_string(),
        path,
        file_name: "scan.tiff".to_string(),
        relative_path: None,
    };
    api_for(&server).upload(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = &requests[0].body;
    let header = find(body, b"filename=\"scan.tiff\"").expect("file part");
    let start = header + find(&body[header..], b"\r\n\r\n").expect("part headers") + 4;
    assert_eq!(&body[start..start + content.len()], content.as_slice());
    assert_eq!(&body[start + content.len()..start + content.len() + 2], b"\r\n");
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
