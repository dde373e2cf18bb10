//! Integration tests for fetching the project list over HTTP.

use debugflow::domain::{ProjectKind, ProjectStatus};
use debugflow::infra::api::{
    ApiError, HttpProjectsApi, ProjectsApi, fallback_projects, load_projects_or_fallback,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one canned HTTP response per connection and returns the base URL.
async fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{addr}")
}

const PROJECTS_BODY: &str = r#"{"projects":[{"id":"proj_42","name":"Billing API","type":"Web Application","status":"in-progress","lastModified":"2024-03-01T12:00:00Z","bugsFound":4,"bugsFixed":1,"codebase":"https://github.com/acme/billing","language":"Go"}]}"#;

#[tokio::test]
async fn test_fetch_projects() {
    let url = serve("200 OK", PROJECTS_BODY).await;
    let api = HttpProjectsApi::new(&url, Duration::from_secs(5)).unwrap();

    let projects = api.list_projects().await.unwrap();

    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project.id, "proj_42");
    assert_eq!(project.kind, ProjectKind::WebApplication);
    assert_eq!(project.status, ProjectStatus::InProgress);
    assert_eq!(project.codebase_ref, "https://github.com/acme/billing");
    assert_eq!(load_projects_or_fallback(&api).await, projects);
}

#[tokio::test]
async fn test_http_error_falls_back() {
    let url = serve("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    let api = HttpProjectsApi::new(&url, Duration::from_secs(5)).unwrap();

    assert!(matches!(api.list_projects().await, Err(ApiError::Status(500))));
    assert_eq!(load_projects_or_fallback(&api).await, fallback_projects());
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let url = serve("200 OK", r#"{"items":[]}"#).await;
    let api = HttpProjectsApi::new(&url, Duration::from_secs(5)).unwrap();

    assert!(matches!(api.list_projects().await, Err(ApiError::Decode(_))));
    assert_eq!(load_projects_or_fallback(&api).await, fallback_projects());
}

#[tokio::test]
async fn test_unreachable_backend_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpProjectsApi::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let projects = load_projects_or_fallback(&api).await;

    let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["proj_001", "proj_002"]);
}
