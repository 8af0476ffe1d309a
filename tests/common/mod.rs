#![allow(dead_code)]

use axum::Router;
use portfolio_site::types::GitHubRepo;
use serde_json::{json, Value};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_mock_api(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock API listener");
    let addr = listener.local_addr().expect("Mock API has no local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock API server failed");
    });

    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Throwaway listener has no local address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn repo(name: &str, fork: bool, stars: u32) -> GitHubRepo {
    GitHubRepo {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        language: Some("Rust".to_string()),
        stargazers_count: stars,
        fork,
        html_url: format!("https://github.com/octocat/{name}"),
    }
}

pub fn repo_json(name: &str, fork: bool, stars: u32) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("octocat/{name}"),
        "description": null,
        "language": "Go",
        "stargazers_count": stars,
        "fork": fork,
        "html_url": format!("https://github.com/octocat/{name}"),
        "updated_at": "2024-01-01T00:00:00Z"
    })
}
