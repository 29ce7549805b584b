use crate::support::spawn_app;
use serde_json::{Value, json};

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;

    let resp = app.anonymous().get(app.url("/api/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = spawn_app().await;

    let resp = app.anonymous().get(app.url("/api/pitlane")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}
