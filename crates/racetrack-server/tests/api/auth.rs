use crate::support::{ADMIN, FAN, error_of, spawn_app};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Log in without a cookie store and return the issued session id.
async fn raw_login(base: &str, previous: Option<&str>) -> String {
    let client = Client::new();
    let mut req = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "username": ADMIN.0, "password": ADMIN.1 }));
    if let Some(sid) = previous {
        req = req.header(COOKIE, format!("racetrack.sid={sid}"));
    }
    let resp = req.send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));

    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("racetrack.sid="))
        .unwrap()
        .to_string()
}

async fn me_with(base: &str, sid: &str) -> Value {
    Client::new()
        .get(format!("{base}/api/auth/me"))
        .header(COOKIE, format!("racetrack.sid={sid}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_me_logout() {
    let app = spawn_app().await;
    let client = app.anonymous();

    let me: Value = client
        .get(app.url("/api/auth/me"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me, json!({ "authenticated": false }));

    let resp = client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "username": "bob", "password": "Secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "message": "User created" }));

    let resp = client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "bob", "password": "Secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged in");
    assert_eq!(body["user"]["username"], "bob");
    assert_eq!(body["user"]["role"], "user");

    let me: Value = client
        .get(app.url("/api/auth/me"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["authenticated"], true);
    assert_eq!(me["user"]["username"], "bob");

    let resp = client.post(app.url("/api/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let me: Value = client
        .get(app.url("/api/auth/me"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["authenticated"], false);
}

#[tokio::test]
async fn logout_without_session_succeeds() {
    let app = spawn_app().await;
    let resp = app
        .anonymous()
        .post(app.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = spawn_app().await;
    let client = app.anonymous();

    let resp = client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "username": ADMIN.0, "password": "Another1" }))
        .send()
        .await
        .unwrap();

    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message, "Username already exists");
}

#[tokio::test]
async fn registration_rules_are_reported_together() {
    let app = spawn_app().await;

    let resp = app
        .anonymous()
        .post(app.url("/api/auth/register"))
        .json(&json!({ "username": "bo", "password": "secret" }))
        .send()
        .await
        .unwrap();

    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.lines().count() >= 3, "{message}");
    assert!(message.lines().all(|line| line.starts_with("Error: ")));
}

#[tokio::test]
async fn failed_logins_look_identical() {
    let app = spawn_app().await;
    app.fan().await;
    let client = app.anonymous();

    let wrong_password = client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": FAN.0, "password": "Racing2" }))
        .send()
        .await
        .unwrap();
    let unknown_user = client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "nobody", "password": FAN.1 }))
        .send()
        .await
        .unwrap();

    let a = error_of(wrong_password).await;
    let b = error_of(unknown_user).await;
    assert_eq!(a, (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    assert_eq!(a, b);
}

#[tokio::test]
async fn login_replaces_presented_session() {
    let app = spawn_app().await;

    let first = raw_login(&app.base, None).await;
    assert_eq!(me_with(&app.base, &first).await["authenticated"], true);

    let second = raw_login(&app.base, Some(&first)).await;
    assert_ne!(first, second);
    assert_eq!(me_with(&app.base, &first).await["authenticated"], false);
    assert_eq!(me_with(&app.base, &second).await["user"]["role"], "admin");
}

#[tokio::test]
async fn forged_session_is_anonymous() {
    let app = spawn_app().await;

    assert_eq!(me_with(&app.base, "not-a-session").await["authenticated"], false);

    let resp = Client::new()
        .get(app.url("/api/drivers"))
        .header(COOKIE, "racetrack.sid=not-a-session")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let resp = app
        .anonymous()
        .post(app.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    let (status, _) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tiered_requests_refresh_the_session_cookie() {
    let app = spawn_app().await;
    let sid = raw_login(&app.base, None).await;

    let resp = Client::new()
        .get(app.url("/api/drivers"))
        .header(COOKIE, format!("racetrack.sid={sid}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed = resp
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(refreshed.starts_with(&format!("racetrack.sid={sid}")), "{refreshed}");
    assert!(refreshed.contains("Max-Age=86400"), "{refreshed}");
    assert!(refreshed.contains("HttpOnly"));

    let me = Client::new()
        .get(app.url("/api/auth/me"))
        .header(COOKIE, format!("racetrack.sid={sid}"))
        .send()
        .await
        .unwrap();
    assert!(me.headers().get(SET_COOKIE).is_none());

    let anonymous = Client::new()
        .get(app.url("/api/drivers"))
        .header(COOKIE, "racetrack.sid=not-a-session")
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert!(anonymous.headers().get(SET_COOKIE).is_none());
}
