use racetrack_auth::Argon2Hasher;
use racetrack_server::{AppState, ServerConfig};
use racetrack_storage::Database;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

pub const ADMIN: (&str, &str) = ("admin", "Admin123");
pub const FAN: (&str, &str) = ("fan", "Racing1");

pub struct TestApp {
    pub base: String,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(ServerConfig::default()).await
}

/// Bind to port 0 and serve the router in the background.
pub async fn spawn_app_with(config: ServerConfig) -> TestApp {
    let db = Database::in_memory().await.unwrap();
    let hasher = Argon2Hasher::with_cost(1024, 1).unwrap();
    let state = AppState::new(db, &config, hasher);
    state.auth.ensure_admin(ADMIN.0, ADMIN.1).await.unwrap();

    let app = racetrack_server::router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        state,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// A client with its own cookie jar and no session yet
    pub fn anonymous(&self) -> Client {
        Client::builder().cookie_store(true).build().unwrap()
    }

    pub async fn login_as(&self, (username, password): (&str, &str)) -> Client {
        let client = self.anonymous();
        let resp = client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "login as {username}");
        client
    }

    pub async fn admin(&self) -> Client {
        self.login_as(ADMIN).await
    }

    /// Registers the non-admin account on first use
    pub async fn fan(&self) -> Client {
        let client = self.anonymous();
        client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "username": FAN.0, "password": FAN.1 }))
            .send()
            .await
            .unwrap();
        self.login_as(FAN).await
    }

    pub async fn create_driver(&self, admin: &Client, name: &str) -> i64 {
        let body = post(
            admin,
            &self.url("/api/drivers"),
            json!({
                "full_name": name,
                "nationality": "Italian",
                "license_number": "IT-0016",
                "is_active": 1
            }),
        )
        .await;
        body["id"].as_i64().unwrap()
    }

    pub async fn create_race(&self, admin: &Client, track: &str, date: &str) -> i64 {
        let body = post(
            admin,
            &self.url("/api/races"),
            json!({
                "track_name": track,
                "race_date": date,
                "distance_km": 306.7,
                "weather_forecast": "Sunny"
            }),
        )
        .await;
        body["id"].as_i64().unwrap()
    }
}

/// POST that must succeed; returns the JSON body
pub async fn post(client: &Client, url: &str, body: Value) -> Value {
    let resp = client.post(url).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "POST {url}");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    body
}

/// Status plus the `error` message of a failed response
pub async fn error_of(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    let message = body["error"]
        .as_str()
        .unwrap_or_else(|| panic!("no error field in {body}"))
        .to_string();
    (status, message)
}
