use crate::support::{error_of, post, spawn_app};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn driver_body(name: &str) -> Value {
    json!({
        "full_name": name,
        "nationality": "German",
        "license_number": "DE-0005",
        "is_active": true
    })
}

#[tokio::test]
async fn reads_need_a_session() {
    let app = spawn_app().await;
    let anon = app.anonymous();

    for path in ["/api/drivers", "/api/drivers/all", "/api/drivers/1"] {
        let resp = anon.get(app.url(path)).send().await.unwrap();
        let (status, message) = error_of(resp).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(message, "Unauthorized: You must be logged in");
    }

    let fan = app.fan().await;
    let resp = fan.get(app.url("/api/drivers")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn writes_need_admin() {
    let app = spawn_app().await;

    let resp = app
        .anonymous()
        .post(app.url("/api/drivers"))
        .json(&driver_body("Sebastian Vettel"))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::UNAUTHORIZED);

    let fan = app.fan().await;
    for resp in [
        fan.post(app.url("/api/drivers"))
            .json(&driver_body("Sebastian Vettel"))
            .send()
            .await
            .unwrap(),
        fan.put(app.url("/api/drivers/1"))
            .json(&driver_body("Sebastian Vettel"))
            .send()
            .await
            .unwrap(),
        fan.delete(app.url("/api/drivers/1")).send().await.unwrap(),
    ] {
        let (status, message) = error_of(resp).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "Access denied");
    }
}

#[tokio::test]
async fn create_update_show_delete() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let created = post(&admin, &app.url("/api/drivers"), driver_body("Michael Schumacher")).await;
    let id = created["id"].as_i64().unwrap();
    assert!(created["message"].is_string());

    let resp = admin
        .put(app.url(&format!("/api/drivers/{id}")))
        .json(&json!({
            "full_name": "Michael Schumacher",
            "nationality": "German",
            "license_number": "DE-0001",
            "is_active": "0"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let driver: Value = admin
        .get(app.url(&format!("/api/drivers/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(driver["license_number"], "DE-0001");
    assert_eq!(driver["is_active"], false);

    let resp = admin
        .delete(app.url(&format!("/api/drivers/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    for _ in 0..2 {
        let resp = admin
            .delete(app.url(&format!("/api/drivers/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(error_of(resp).await.0, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn update_of_missing_driver_is_not_found() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let resp = admin
        .put(app.url("/api/drivers/999"))
        .json(&driver_body("Ralf Schumacher"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(resp).await,
        (StatusCode::NOT_FOUND, "Driver not found".to_string())
    );
}

#[tokio::test]
async fn invalid_driver_lists_every_problem() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let resp = admin
        .post(app.url("/api/drivers"))
        .json(&json!({
            "full_name": "Al",
            "nationality": "X",
            "license_number": "de-12345",
            "is_active": 2
        }))
        .send()
        .await
        .unwrap();

    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message.lines().count(), 4, "{message}");

    let resp = admin
        .post(app.url("/api/drivers"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message.lines().count(), 1, "{message}");
}

#[tokio::test]
async fn pagination_metadata() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    for name in ["Ana", "Ben", "Cid", "Dan", "Eve", "Fay", "Gus"] {
        app.create_driver(&admin, &format!("{name} Racer")).await;
    }

    let page: Value = admin
        .get(app.url("/api/drivers?page=2&limit=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        page["pagination"],
        json!({ "current_page": 2, "per_page": 3, "total_items": 7, "total_pages": 3 })
    );
    let names: Vec<&str> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dan Racer", "Eve Racer", "Fay Racer"]);

    let beyond: Value = admin
        .get(app.url("/api/drivers?page=9&limit=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(beyond["data"], json!([]));
    assert_eq!(beyond["pagination"]["total_pages"], 3);

    let defaults: Value = admin
        .get(app.url("/api/drivers?page=abc&limit=-4"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(defaults["pagination"]["current_page"], 1);
    assert_eq!(defaults["pagination"]["per_page"], 10);

    let all: Value = admin
        .get(app.url("/api/drivers/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 7);
    assert_eq!(all[0], json!({ "id": all[0]["id"], "full_name": "Ana Racer" }));
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let resp = admin.get(app.url("/api/drivers/abc")).send().await.unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::BAD_REQUEST);
}
