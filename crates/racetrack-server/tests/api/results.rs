use crate::support::{error_of, post, spawn_app};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn duplicate_result_is_conflict() {
    let app = spawn_app().await;
    let admin = app.admin().await;
    let race_id = app.create_race(&admin, "Hungaroring", "2025-08-03").await;
    let driver_id = app.create_driver(&admin, "Lando Norris").await;

    let body = json!({
        "race_id": race_id,
        "driver_id": driver_id,
        "finish_position": 1,
        "car_model": "MCL39"
    });

    let first = post(&admin, &app.url("/api/results"), body.clone()).await;
    assert_eq!(first["success"], true);

    let resp = admin
        .post(app.url("/api/results"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_race_is_reported_before_driver() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let resp = admin
        .post(app.url("/api/results"))
        .json(&json!({
            "race_id": 41,
            "driver_id": 42,
            "finish_position": null,
            "car_model": "RB21"
        }))
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("Race with ID 41"), "{message}");
    assert!(!message.contains("42"), "{message}");

    let race_id = app.create_race(&admin, "Zandvoort", "2025-08-31").await;
    let resp = admin
        .post(app.url("/api/results"))
        .json(&json!({
            "race_id": race_id,
            "driver_id": 42,
            "car_model": "RB21"
        }))
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("Driver with ID 42"), "{message}");
}

#[tokio::test]
async fn listing_is_public_and_orders_dnf_last() {
    let app = spawn_app().await;
    let admin = app.admin().await;
    let race_id = app.create_race(&admin, "Singapore", "2025-10-05").await;
    let winner = app.create_driver(&admin, "George Russell").await;
    let retired = app.create_driver(&admin, "Isack Hadjar").await;

    post(
        &admin,
        &app.url("/api/results"),
        json!({ "race_id": race_id, "driver_id": retired, "finish_position": "", "car_model": "VCARB02" }),
    )
    .await;
    post(
        &admin,
        &app.url("/api/results"),
        json!({ "race_id": race_id.to_string(), "driver_id": winner.to_string(), "finish_position": "1", "car_model": "W16" }),
    )
    .await;

    let page: Value = app
        .anonymous()
        .get(app.url("/api/results"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["pagination"]["total_items"], 2);
    let rows = page["data"].as_array().unwrap();
    assert_eq!(rows[0]["full_name"], "George Russell");
    assert_eq!(rows[0]["finish_position"], 1);
    assert_eq!(rows[0]["track_name"], "Singapore");
    assert_eq!(rows[0]["race_date"], "2025-10-05");
    assert_eq!(rows[1]["full_name"], "Isack Hadjar");
    assert_eq!(rows[1]["finish_position"], Value::Null);
}

#[tokio::test]
async fn update_and_delete_by_composite_key() {
    let app = spawn_app().await;
    let admin = app.admin().await;
    let race_id = app.create_race(&admin, "Las Vegas", "2025-11-22").await;
    let driver_id = app.create_driver(&admin, "Charles Leclerc").await;
    post(
        &admin,
        &app.url("/api/results"),
        json!({ "race_id": race_id, "driver_id": driver_id, "finish_position": 4, "car_model": "SF-25" }),
    )
    .await;

    let path = format!("/api/results/{race_id}/{driver_id}");
    let resp = admin
        .put(app.url(&path))
        .json(&json!({ "finish_position": null, "car_model": "SF-25B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let result: Value = admin
        .get(app.url(&path))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result["finish_position"], Value::Null);
    assert_eq!(result["car_model"], "SF-25B");

    let resp = admin
        .put(app.url(&format!("/api/results/{race_id}/9999")))
        .json(&json!({ "finish_position": 2, "car_model": "SF-25" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::NOT_FOUND);

    let resp = admin.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = admin.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(
        error_of(resp).await,
        (StatusCode::NOT_FOUND, "Result not found".to_string())
    );
}

#[tokio::test]
async fn result_writes_need_admin() {
    let app = spawn_app().await;
    let fan = app.fan().await;

    let resp = fan
        .post(app.url("/api/results"))
        .json(&json!({ "race_id": 1, "driver_id": 1, "car_model": "F40" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::FORBIDDEN);

    let resp = app
        .anonymous()
        .delete(app.url("/api/results/1/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::UNAUTHORIZED);
}
