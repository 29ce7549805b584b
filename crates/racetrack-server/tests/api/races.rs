use crate::support::{error_of, spawn_app, spawn_app_with};
use chrono::NaiveDate;
use racetrack_core::validation::RaceInput;
use racetrack_server::ServerConfig;
use racetrack_storage::RaceRepository;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn listings_are_newest_first() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    app.create_race(&admin, "Imola", "2025-05-18").await;
    app.create_race(&admin, "Miami", "2025-05-04").await;
    app.create_race(&admin, "Monaco", "2025-05-25").await;

    let all: Value = admin
        .get(app.url("/api/races/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tracks: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["track_name"].as_str().unwrap())
        .collect();
    assert_eq!(tracks, vec!["Monaco", "Imola", "Miami"]);
    assert_eq!(all[0]["race_date"], "2025-05-25");

    let page: Value = admin
        .get(app.url("/api/races?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["data"][0]["distance_km"], 306.7);
    assert_eq!(page["data"][1]["track_name"], "Imola");
    assert_eq!(page["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn invalid_race_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let resp = admin
        .post(app.url("/api/races"))
        .json(&json!({
            "track_name": "Spa",
            "race_date": "2025-02-30",
            "distance_km": -7,
            "weather_forecast": "Rain"
        }))
        .send()
        .await
        .unwrap();

    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message.lines().count(), 2, "{message}");
}

#[tokio::test]
async fn past_dates_follow_configuration() {
    let body = json!({
        "track_name": "Brands Hatch",
        "race_date": "1986-07-13",
        "distance_km": 316.0,
        "weather_forecast": "Cloudy"
    });

    let lenient = spawn_app().await;
    let admin = lenient.admin().await;
    let resp = admin
        .post(lenient.url("/api/races"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let strict = spawn_app_with(ServerConfig {
        reject_past_race_dates: true,
        ..ServerConfig::default()
    })
    .await;
    let admin = strict.admin().await;
    let resp = admin
        .post(strict.url("/api/races"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.starts_with("Error: "));
}

#[tokio::test]
async fn past_race_stays_editable_when_past_dates_are_rejected() {
    let app = spawn_app_with(ServerConfig {
        reject_past_race_dates: true,
        ..ServerConfig::default()
    })
    .await;
    let id = app
        .state
        .races
        .create(&RaceInput {
            track_name: "Monza".to_string(),
            race_date: NaiveDate::from_ymd_opt(2020, 9, 6).unwrap(),
            distance_km: 306.72,
            weather_forecast: "Sunny".to_string(),
        })
        .await
        .unwrap();
    let admin = app.admin().await;

    let resp = admin
        .put(app.url(&format!("/api/races/{id}")))
        .json(&json!({
            "track_name": "Monza",
            "race_date": "2020-09-06",
            "distance_km": 306.72,
            "weather_forecast": "Overcast"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let race: Value = admin
        .get(app.url(&format!("/api/races/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(race["weather_forecast"], "Overcast");
    assert_eq!(race["race_date"], "2020-09-06");

    let resp = admin
        .post(app.url("/api/races"))
        .json(&json!({
            "track_name": "Monza",
            "race_date": "2020-09-06",
            "distance_km": 306.72,
            "weather_forecast": "Sunny"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn race_with_results_cannot_be_deleted() {
    let app = spawn_app().await;
    let admin = app.admin().await;

    let race_id = app.create_race(&admin, "Silverstone", "2025-07-06").await;
    let driver_id = app.create_driver(&admin, "Lewis Hamilton").await;
    let resp = admin
        .post(app.url("/api/results"))
        .json(&json!({
            "race_id": race_id,
            "driver_id": driver_id,
            "finish_position": 4,
            "car_model": "SF-25"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .delete(app.url(&format!("/api/races/{race_id}")))
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(resp).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(message.contains("1 result"), "{message}");

    let resp = admin
        .delete(app.url(&format!("/api/drivers/{driver_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(error_of(resp).await.0, StatusCode::CONFLICT);

    let resp = admin
        .delete(app.url(&format!("/api/results/{race_id}/{driver_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .delete(app.url(&format!("/api/races/{race_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
