use super::{Created, Done, JsonBody, PageQuery, PathParams};
use crate::error::{ApiError, ApiResult};
use crate::session::AdminUser;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use racetrack_core::Page;
use racetrack_core::validation::ResultForm;
use racetrack_storage::{
    DriverRepository, RaceRepository, RaceResult, ResultRepository, ResultRow, StorageError,
};
use serde_json::json;
use tracing::info;

const DUPLICATE_RESULT: &str = "A result for this driver in this race already exists";

/// # GET /api/results?page&limit
///
/// Public leaderboard; no session needed.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ResultRow>>> {
    let page = query.request();
    let (rows, total) = tokio::try_join!(state.results.find_page(page), state.results.count())?;
    Ok(Json(Page::new(rows, page, total)))
}

/// # GET /api/results/:race_id/:driver_id
pub async fn show(
    State(state): State<AppState>,
    PathParams((race_id, driver_id)): PathParams<(i64, i64)>,
) -> ApiResult<Json<RaceResult>> {
    state
        .results
        .find(race_id, driver_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))
}

/// # POST /api/results
///
/// The race is checked before the driver, and the first missing one
/// ends the request.
pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ResultForm>,
) -> ApiResult<Json<Created>> {
    let result = form.validate()?;

    if !state.races.exists_by_id(result.race_id).await? {
        return Err(ApiError::BadRequest(format!(
            "Error: Race with ID {} does not exist",
            result.race_id
        )));
    }
    if !state.drivers.exists_by_id(result.driver_id).await? {
        return Err(ApiError::BadRequest(format!(
            "Error: Driver with ID {} does not exist",
            result.driver_id
        )));
    }
    if state
        .results
        .exists(result.race_id, result.driver_id)
        .await?
    {
        return Err(ApiError::Conflict(DUPLICATE_RESULT.to_string()));
    }

    // The composite key catches a concurrent insert that passed the check.
    let id = state.results.create(&result).await.map_err(|e| match e {
        StorageError::Duplicate(_) => ApiError::Conflict(DUPLICATE_RESULT.to_string()),
        other => ApiError::Storage(other),
    })?;

    info!(
        race_id = result.race_id,
        driver_id = result.driver_id,
        admin = %admin.username,
        "Result recorded"
    );
    Ok(Json(Created::new(id, "Result added")))
}

/// # PUT /api/results/:race_id/:driver_id
///
/// The key comes from the path; ids in the body are ignored.
pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams((race_id, driver_id)): PathParams<(i64, i64)>,
    JsonBody(mut form): JsonBody<ResultForm>,
) -> ApiResult<Json<Done>> {
    form.race_id = json!(race_id);
    form.driver_id = json!(driver_id);
    let result = form.validate()?;

    let updated = state
        .results
        .update(
            race_id,
            driver_id,
            result.finish_position,
            &result.car_model,
        )
        .await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    info!(race_id, driver_id, admin = %admin.username, "Result updated");
    Ok(Json(Done::new("Result updated")))
}

/// # DELETE /api/results/:race_id/:driver_id
pub async fn remove(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams((race_id, driver_id)): PathParams<(i64, i64)>,
) -> ApiResult<Json<Done>> {
    if state.results.delete(race_id, driver_id).await? == 0 {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    info!(race_id, driver_id, admin = %admin.username, "Result deleted");
    Ok(Json(Done::new("Result deleted")))
}
