use super::{Created, Done, JsonBody, PageQuery, PathParams};
use crate::error::{ApiError, ApiResult};
use crate::session::{AdminUser, CurrentUser};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use racetrack_core::Page;
use racetrack_core::validation::{DatePolicy, RaceForm};
use racetrack_storage::{Race, RaceRepository, RaceSummary, ResultRepository};
use tracing::info;

/// # GET /api/races?page&limit
pub async fn list(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Race>>> {
    let page = query.request();
    let (races, total) = tokio::try_join!(state.races.find_page(page), state.races.count())?;
    Ok(Json(Page::new(races, page, total)))
}

/// # GET /api/races/all
pub async fn all(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RaceSummary>>> {
    Ok(Json(state.races.find_all().await?))
}

/// # GET /api/races/:id
pub async fn show(
    _user: CurrentUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Json<Race>> {
    state
        .races
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Race not found".to_string()))
}

/// # POST /api/races
pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RaceForm>,
) -> ApiResult<Json<Created>> {
    let race = form.validate(state.date_policy())?;
    let id = state.races.create(&race).await?;

    info!(race_id = id, admin = %admin.username, "Race created");
    Ok(Json(Created::new(id, "Race added")))
}

/// # PUT /api/races/:id
///
/// The past-date rule only guards creation, so a race that has already
/// been run can still be corrected.
pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(form): JsonBody<RaceForm>,
) -> ApiResult<Json<Done>> {
    let race = form.validate(DatePolicy::AnyDate)?;
    if state.races.update(id, &race).await? == 0 {
        return Err(ApiError::NotFound("Race not found".to_string()));
    }

    info!(race_id = id, admin = %admin.username, "Race updated");
    Ok(Json(Done::new("Race updated")))
}

/// # DELETE /api/races/:id
///
/// Refused with 409 while results still reference the race.
pub async fn remove(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Json<Done>> {
    let dependents = state.results.count_for_race(id).await?;
    if dependents > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete race {id}: {dependents} result(s) still reference it"
        )));
    }

    if state.races.delete(id).await? == 0 {
        return Err(ApiError::NotFound("Race not found".to_string()));
    }

    info!(race_id = id, admin = %admin.username, "Race deleted");
    Ok(Json(Done::new("Race deleted")))
}
