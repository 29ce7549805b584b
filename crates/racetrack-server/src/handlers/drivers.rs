use super::{Created, Done, JsonBody, PageQuery, PathParams};
use crate::error::{ApiError, ApiResult};
use crate::session::{AdminUser, CurrentUser};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use racetrack_core::Page;
use racetrack_core::validation::DriverForm;
use racetrack_storage::{Driver, DriverRepository, DriverSummary, ResultRepository};
use tracing::info;

/// # GET /api/drivers?page&limit
pub async fn list(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Driver>>> {
    let page = query.request();
    let (drivers, total) =
        tokio::try_join!(state.drivers.find_page(page), state.drivers.count())?;
    Ok(Json(Page::new(drivers, page, total)))
}

/// # GET /api/drivers/all
pub async fn all(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DriverSummary>>> {
    Ok(Json(state.drivers.find_all().await?))
}

/// # GET /api/drivers/:id
pub async fn show(
    _user: CurrentUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Json<Driver>> {
    state
        .drivers
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Driver not found".to_string()))
}

/// # POST /api/drivers
pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(form): JsonBody<DriverForm>,
) -> ApiResult<Json<Created>> {
    let driver = form.validate()?;
    let id = state.drivers.create(&driver).await?;

    info!(driver_id = id, admin = %admin.username, "Driver created");
    Ok(Json(Created::new(id, "Driver added")))
}

/// # PUT /api/drivers/:id
pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(form): JsonBody<DriverForm>,
) -> ApiResult<Json<Done>> {
    let driver = form.validate()?;
    if state.drivers.update(id, &driver).await? == 0 {
        return Err(ApiError::NotFound("Driver not found".to_string()));
    }

    info!(driver_id = id, admin = %admin.username, "Driver updated");
    Ok(Json(Done::new("Driver updated")))
}

/// # DELETE /api/drivers/:id
///
/// Refused with 409 while results still reference the driver.
pub async fn remove(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Json<Done>> {
    let dependents = state.results.count_for_driver(id).await?;
    if dependents > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete driver {id}: {dependents} result(s) still reference it"
        )));
    }

    if state.drivers.delete(id).await? == 0 {
        return Err(ApiError::NotFound("Driver not found".to_string()));
    }

    info!(driver_id = id, admin = %admin.username, "Driver deleted");
    Ok(Json(Done::new("Driver deleted")))
}
