//! Routine API routes
//!
//! CRUD, search, pagination and duplication for routines, plus the
//! add-exercise endpoints (the routine-existence check for those lives
//! here, not in the exercise service). Reads are public; every write
//! requires a bearer token.

use super::exercises::exercise_response;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::RoutineRecord;
use crate::services::{ExerciseService, RoutineService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use routine_manager_shared::types::{
    CreateExerciseRequest, CreateRoutineRequest, ExerciseResponse, PaginatedResponse,
    RoutineDetailResponse, RoutineListQuery, RoutineResponse, RoutineSearchQuery,
    UpdateRoutineRequest,
};

/// Create routine routes
pub fn routine_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routines).post(create_routine))
        .route("/search", get(search_routines))
        .route(
            "/:id",
            get(get_routine_detail)
                .put(update_routine)
                .delete(delete_routine),
        )
        .route("/:id/duplicate", post(duplicate_routine))
        .route("/:id/exercises", post(add_exercise))
        .route("/:id/exercises/batch", post(add_exercises_batch))
}

/// Map a stored routine to its API summary
fn routine_response(record: RoutineRecord) -> RoutineResponse {
    RoutineResponse {
        id: record.id,
        name: record.name,
        description: record.description,
        created_at: record.created_at,
    }
}

/// GET /api/v1/routines - Paginated routine listing
///
/// Supports page (1-indexed), page_size (clamped to [1, 100]) and an
/// optional weekday filter keeping only routines with at least one
/// exercise on that day.
async fn list_routines(
    State(state): State<AppState>,
    Query(query): Query<RoutineListQuery>,
) -> ApiResult<Json<PaginatedResponse<RoutineResponse>>> {
    let (page, page_size) = query.normalize();

    let (items, total_items) =
        RoutineService::list_paginated(state.db(), page, page_size, query.weekday).await?;

    let items = items.into_iter().map(routine_response).collect();

    Ok(Json(PaginatedResponse::new(items, total_items, page, page_size)))
}

/// GET /api/v1/routines/search?name= - Search routines by name
///
/// Case-insensitive substring match; a blank term returns every routine.
async fn search_routines(
    State(state): State<AppState>,
    Query(query): Query<RoutineSearchQuery>,
) -> ApiResult<Json<Vec<RoutineResponse>>> {
    let term = query.name.unwrap_or_default();
    let routines = RoutineService::search(state.db(), &term).await?;

    Ok(Json(routines.into_iter().map(routine_response).collect()))
}

/// GET /api/v1/routines/:id - Routine detail with its exercises
async fn get_routine_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RoutineDetailResponse>> {
    let (routine, exercises) = RoutineService::detail(state.db(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Routine {} not found", id)))?;

    let exercises = exercises
        .into_iter()
        .map(exercise_response)
        .collect::<ApiResult<Vec<ExerciseResponse>>>()?;

    Ok(Json(RoutineDetailResponse {
        id: routine.id,
        name: routine.name,
        description: routine.description,
        created_at: routine.created_at,
        exercises,
    }))
}

/// POST /api/v1/routines - Create a routine
async fn create_routine(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<CreateRoutineRequest>,
) -> ApiResult<(StatusCode, Json<RoutineResponse>)> {
    let routine = RoutineService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(routine_response(routine))))
}

/// PUT /api/v1/routines/:id - Partially update a routine
async fn update_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
    Json(req): Json<UpdateRoutineRequest>,
) -> ApiResult<Json<RoutineResponse>> {
    let routine = RoutineService::update(state.db(), id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Routine {} not found", id)))?;

    Ok(Json(routine_response(routine)))
}

/// DELETE /api/v1/routines/:id - Delete a routine and its exercises
///
/// Returns the deleted routine's last-known state for confirmation.
async fn delete_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
) -> ApiResult<Json<RoutineResponse>> {
    let routine = RoutineService::delete(state.db(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Routine {} not found", id)))?;

    Ok(Json(routine_response(routine)))
}

/// POST /api/v1/routines/:id/duplicate - Deep-copy a routine
async fn duplicate_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
) -> ApiResult<(StatusCode, Json<RoutineResponse>)> {
    let copy = RoutineService::duplicate(state.db(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Routine {} not found", id)))?;

    Ok((StatusCode::CREATED, Json(routine_response(copy))))
}

/// POST /api/v1/routines/:id/exercises - Add one exercise to a routine
async fn add_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
    Json(req): Json<CreateExerciseRequest>,
) -> ApiResult<(StatusCode, Json<ExerciseResponse>)> {
    ensure_routine_exists(&state, id).await?;

    let exercise = ExerciseService::add_to_routine(state.db(), id, req).await?;
    Ok((StatusCode::CREATED, Json(exercise_response(exercise)?)))
}

/// POST /api/v1/routines/:id/exercises/batch - Add several exercises
///
/// The whole batch commits as one transaction.
async fn add_exercises_batch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
    Json(reqs): Json<Vec<CreateExerciseRequest>>,
) -> ApiResult<Json<Vec<ExerciseResponse>>> {
    ensure_routine_exists(&state, id).await?;

    let exercises = ExerciseService::add_batch_to_routine(state.db(), id, reqs).await?;
    let exercises = exercises
        .into_iter()
        .map(exercise_response)
        .collect::<ApiResult<Vec<ExerciseResponse>>>()?;

    Ok(Json(exercises))
}

/// The exercise endpoints assume a valid routine id; check it here
async fn ensure_routine_exists(state: &AppState, id: i64) -> ApiResult<()> {
    crate::repositories::RoutineRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound(format!("Routine {} not found", id)))?;
    Ok(())
}
