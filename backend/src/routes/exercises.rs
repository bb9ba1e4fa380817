//! Exercise API routes
//!
//! Update and delete for individual exercises; creation goes through the
//! routine routes so the owning routine can be checked first.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::ExerciseRecord;
use crate::services::ExerciseService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use routine_manager_shared::types::{ExerciseResponse, UpdateExerciseRequest};
use routine_manager_shared::Weekday;

/// Create exercise routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new().route("/:id", put(update_exercise).delete(delete_exercise))
}

/// Map a stored exercise to its API shape
///
/// The stored weekday label is parsed back into the closed enum; a label
/// outside the seven days means corrupted data and surfaces as an internal
/// error.
pub(super) fn exercise_response(record: ExerciseRecord) -> ApiResult<ExerciseResponse> {
    let weekday = record
        .weekday
        .parse::<Weekday>()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;

    Ok(ExerciseResponse {
        id: record.id,
        routine_id: record.routine_id,
        name: record.name,
        weekday,
        sets: record.sets,
        reps: record.reps,
        sort_order: record.sort_order,
        weight_kg: record.weight_kg,
        notes: record.notes,
    })
}

/// PUT /api/v1/exercises/:id - Partially update an exercise
///
/// Every field except the owning routine can change.
async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
    Json(req): Json<UpdateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    let exercise = ExerciseService::update(state.db(), id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Exercise {} not found", id)))?;

    Ok(Json(exercise_response(exercise)?))
}

/// DELETE /api/v1/exercises/:id - Delete an exercise
///
/// Returns the deleted exercise's prior state for confirmation.
async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
) -> ApiResult<Json<ExerciseResponse>> {
    let exercise = ExerciseService::delete(state.db(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Exercise {} not found", id)))?;

    Ok(Json(exercise_response(exercise)?))
}
