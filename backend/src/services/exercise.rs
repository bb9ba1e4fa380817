//! Exercise service
//!
//! Validates exercise inputs and drives the repository's ordering engine.
//! Routine existence is the route layer's responsibility; this service
//! assumes the foreign key is valid.

use crate::error::ApiError;
use crate::repositories::{CreateExercise, ExerciseRecord, ExerciseRepository, UpdateExercise};
use routine_manager_shared::types::{CreateExerciseRequest, UpdateExerciseRequest};
use sqlx::PgPool;

/// Exercise service for business logic
pub struct ExerciseService;

impl ExerciseService {
    /// Add a single exercise to a routine
    pub async fn add_to_routine(
        pool: &PgPool,
        routine_id: i64,
        req: CreateExerciseRequest,
    ) -> Result<ExerciseRecord, ApiError> {
        validate(&req)?;

        ExerciseRepository::create(pool, routine_id, to_create_input(req))
            .await
            .map_err(ApiError::Internal)
    }

    /// Add a batch of exercises to a routine as one transaction
    pub async fn add_batch_to_routine(
        pool: &PgPool,
        routine_id: i64,
        reqs: Vec<CreateExerciseRequest>,
    ) -> Result<Vec<ExerciseRecord>, ApiError> {
        for req in &reqs {
            validate(req)?;
        }

        let inputs = reqs.into_iter().map(to_create_input).collect();
        ExerciseRepository::create_batch(pool, routine_id, inputs)
            .await
            .map_err(ApiError::Internal)
    }

    /// Partially update an exercise; the owning routine is immutable here.
    /// Returns None if the exercise is absent.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        req: UpdateExerciseRequest,
    ) -> Result<Option<ExerciseRecord>, ApiError> {
        if matches!(req.sets, Some(sets) if sets < 1) {
            return Err(ApiError::Validation("Sets must be at least 1".to_string()));
        }
        if matches!(req.reps, Some(reps) if reps < 1) {
            return Err(ApiError::Validation("Reps must be at least 1".to_string()));
        }
        if matches!(req.sort_order, Some(order) if order < 0) {
            return Err(ApiError::Validation(
                "Sort order must not be negative".to_string(),
            ));
        }

        ExerciseRepository::update(
            pool,
            id,
            UpdateExercise {
                name: req.name,
                weekday: req.weekday.map(|d| d.as_str().to_string()),
                sets: req.sets,
                reps: req.reps,
                sort_order: req.sort_order,
                weight_kg: req.weight_kg,
                notes: req.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)
    }

    /// Delete an exercise, returning its prior state; None if absent
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<ExerciseRecord>, ApiError> {
        ExerciseRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)
    }
}

fn validate(req: &CreateExerciseRequest) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Exercise name is required".to_string()));
    }
    if req.sets < 1 {
        return Err(ApiError::Validation("Sets must be at least 1".to_string()));
    }
    if req.reps < 1 {
        return Err(ApiError::Validation("Reps must be at least 1".to_string()));
    }
    // 0 is the "assign automatically" sentinel
    if req.sort_order < 0 {
        return Err(ApiError::Validation(
            "Sort order must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn to_create_input(req: CreateExerciseRequest) -> CreateExercise {
    CreateExercise {
        name: req.name,
        weekday: req.weekday.as_str().to_string(),
        sets: req.sets,
        reps: req.reps,
        sort_order: req.sort_order,
        weight_kg: req.weight_kg,
        notes: req.notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routine_manager_shared::Weekday;

    fn request() -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: "Sentadilla".to_string(),
            weekday: Weekday::Lunes,
            sets: 4,
            reps: 8,
            sort_order: 0,
            weight_kg: Some(80.0),
            notes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = CreateExerciseRequest {
            name: "   ".to_string(),
            ..request()
        };
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_non_positive_sets_and_reps_rejected() {
        assert!(validate(&CreateExerciseRequest { sets: 0, ..request() }).is_err());
        assert!(validate(&CreateExerciseRequest { reps: -1, ..request() }).is_err());
    }

    #[test]
    fn test_sentinel_sort_order_allowed() {
        assert!(validate(&CreateExerciseRequest { sort_order: 0, ..request() }).is_ok());
        assert!(validate(&CreateExerciseRequest { sort_order: -1, ..request() }).is_err());
    }

    #[test]
    fn test_weekday_maps_to_canonical_label() {
        let input = to_create_input(CreateExerciseRequest {
            weekday: Weekday::Miercoles,
            ..request()
        });
        assert_eq!(input.weekday, "Miercoles");
    }
}
