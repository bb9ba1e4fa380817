//! Routine service
//!
//! Business rules for routines: case-insensitive name uniqueness on create
//! and rename, partial updates, cascade deletion, pagination and
//! duplication. Not-found travels as `None`; the only error this layer
//! raises itself is the name conflict.

use crate::error::ApiError;
use crate::repositories::{
    CreateRoutine, ExerciseRecord, ExerciseRepository, RoutineRecord, RoutineRepository,
    UpdateRoutine,
};
use routine_manager_shared::types::{CreateRoutineRequest, UpdateRoutineRequest};
use routine_manager_shared::Weekday;
use sqlx::PgPool;
use tracing::info;

/// Routine service for business logic
pub struct RoutineService;

impl RoutineService {
    /// Create a routine, enforcing case-insensitive name uniqueness
    pub async fn create(
        pool: &PgPool,
        req: CreateRoutineRequest,
    ) -> Result<RoutineRecord, ApiError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Routine name is required".to_string()));
        }

        if RoutineRepository::find_by_name(pool, name)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "A routine named '{}' already exists",
                name
            )));
        }

        let routine = RoutineRepository::create(
            pool,
            CreateRoutine {
                name: name.to_string(),
                description: req.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(routine_id = routine.id, "Routine created");
        Ok(routine)
    }

    /// Partially update a routine
    ///
    /// Re-runs the uniqueness check only when the new name is present and
    /// differs from the stored one. Returns None if the routine is absent.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        req: UpdateRoutineRequest,
    ) -> Result<Option<RoutineRecord>, ApiError> {
        let Some(existing) = RoutineRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
        else {
            return Ok(None);
        };

        if let Some(new_name) = req.name.as_deref() {
            if new_name != existing.name
                && RoutineRepository::find_by_name(pool, new_name)
                    .await
                    .map_err(ApiError::Internal)?
                    .is_some()
            {
                return Err(ApiError::Conflict(format!(
                    "A routine named '{}' already exists",
                    new_name
                )));
            }
        }

        let updated = RoutineRepository::update(
            pool,
            id,
            UpdateRoutine {
                name: req.name,
                description: req.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(updated)
    }

    /// Delete a routine and its exercises; None if the ID does not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<RoutineRecord>, ApiError> {
        let deleted = RoutineRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted.is_some() {
            info!(routine_id = id, "Routine deleted with its exercises");
        }
        Ok(deleted)
    }

    /// Routine detail: the routine plus all its exercises
    pub async fn detail(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<(RoutineRecord, Vec<ExerciseRecord>)>, ApiError> {
        let Some(routine) = RoutineRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
        else {
            return Ok(None);
        };

        let exercises = ExerciseRepository::list_by_routine(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(Some((routine, exercises)))
    }

    /// One page of routines plus the total count of the filtered set
    pub async fn list_paginated(
        pool: &PgPool,
        page: u32,
        page_size: u32,
        weekday: Option<Weekday>,
    ) -> Result<(Vec<RoutineRecord>, i64), ApiError> {
        let offset = i64::from(page - 1) * i64::from(page_size);
        let (items, total) = RoutineRepository::list_page(
            pool,
            offset,
            i64::from(page_size),
            weekday.map(|d| d.as_str()),
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok((items, total))
    }

    /// Case-insensitive substring search; a blank term returns every routine
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<RoutineRecord>, ApiError> {
        RoutineRepository::search_by_name(pool, term)
            .await
            .map_err(ApiError::Internal)
    }

    /// Deep-copy a routine under a fresh "(Copia N)" name
    pub async fn duplicate(pool: &PgPool, id: i64) -> Result<Option<RoutineRecord>, ApiError> {
        let copy = RoutineRepository::duplicate(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        if let Some(copy) = &copy {
            info!(source_id = id, copy_id = copy.id, name = %copy.name, "Routine duplicated");
        }
        Ok(copy)
    }
}
