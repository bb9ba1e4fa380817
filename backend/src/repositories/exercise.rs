//! Exercise repository for database operations
//!
//! Holds the ordering engine: an exercise inserted with `sort_order == 0`
//! gets `MAX(sort_order) + 1` over its (routine, weekday) pair. Batch
//! insertion resolves orders against a batch-local running counter seeded
//! once per weekday from the stored maximum, inside the batch transaction,
//! so two unordered items on the same weekday get consecutive orders.

use anyhow::Result;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use std::collections::HashMap;

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub routine_id: i64,
    pub name: String,
    pub weekday: String,
    pub sets: i32,
    pub reps: i32,
    pub sort_order: i32,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Input for creating an exercise
///
/// A `sort_order` of 0 means "assign automatically".
#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub name: String,
    pub weekday: String,
    pub sets: i32,
    pub reps: i32,
    pub sort_order: i32,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Input for a partial exercise update; `None` fields are left untouched.
/// The owning routine is immutable through this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub weekday: Option<String>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub sort_order: Option<i32>,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Add an exercise to a routine, resolving the automatic order
    ///
    /// The caller is responsible for checking that the routine exists; an
    /// invalid id fails at the foreign key.
    pub async fn create(
        pool: &PgPool,
        routine_id: i64,
        input: CreateExercise,
    ) -> Result<ExerciseRecord> {
        let mut tx = pool.begin().await?;

        let sort_order = if input.sort_order == 0 {
            max_sort_order(&mut *tx, routine_id, &input.weekday).await? + 1
        } else {
            input.sort_order
        };

        let record = insert(&mut tx, routine_id, &input, sort_order).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Add a batch of exercises to a routine in a single transaction
    ///
    /// Orders are assigned with a per-weekday running counter seeded from
    /// the committed maximum, so unordered items within the batch get
    /// monotonically increasing orders. Nothing is persisted if any insert
    /// fails.
    pub async fn create_batch(
        pool: &PgPool,
        routine_id: i64,
        inputs: Vec<CreateExercise>,
    ) -> Result<Vec<ExerciseRecord>> {
        let mut tx = pool.begin().await?;
        let mut next_order: HashMap<String, i32> = HashMap::new();
        let mut records = Vec::with_capacity(inputs.len());

        for input in &inputs {
            let sort_order = if input.sort_order == 0 {
                let counter = match next_order.get(&input.weekday) {
                    Some(last) => last + 1,
                    None => max_sort_order(&mut *tx, routine_id, &input.weekday).await? + 1,
                };
                next_order.insert(input.weekday.clone(), counter);
                counter
            } else {
                input.sort_order
            };

            records.push(insert(&mut tx, routine_id, input, sort_order).await?);
        }

        tx.commit().await?;

        Ok(records)
    }

    /// Get exercise by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get every exercise of a routine, in insertion order
    pub async fn list_by_routine(pool: &PgPool, routine_id: i64) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes
            FROM exercises
            WHERE routine_id = $1
            ORDER BY id
            "#,
        )
        .bind(routine_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Partial update; fields left at `None` keep their stored value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        updates: UpdateExercise,
    ) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            UPDATE exercises SET
                name = COALESCE($2, name),
                weekday = COALESCE($3, weekday),
                sets = COALESCE($4, sets),
                reps = COALESCE($5, reps),
                sort_order = COALESCE($6, sort_order),
                weight_kg = COALESCE($7, weight_kg),
                notes = COALESCE($8, notes)
            WHERE id = $1
            RETURNING id, routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes
            "#,
        )
        .bind(id)
        .bind(updates.name)
        .bind(updates.weekday)
        .bind(updates.sets)
        .bind(updates.reps)
        .bind(updates.sort_order)
        .bind(updates.weight_kg)
        .bind(updates.notes)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete an exercise, returning its prior state (None if absent)
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            DELETE FROM exercises
            WHERE id = $1
            RETURNING id, routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

/// Highest assigned order within a (routine, weekday) pair, 0 when empty
async fn max_sort_order<'e, E>(executor: E, routine_id: i64, weekday: &str) -> Result<i32>
where
    E: PgExecutor<'e>,
{
    let max = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT COALESCE(MAX(sort_order), 0)
        FROM exercises
        WHERE routine_id = $1 AND weekday = $2
        "#,
    )
    .bind(routine_id)
    .bind(weekday)
    .fetch_one(executor)
    .await?;

    Ok(max)
}

async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    routine_id: i64,
    input: &CreateExercise,
    sort_order: i32,
) -> Result<ExerciseRecord> {
    let record = sqlx::query_as::<_, ExerciseRecord>(
        r#"
        INSERT INTO exercises (routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes
        "#,
    )
    .bind(routine_id)
    .bind(&input.name)
    .bind(&input.weekday)
    .bind(input.sets)
    .bind(input.reps)
    .bind(sort_order)
    .bind(input.weight_kg)
    .bind(&input.notes)
    .fetch_one(&mut **tx)
    .await?;

    Ok(record)
}
