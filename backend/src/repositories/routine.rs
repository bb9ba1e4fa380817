//! Routine repository for database operations
//!
//! Owns every multi-statement transaction that touches routines: cascade
//! deletion and deep duplication. Name uniqueness is case-insensitive
//! throughout (`LOWER(name)`), backed by a unique index on the same
//! expression.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

/// Routine record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a routine
#[derive(Debug, Clone)]
pub struct CreateRoutine {
    pub name: String,
    pub description: Option<String>,
}

/// Input for a partial routine update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateRoutine {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Routine repository
pub struct RoutineRepository;

impl RoutineRepository {
    /// Create a new routine
    pub async fn create(pool: &PgPool, input: CreateRoutine) -> Result<RoutineRecord> {
        let record = sqlx::query_as::<_, RoutineRecord>(
            r#"
            INSERT INTO routines (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get routine by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<RoutineRecord>> {
        let record = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Case-insensitive exact lookup by name
    ///
    /// Matches at most one row by construction of the uniqueness invariant.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<RoutineRecord>> {
        let record = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Case-insensitive substring search; a blank term matches all routines
    pub async fn search_by_name(pool: &PgPool, term: &str) -> Result<Vec<RoutineRecord>> {
        if term.trim().is_empty() {
            return Self::list_all(pool).await;
        }

        let records = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            WHERE LOWER(name) LIKE LOWER($1)
            ORDER BY id
            "#,
        )
        .bind(format!("%{}%", term))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// List every routine, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<RoutineRecord>> {
        let records = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get a page of routines plus the total count of the filtered set
    ///
    /// When `weekday` is given, the set is restricted to routines owning at
    /// least one exercise on that day. The count is taken before applying
    /// offset/limit.
    pub async fn list_page(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        weekday: Option<&str>,
    ) -> Result<(Vec<RoutineRecord>, i64)> {
        match weekday {
            Some(day) => {
                let count_row: (i64,) = sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM routines
                    WHERE id IN (SELECT DISTINCT routine_id FROM exercises WHERE weekday = $1)
                    "#,
                )
                .bind(day)
                .fetch_one(pool)
                .await?;

                let records = sqlx::query_as::<_, RoutineRecord>(
                    r#"
                    SELECT id, name, description, created_at
                    FROM routines
                    WHERE id IN (SELECT DISTINCT routine_id FROM exercises WHERE weekday = $1)
                    ORDER BY id
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(day)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

                Ok((records, count_row.0))
            }
            None => {
                let count_row: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM routines"#)
                    .fetch_one(pool)
                    .await?;

                let records = sqlx::query_as::<_, RoutineRecord>(
                    r#"
                    SELECT id, name, description, created_at
                    FROM routines
                    ORDER BY id
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

                Ok((records, count_row.0))
            }
        }
    }

    /// Partial update; fields left at `None` keep their stored value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        updates: UpdateRoutine,
    ) -> Result<Option<RoutineRecord>> {
        let record = sqlx::query_as::<_, RoutineRecord>(
            r#"
            UPDATE routines SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(updates.name)
        .bind(updates.description)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a routine and all its exercises in one transaction
    ///
    /// Returns the deleted routine's last-known state, or None if the ID
    /// does not exist (no side effect in that case).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<RoutineRecord>> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        sqlx::query(r#"DELETE FROM exercises WHERE routine_id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM routines WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(record))
    }

    /// Deep-copy a routine and all its exercises in one transaction
    ///
    /// The copy gets a fresh id and creation timestamp, a name generated as
    /// "{original} (Copia N)" with N incremented past any existing copies,
    /// and one new exercise row per original bound to the new routine id.
    /// Returns None if the source routine does not exist.
    pub async fn duplicate(pool: &PgPool, id: i64) -> Result<Option<RoutineRecord>> {
        let mut tx = pool.begin().await?;

        let original = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, name, description, created_at
            FROM routines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(original) = original else {
            return Ok(None);
        };

        let mut copy_count: u32 = 1;
        let mut new_name = copy_name(&original.name, copy_count);
        while name_taken(&mut *tx, &new_name).await? {
            copy_count += 1;
            new_name = copy_name(&original.name, copy_count);
        }

        let copy = sqlx::query_as::<_, RoutineRecord>(
            r#"
            INSERT INTO routines (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&new_name)
        .bind(&original.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO exercises (routine_id, name, weekday, sets, reps, sort_order, weight_kg, notes)
            SELECT $2, name, weekday, sets, reps, sort_order, weight_kg, notes
            FROM exercises
            WHERE routine_id = $1
            ORDER BY id
            "#,
        )
        .bind(original.id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(copy))
    }
}

/// Candidate name for the Nth copy of a routine
pub fn copy_name(original: &str, n: u32) -> String {
    format!("{} (Copia {})", original, n)
}

/// Case-insensitive existence check, usable inside a transaction
async fn name_taken<'e, E>(executor: E, name: &str) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(SELECT 1 FROM routines WHERE LOWER(name) = LOWER($1))"#,
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
