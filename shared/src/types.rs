//! API request and response types
//!
//! Stored records live in the backend repositories; everything here is an
//! explicit projection built by field-mapping at the route layer.

use crate::weekday::Weekday;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for routine listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Maximum page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Routines
// ============================================================================

/// Request body for creating a routine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoutineRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a routine; omitted fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoutineRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Routine summary as returned by list/search/create/update endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Routine detail: the summary plus every owned exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineDetailResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseResponse>,
}

// ============================================================================
// Exercises
// ============================================================================

/// Request body for adding an exercise to a routine
///
/// A `sort_order` of 0 (the default) means "assign the next free position
/// within this routine and weekday automatically".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub weekday: Weekday,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub sort_order: i32,
    /// Weight in kilograms; absent for bodyweight exercises
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for updating an exercise; omitted fields are left untouched.
/// The owning routine cannot be changed through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExerciseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weekday: Option<Weekday>,
    #[serde(default)]
    pub sets: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Exercise as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: i64,
    pub routine_id: i64,
    pub name: String,
    pub weekday: Weekday,
    pub sets: i32,
    pub reps: i32,
    pub sort_order: i32,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

// ============================================================================
// Listing, search and pagination
// ============================================================================

/// Query parameters for the paginated routine listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Restrict to routines with at least one exercise on this weekday
    #[serde(default)]
    pub weekday: Option<Weekday>,
}

impl RoutineListQuery {
    /// Normalize pagination parameters: page is 1-indexed and at least 1,
    /// page size is clamped to [1, MAX_PAGE_SIZE]
    pub fn normalize(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }
}

/// Query parameters for routine search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineSearchQuery {
    /// Substring to match against routine names; blank matches everything
    #[serde(default)]
    pub name: Option<String>,
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Build a page envelope, deriving `total_pages` by ceiling division
    pub fn new(items: Vec<T>, total_items: i64, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total_items,
            page,
            page_size,
            total_pages: total_pages(total_items, page_size),
        }
    }
}

/// Integer ceiling division of a row count by a page size
pub fn total_pages(total_items: i64, page_size: u32) -> u32 {
    if total_items <= 0 {
        return 0;
    }
    ((total_items as u64).div_ceil(page_size as u64)) as u32
}

// ============================================================================
// Authentication
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User profile, excluding credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_defaults() {
        let query = RoutineListQuery::default();
        assert_eq!(query.normalize(), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let query = RoutineListQuery {
            page: Some(0),
            page_size: Some(1000),
            weekday: None,
        };
        assert_eq!(query.normalize(), (1, MAX_PAGE_SIZE));

        let query = RoutineListQuery {
            page: Some(3),
            page_size: Some(0),
            weekday: None,
        };
        assert_eq!(query.normalize(), (3, 1));
    }

    #[test]
    fn test_total_pages_exact_and_partial() {
        // 25 routines at 10 per page: 10 + 10 + 5
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(31, 10), 4);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 100), 1);
    }

    proptest! {
        /// Ceiling division: the pages always hold every item, and dropping
        /// the last page would lose some
        #[test]
        fn prop_total_pages_is_ceiling(total in 0i64..1_000_000, page_size in 1u32..=MAX_PAGE_SIZE) {
            let pages = total_pages(total, page_size) as i64;
            let page_size = page_size as i64;
            prop_assert!(pages * page_size >= total);
            if total > 0 {
                prop_assert!((pages - 1) * page_size < total);
            } else {
                prop_assert_eq!(pages, 0);
            }
        }

        /// Normalized parameters are always within bounds
        #[test]
        fn prop_normalize_in_bounds(page in prop::option::of(0u32..10_000), size in prop::option::of(0u32..10_000)) {
            let query = RoutineListQuery { page, page_size: size, weekday: None };
            let (page, page_size) = query.normalize();
            prop_assert!(page >= 1);
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&page_size));
        }
    }
}
