//! Database repositories
//!
//! Provides the data access layer. Records are the canonical stored shapes;
//! the API-facing projections live in the shared crate.

pub mod exercise;
pub mod routine;
pub mod user;

pub use exercise::{CreateExercise, ExerciseRecord, ExerciseRepository, UpdateExercise};
pub use routine::{CreateRoutine, RoutineRecord, RoutineRepository, UpdateRoutine};
pub use user::{UserRecord, UserRepository};
