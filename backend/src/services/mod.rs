//! Business logic services
//!
//! Services sit between the routes and the repositories: they enforce the
//! uniqueness and validation rules and translate repository errors into API
//! errors.

pub mod exercise;
pub mod routine;
pub mod user;

pub use exercise::ExerciseService;
pub use routine::RoutineService;
pub use user::UserService;
