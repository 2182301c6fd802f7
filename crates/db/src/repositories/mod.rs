//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod choice_repo;
pub mod criterion_repo;
pub mod project_repo;
pub mod score_repo;

pub use choice_repo::ChoiceRepo;
pub use criterion_repo::CriterionRepo;
pub use project_repo::ProjectRepo;
pub use score_repo::ScoreRepo;
