//! Request-level workflows shared by the handlers.
//!
//! Handlers stay thin: they extract inputs and shape responses, while the
//! functions here enforce ownership, call the store and run the pure
//! aggregation and seeding logic from `tradeoff_core`.

pub mod assembly;
pub mod ownership;
pub mod scores;
pub mod seeding;
