//! Domain logic for weighted decision projects.
//!
//! Everything in this crate is pure: no I/O, no async. The db and api
//! crates feed it rows and turn its results into responses.

pub mod error;
pub mod score_input;
pub mod scoring;
pub mod seeding;
pub mod types;
