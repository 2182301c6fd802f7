//! Choice entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradeoff_core::scoring::Scorable;
use tradeoff_core::types::{DbId, Timestamp, UserId};
use validator::Validate;

/// A choice row from the `choices` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Choice {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub disqualified: bool,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scorable for Choice {
    fn id(&self) -> DbId {
        self.id
    }

    fn is_disqualified(&self) -> bool {
        self.disqualified
    }
}

/// One choice inside a bulk create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewChoice {
    #[validate(length(min = 1, message = "Choice description is required"))]
    pub description: String,
    /// Defaults to `false` if omitted.
    pub disqualified: Option<bool>,
}

/// Bulk create body: `{ "project_id": .., "choices": [..] }`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChoices {
    pub project_id: DbId,
    #[validate(nested)]
    pub choices: Vec<NewChoice>,
}

/// DTO for updating an existing choice. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChoice {
    #[validate(length(min = 1, message = "Choice description must not be empty"))]
    pub description: Option<String>,
    pub disqualified: Option<bool>,
}
