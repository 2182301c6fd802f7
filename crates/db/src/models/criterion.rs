//! Criterion entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradeoff_core::scoring::WeightedCriterion;
use tradeoff_core::types::{DbId, Timestamp, UserId};
use validator::Validate;

/// A criterion row from the `criteria` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Criterion {
    pub id: DbId,
    pub project_id: DbId,
    pub definition: String,
    /// Multiplier applied to every score under this criterion. `NULL` counts
    /// as 0 when totals are computed.
    pub weight: Option<f64>,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Criterion> for WeightedCriterion {
    fn from(criterion: &Criterion) -> Self {
        WeightedCriterion {
            id: criterion.id,
            weight: criterion.weight,
        }
    }
}

/// One criterion inside a bulk create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCriterion {
    #[validate(length(min = 1, message = "Criterion definition is required"))]
    pub definition: String,
    #[validate(range(min = 0.0, message = "Criterion weight must not be negative"))]
    pub weight: Option<f64>,
}

/// Bulk create body: `{ "project_id": .., "criteria": [..] }`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCriteria {
    pub project_id: DbId,
    #[validate(nested)]
    pub criteria: Vec<NewCriterion>,
}

/// DTO for updating an existing criterion. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCriterion {
    #[validate(length(min = 1, message = "Criterion definition must not be empty"))]
    pub definition: Option<String>,
    #[validate(range(min = 0.0, message = "Criterion weight must not be negative"))]
    pub weight: Option<f64>,
}
