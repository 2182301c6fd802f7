//! Shared query parameter types for API handlers.

use serde::Deserialize;
use tradeoff_core::error::CoreError;
use tradeoff_core::types::DbId;

/// `?projectId=` filter used by the criteria and choices list endpoints.
#[derive(Debug, Deserialize)]
pub struct ProjectIdParams {
    #[serde(rename = "projectId")]
    pub project_id: Option<DbId>,
}

impl ProjectIdParams {
    /// The project id, or a validation error if the parameter is absent.
    pub fn require(&self) -> Result<DbId, CoreError> {
        self.project_id.ok_or_else(|| {
            CoreError::Validation("Project ID is required in query parameters".into())
        })
    }
}
