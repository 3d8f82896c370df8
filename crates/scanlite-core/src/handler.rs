//! JSON request dispatch.

use std::sync::Arc;

use tracing::{debug, info};

use scanlite_model::error::DynamoDBError;

use crate::provider::ScanliteProvider;
use crate::validation::validate_request;

/// Entry point that takes an operation name and a JSON body.
#[derive(Debug)]
pub struct ScanliteHandler {
    provider: Arc<ScanliteProvider>,
}

impl ScanliteHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<ScanliteProvider>) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<ScanliteProvider> {
        &self.provider
    }

    /// Validate and run one request, returning the JSON response body.
    ///
    /// # Errors
    ///
    /// Any validation or execution error; render it with
    /// [`DynamoDBError::to_json`].
    pub fn handle_request(
        &self,
        operation_name: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, DynamoDBError> {
        let config = &self.provider.config;
        if config.log_requests {
            info!(operation = operation_name, bytes = body.len(), "dispatching request");
        }

        let request: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            DynamoDBError::serialization_exception(format!(
                "Failed to deserialize request body: {e}"
            ))
        })?;
        let typed = validate_request(operation_name, &request, config)?;
        let output = self.provider.execute(typed)?;

        let json = serde_json::to_vec(&output).map_err(|e| {
            DynamoDBError::internal_error(format!("Failed to serialize response: {e}"))
        })?;
        debug!(operation = operation_name, bytes = json.len(), "request completed");
        Ok(json)
    }
}
