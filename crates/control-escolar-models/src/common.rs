use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?id=` query parameter used by the single-resource endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: i64,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub details: String,
}

impl DeletedResponse {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}
