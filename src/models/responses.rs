use serde::Serialize;

/// JSON body for every non-2xx proxy response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
        }
    }
}
