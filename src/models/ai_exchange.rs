use serde::{Deserialize, Serialize};

/// Body of `POST /api/ai`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiRequest {
    pub prompt: String,
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiResponse {
    pub response: String,
}

/// Body of an `{"error": ...}` reply from any endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}
