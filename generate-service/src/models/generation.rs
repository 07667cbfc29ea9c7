use serde::{Deserialize, Serialize};

/// Body of `POST /generate`. The prompt is forwarded to the model unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerateResponse {
    #[serde(rename = "textResponse")]
    pub text_response: String,
}
