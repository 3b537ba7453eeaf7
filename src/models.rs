use serde::{Deserialize, Serialize};

/// Ollama generate API request body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

/// Generation parameters forwarded to the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

/// Ollama generate API response body.
///
/// `response` defaults to empty when the field is missing so that a
/// malformed payload classifies the same way as an empty completion.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}
