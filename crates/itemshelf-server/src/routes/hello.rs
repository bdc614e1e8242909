//! Root greeting endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of responses that only carry a message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, world!".to_string(),
    })
}
