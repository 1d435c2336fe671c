//! Responses for the placeholder blog and comment endpoints.

use serde::Serialize;

/// Plain acknowledgement message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Message for publicly readable routes, with the caller's uid when a valid
/// credential was presented.
#[derive(Debug, Serialize)]
pub struct ViewerMessageResponse {
    pub message: String,
    pub viewer: Option<String>,
}
