//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::exercise::FrameResponse;
use crate::models::pose::Keypoint;

/// One frame to analyze.
///
/// `landmarks` is `null` or absent when the estimator found no pose.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    pub exercise: String,
    #[serde(default)]
    pub landmarks: Option<Vec<Keypoint>>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyzeResponse {
    pub reps: u32,
    pub feedback: String,
    pub session_id: String,
}

impl AnalyzeResponse {
    pub fn new(response: FrameResponse, session_id: String) -> Self {
        Self {
            reps: response.reps,
            feedback: response.feedback,
            session_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}
