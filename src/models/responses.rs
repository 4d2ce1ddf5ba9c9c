use crate::models::domain::{ProfileField, ScoredVehicle, UserProfile};
use serde::{Deserialize, Serialize};

/// What happened to a submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    /// Stored and locked; the next question follows.
    Advanced,
    /// Unusable input; the same question is re-asked.
    Rejected,
    /// The message re-opened a field instead of answering one.
    Unlocked,
    /// Every field was already locked.
    Complete,
}

/// Response for session creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreatedResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub field: Option<ProfileField>,
    pub question: Option<String>,
}

/// Response for the answer endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub status: AnswerStatus,
    /// The field the answer was stored against (or re-opened).
    pub field: Option<ProfileField>,
    /// The question to ask next, if collection continues.
    pub question: Option<String>,
    pub complete: bool,
    #[serde(rename = "lockedFields")]
    pub locked_fields: usize,
    /// Running shortlist preview recomputed after the turn.
    pub shortlist: Vec<ScoredVehicle>,
}

/// Response for the unlock endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub changed: bool,
    pub field: ProfileField,
    pub question: Option<String>,
}

/// Response for the profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    #[serde(rename = "lockedFields")]
    pub locked_fields: usize,
    pub complete: bool,
    pub question: Option<String>,
}

/// Response for the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<ScoredVehicle>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    /// Present only when an explanation was requested.
    pub explanation: Option<String>,
}

/// Response for the brand filter endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandFilterResponse {
    pub blocked: Vec<String>,
    pub preferred: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "catalogSize")]
    pub catalog_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
