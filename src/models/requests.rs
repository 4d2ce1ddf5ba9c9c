use crate::models::ProfileField;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One free-text answer for the current question
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(max = 2000))]
    pub text: String,
}

/// Request to re-open one answered field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockFieldRequest {
    pub field: ProfileField,
}

/// Request to replace the session's brand sets
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrandFilterRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub blocked: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub preferred: Vec<String>,
}

/// Query parameters for the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesQuery {
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub explain: bool,
}
