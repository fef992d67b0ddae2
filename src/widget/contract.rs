use serde::{Deserialize, Serialize};

use super::indicator::IndicatorStatus;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub student_answer: String,
    /// peer-response opt-in, always sent so the server never has to guess
    pub can_record_response: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub student_answer: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct HintRequest {}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub used_attempts_feedback: String,
    pub problem_progress: String,
    pub submitted_message: String,
    pub user_alert: String,

    /// authoritative grading status, a missing value fails decoding
    pub indicator_class: IndicatorStatus,

    /// hide-controls marker, empty while further attempts are allowed
    #[serde(default)]
    pub nodisplay_class: String,

    // older servers omit the peer fields entirely
    #[serde(default)]
    pub display_other_responses: bool,
    #[serde(default)]
    pub other_responses: Vec<PeerAnswer>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SaveResponse {
    pub used_attempts_feedback: String,
    pub problem_progress: String,
    #[serde(default)]
    pub submitted_message: String,
    #[serde(default)]
    pub user_alert: String,
    #[serde(default)]
    pub nodisplay_class: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HintResponse {
    pub hint_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PeerAnswer {
    pub answer: String,
}

/// Last known display state of one widget instance.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    pub answer_text: String,
    pub problem_progress: String,
    pub used_attempts_feedback: String,
}
