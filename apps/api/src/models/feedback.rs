use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// AI review of one resume. A resume has at most one feedback record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    pub id: Uuid,
    pub resume_id: Uuid,
    /// Per-section suggestions, kept as the model produced them
    /// (`{ "<section>": [...] }` or `{ "<section>": { "suggested_improvements": [...] } }`).
    pub improvements: Value,
    pub missing_keywords: Vec<String>,
    pub insights: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feedback content without identity, as parsed from a model reply or sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackContent {
    pub improvements: Value,
    pub missing_keywords: Vec<String>,
    pub insights: String,
}
