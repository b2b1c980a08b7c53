// Parsing of model-written resume reviews into `FeedbackContent`.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::AppError;
use crate::llm_client::extract_json;
use crate::models::feedback::FeedbackContent;

const NO_INSIGHTS: &str = "No insights available";

const IMPROVEMENT_KEYS: &[&str] = &["improvements", "improved_resume", "improvedResume"];
const KEYWORD_KEYS: &[&str] = &["missing_keywords", "missingKeywords"];
const INSIGHT_KEYS: &[&str] = &["insights", "insight"];

#[derive(Debug, Error)]
pub enum FeedbackParseError {
    #[error("no JSON object found in the model reply")]
    NoJson,

    #[error("feedback JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feedback JSON is missing required properties. Available properties: {0}")]
    MissingProperties(String),
}

impl From<FeedbackParseError> for AppError {
    fn from(err: FeedbackParseError) -> Self {
        AppError::Llm(format!("Unexpected feedback format: {err}"))
    }
}

/// Reads `{ improvements, missing_keywords, insights }` out of a model reply.
///
/// The payload is located with [`extract_json`]. All three
/// properties must be present (camelCase and `improved_resume` spellings are
/// accepted). Missing keywords may be a list or a comma-separated string;
/// null insights become a placeholder.
pub fn parse_feedback(text: &str) -> Result<FeedbackContent, FeedbackParseError> {
    let payload = extract_json(text).ok_or(FeedbackParseError::NoJson)?;
    let Value::Object(map) = serde_json::from_str::<Value>(payload)? else {
        return Err(FeedbackParseError::NoJson);
    };

    let (Some(improvements), Some(keywords), Some(insights)) = (
        lookup(&map, IMPROVEMENT_KEYS),
        lookup(&map, KEYWORD_KEYS),
        lookup(&map, INSIGHT_KEYS),
    ) else {
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        return Err(FeedbackParseError::MissingProperties(keys.join(", ")));
    };

    Ok(FeedbackContent {
        improvements: improvements.clone(),
        missing_keywords: keyword_list(keywords),
        insights: insight_text(insights),
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn keyword_list(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn insight_text(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        // Structured insights are kept as their JSON text.
        other => other.to_string(),
    };
    if text.is_empty() {
        NO_INSIGHTS.to_string()
    } else {
        text
    }
}
