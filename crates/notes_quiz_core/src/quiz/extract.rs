//! Tolerant extraction of the question payload from free-form model output.
//!
//! Models tend to wrap their JSON answer in prose or code fences. The payload is taken
//! to be everything between the first `{` and the last `}`, decoded leniently, and
//! checked for the one field that must be present.

use serde::de::{Deserialize, DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::QuestionRecord;
use crate::quiz::error::{QuizError, QuizResult};

const QUESTION_ID_PREFIX: &str = "q_llm_";

/// The shape the model is asked to produce. Every field is optional on decode.
#[derive(Debug, Default)]
struct RawQuestion {
    question: Option<String>,
    question_type: Option<String>,
    options: Option<Vec<String>>,
    correct_answer: Option<String>,
    explanation: Option<String>,
    difficulty: Option<String>,
}

impl RawQuestion {
    /// Reads the known fields out of a decoded object. Repeated keys have already
    /// collapsed to their last value; names match case-insensitively, an exact match
    /// winning over a differently-cased one.
    fn from_object(object: &Map<String, Value>) -> QuizResult<Self> {
        Ok(Self {
            question: field(object, "question")?,
            question_type: field(object, "type")?,
            options: field(object, "options")?,
            correct_answer: field(object, "correctAnswer")?,
            explanation: field(object, "explanation")?,
            difficulty: field(object, "difficulty")?,
        })
    }
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, name: &str) -> QuizResult<Option<T>> {
    let value = object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(|e| {
            error!(field = name, "Model response field has the wrong type: {}", e);
            QuizError::MalformedResponse(format!("failed to parse JSON: {} field: {}", name, e))
        }),
    }
}

/// Returns the substring from the first `{` to the last `}`, inclusive.
pub fn delimit_payload(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parses a model response into a question record.
///
/// `note_ids` are the identifiers the caller asked for and are copied verbatim into
/// `based_on_notes`. The `type` and `difficulty` strings are passed through as the
/// model wrote them.
pub fn extract(raw: &str, note_ids: &[i64]) -> QuizResult<QuestionRecord> {
    info!(response_chars = raw.len(), "Parsing model response");

    let payload = delimit_payload(raw).ok_or_else(|| {
        error!("No JSON object found in model response");
        QuizError::MalformedResponse("no JSON object found in response".to_string())
    })?;

    let object: Map<String, Value> = serde_json::from_str(payload).map_err(|e| {
        error!("Failed to decode model response payload: {}", e);
        QuizError::MalformedResponse(format!("failed to parse JSON: {}", e))
    })?;
    let decoded = RawQuestion::from_object(&object)?;

    let text = non_empty(decoded.question).ok_or_else(|| {
        error!("Model response is missing the question field");
        QuizError::MissingRequiredField("question")
    })?;

    let record = QuestionRecord {
        id: format!("{}{}", QUESTION_ID_PREFIX, Uuid::now_v7().simple()),
        text,
        question_type: decoded.question_type.unwrap_or_default(),
        options: decoded.options.filter(|options| !options.is_empty()),
        correct_answer: non_empty(decoded.correct_answer),
        explanation: non_empty(decoded.explanation),
        difficulty: decoded.difficulty.unwrap_or_default(),
        based_on_notes: note_ids.to_vec(),
    };

    info!(
        question_id = %record.id,
        question_type = %record.question_type,
        difficulty = %record.difficulty,
        "Parsed model response into question"
    );
    Ok(record)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
