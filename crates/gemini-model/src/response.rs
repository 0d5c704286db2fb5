use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wednesday_model::{ErrorKind, ModelResponse};

use crate::Error;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

/// A part of the candidate content. Only `text` is interpreted, everything
/// else (function calls, inline data, thoughts) is kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Parses a successful `generateContent` body.
pub fn parse_response(body: &str) -> Result<ModelResponse, Error> {
    let response = serde_json::from_str::<GenerateContentResponse>(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Parse))?;
    Ok(into_model_response(response))
}

fn into_model_response(response: GenerateContentResponse) -> ModelResponse {
    let Some(candidate) = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
    else {
        return ModelResponse::NoCandidate;
    };

    let parts = candidate
        .content
        .and_then(|content| content.parts)
        .unwrap_or_default();
    let text: String = parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if !text.is_empty() {
        return ModelResponse::Text(text);
    }

    trace!("candidate has no text: {parts:?}");
    let raw = serde_json::to_value(&parts).unwrap_or(Value::Null);
    ModelResponse::NonText(raw)
}
