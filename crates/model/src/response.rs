use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A successfully received reply from the model provider.
///
/// Only the first candidate of a reply is considered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelResponse {
    /// All text fragments of the first candidate, concatenated in order.
    Text(String),
    /// The first candidate carries no text at all. The value holds the
    /// raw parts of that candidate so the caller can still inspect them.
    NonText(Value),
    /// The reply contains no candidates.
    NoCandidate,
}
