use serde::{Deserialize, Serialize};
use wednesday_model::ModelResponse;

/// The failure kinds a preset reply can simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum PresetFailure {
    /// A non-success HTTP status.
    Status(u16),
    /// The endpoint was unreachable.
    Transport,
    /// The body could not be parsed.
    Parse,
}

/// The preset reply for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PresetReply {
    /// The request succeeds with this response.
    Response(ModelResponse),
    /// The request fails with the given kind and message.
    Failure(PresetFailure, String),
}

impl PresetReply {
    /// Creates a successful text reply.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Response(ModelResponse::Text(text.into()))
    }

    /// Creates a failed reply with a non-success HTTP status.
    #[inline]
    pub fn status<S: Into<String>>(code: u16, body: S) -> Self {
        Self::Failure(PresetFailure::Status(code), body.into())
    }

    /// Creates a failed reply that simulates an unreachable endpoint.
    #[inline]
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::Failure(PresetFailure::Transport, message.into())
    }
}
