/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The system instructions, sent alongside every request.
    pub system_instruction: Option<String>,
    /// The input messages, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Tools that are enabled for the model.
    pub tools: Vec<ModelTool>,
}

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Model,
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelMessage {
    /// Who wrote this message.
    pub role: ModelRole,
    /// Contents of the message, in order.
    pub parts: Vec<ModelPart>,
}

/// One piece of a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelPart {
    /// Binary data embedded in the request.
    InlineData {
        /// MIME type of the data, e.g. `image/png`.
        mime_type: String,
        /// Base64 encoding of the data.
        data: String,
    },
    /// Plain text.
    Text(String),
}

/// A built-in tool the model is allowed to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelTool {
    /// Grounds answers with web search results.
    WebSearch,
}
