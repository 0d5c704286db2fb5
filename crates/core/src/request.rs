use wednesday_model::{ModelMessage, ModelPart, ModelRequest, ModelRole, ModelTool};

use crate::conversation::{Role, Turn};
use crate::media;

/// The system instruction sent with every request.
pub const PERSONA: &str = "You are Wednesday, a specialized Evidence \
Analyzer Agent. Your personality is cynical, precise, and dry. If an image \
is provided, analyze every detail in it like a detective. You do NOT suffer \
fools gladly. Never break character. Use Google Search to verify facts.";

/// The text sent along with an upload when the operator typed nothing.
pub const DEFAULT_IMAGE_PROMPT: &str = "Analyze this evidence.";

/// Builds the request for the newest user input.
///
/// `history` holds every turn before the newest user turn. The newest input
/// must carry text, an image, or both.
pub fn build_model_request(
    history: &[Turn],
    text: Option<&str>,
    image: Option<&[u8]>,
) -> ModelRequest {
    let image = image.map(media::encode_base64);

    let mut messages: Vec<_> = history
        .iter()
        .map(|turn| {
            let role = match turn.role() {
                Role::User => ModelRole::User,
                Role::Assistant => ModelRole::Model,
            };
            create_message(role, turn.text(), turn.image())
        })
        .collect();
    messages.push(create_message(ModelRole::User, text, image.as_deref()));

    ModelRequest {
        system_instruction: Some(PERSONA.to_owned()),
        messages,
        tools: vec![ModelTool::WebSearch],
    }
}

fn create_message(
    role: ModelRole,
    text: Option<&str>,
    image: Option<&str>,
) -> ModelMessage {
    let mut parts = Vec::with_capacity(2);
    if let Some(data) = image {
        parts.push(ModelPart::InlineData {
            mime_type: media::image_mime_type(),
            data: data.to_owned(),
        });
    }
    if let Some(text) = text {
        parts.push(ModelPart::Text(text.to_owned()));
    }
    ModelMessage { role, parts }
}
