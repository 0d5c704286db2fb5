use serde::Serialize;
use wednesday_model::{ModelMessage, ModelPart, ModelRequest, ModelRole, ModelTool};

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct GoogleSearch {}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
enum Tool {
    GoogleSearch { google_search: GoogleSearch },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: req.messages.iter().map(create_content).collect(),
        system_instruction: req.system_instruction.as_ref().map(|text| {
            SystemInstruction {
                parts: vec![Part::Text { text: text.clone() }],
            }
        }),
        tools: req.tools.iter().map(create_tool).collect(),
    }
}

#[inline]
fn create_content(msg: &ModelMessage) -> Content {
    let role = match msg.role {
        ModelRole::User => "user",
        ModelRole::Model => "model",
    };
    Content {
        role,
        parts: msg.parts.iter().map(create_part).collect(),
    }
}

#[inline]
fn create_part(part: &ModelPart) -> Part {
    match part {
        ModelPart::InlineData { mime_type, data } => Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            },
        },
        ModelPart::Text(text) => Part::Text { text: text.clone() },
    }
}

#[inline]
fn create_tool(tool: &ModelTool) -> Tool {
    match tool {
        ModelTool::WebSearch => Tool::GoogleSearch {
            google_search: GoogleSearch {},
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            system_instruction: Some("You are Wednesday.".to_owned()),
            messages: vec![
                ModelMessage {
                    role: ModelRole::User,
                    parts: vec![
                        ModelPart::InlineData {
                            mime_type: "image/png".to_owned(),
                            data: "aGVsbG8=".to_owned(),
                        },
                        ModelPart::Text("What is this?".to_owned()),
                    ],
                },
                ModelMessage {
                    role: ModelRole::Model,
                    parts: vec![ModelPart::Text("A forgery.".to_owned())],
                },
                ModelMessage {
                    role: ModelRole::User,
                    parts: vec![ModelPart::Text("Are you sure?".to_owned())],
                },
            ],
            tools: vec![ModelTool::WebSearch],
        };
        let expected = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {
                            "inline_data": {
                                "mime_type": "image/png",
                                "data": "aGVsbG8="
                            }
                        },
                        { "text": "What is this?" }
                    ]
                },
                {
                    "role": "model",
                    "parts": [{ "text": "A forgery." }]
                },
                {
                    "role": "user",
                    "parts": [{ "text": "Are you sure?" }]
                }
            ],
            "system_instruction": {
                "parts": [{ "text": "You are Wednesday." }]
            },
            "tools": [{ "google_search": {} }]
        });
        let actual = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = ModelRequest {
            system_instruction: None,
            messages: vec![ModelMessage {
                role: ModelRole::User,
                parts: vec![ModelPart::Text("Hi".to_owned())],
            }],
            tools: vec![],
        };
        let actual = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            actual,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hi" }] }]
            })
        );
    }
}
