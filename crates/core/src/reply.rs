use wednesday_model::{ErrorKind, ModelProviderError, ModelResponse};

/// Shown when the model replied without any candidate.
pub const NO_RESPONSE: &str = "Error: No response from Gemini.";

/// Renders the outcome of a model call as the text shown for the
/// assistant's turn. Failures become in-band diagnostics.
pub fn render_reply(
    result: Result<ModelResponse, Box<dyn ModelProviderError>>,
) -> String {
    match result {
        Ok(resp) => render_response(resp),
        Err(err) => render_error(err.as_ref()),
    }
}

/// Renders a successfully received response.
pub fn render_response(resp: ModelResponse) -> String {
    match resp {
        ModelResponse::Text(text) => text,
        ModelResponse::NonText(raw) => {
            format!("Analysis complete. Raw Data: {raw}")
        }
        ModelResponse::NoCandidate => NO_RESPONSE.to_owned(),
    }
}

/// Renders a failed model call.
pub fn render_error(err: &dyn ModelProviderError) -> String {
    match err.kind() {
        ErrorKind::Status(code) => format!("[Error {code}]: {err}"),
        ErrorKind::Transport => format!("Connection Error: {err}"),
        ErrorKind::Parse => format!("Parsing Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wednesday_model::{ModelMessage, ModelPart, ModelProvider, ModelRequest, ModelRole};
    use wednesday_test_model::{PresetFailure, PresetReply, TestModelProvider};

    use super::*;

    async fn render_preset(reply: PresetReply) -> String {
        let mut provider = TestModelProvider::default();
        provider.add_reply(reply);
        let req = ModelRequest {
            system_instruction: None,
            messages: vec![ModelMessage {
                role: ModelRole::User,
                parts: vec![ModelPart::Text("Hi".to_owned())],
            }],
            tools: vec![],
        };
        let result = provider
            .send_request(&req)
            .await
            .map_err(|err| Box::new(err) as Box<dyn ModelProviderError>);
        render_reply(result)
    }

    #[tokio::test]
    async fn test_text() {
        let text = render_preset(PresetReply::text("AB")).await;
        assert_eq!(text, "AB");
    }

    #[tokio::test]
    async fn test_status_error() {
        let text = render_preset(PresetReply::status(500, "boom")).await;
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
        assert_eq!(text, "[Error 500]: boom");
    }

    #[tokio::test]
    async fn test_transport_and_parse_errors() {
        let text =
            render_preset(PresetReply::unreachable("connection refused")).await;
        assert_eq!(text, "Connection Error: connection refused");

        let text = render_preset(PresetReply::Failure(
            PresetFailure::Parse,
            "expected value at line 1 column 1".to_owned(),
        ))
        .await;
        assert_eq!(text, "Parsing Error: expected value at line 1 column 1");
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(render_response(ModelResponse::NoCandidate), NO_RESPONSE);
    }

    #[test]
    fn test_non_text() {
        let raw = json!([{ "functionCall": { "name": "lookup" } }]);
        let text = render_response(ModelResponse::NonText(raw));
        assert_eq!(
            text,
            r#"Analysis complete. Raw Data: [{"functionCall":{"name":"lookup"}}]"#
        );
    }
}
