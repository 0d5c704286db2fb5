//! A model provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use reqwest::{Client, header};
use wednesday_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};

pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use response::parse_response;

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req);
        let req_builder = self.config.endpoint().map(|url| {
            self.client
                .post(url)
                .header(header::CONTENT_TYPE, "application/json")
                .json(&gemini_req)
        });
        let model = self.config.model.clone();

        async move {
            debug!("sending request to {model}");
            let resp = req_builder?.send().await.map_err(|err| {
                // The URL carries the API key, never let it leak.
                let err = err.without_url();
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;

            let status = resp.status();
            let body = resp.text().await.map_err(|err| {
                Error::new(format!("{}", err.without_url()), ErrorKind::Transport)
            })?;
            if !status.is_success() {
                warn!("{model} answered with status {status}");
                return Err(Error::new(body, ErrorKind::Status(status.as_u16())));
            }

            trace!("got response body: {body}");
            parse_response(&body)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wednesday_model::{ModelMessage, ModelPart, ModelRole};

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            system_instruction: None,
            messages: vec![ModelMessage {
                role: ModelRole::User,
                parts: vec![ModelPart::Text("Hello".to_owned())],
            }],
            tools: vec![],
        }
    }

    /// Serves a single canned HTTP response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Drain the request before answering.
            let mut received = Vec::new();
            let mut buf = [0; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received);
                let Some(head_end) = text.find("\r\n\r\n") else {
                    continue;
                };
                let content_len = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= head_end + 4 + content_len {
                    break;
                }
            }

            let resp = format!(
                "HTTP/1.1 {status_line}\r\n\
                 content-type: application/json\r\n\
                 content-length: {}\r\n\
                 connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    fn provider(base_url: &str) -> GeminiProvider {
        let config = GeminiConfigBuilder::with_api_key("secret")
            .with_base_url(base_url)
            .build();
        GeminiProvider::new(config)
    }

    #[tokio::test]
    async fn test_error_status() {
        let base_url =
            serve_once("500 Internal Server Error", "boom".to_owned()).await;
        let err = provider(&base_url)
            .send_request(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(500));
        assert_eq!(err.message(), "boom");
    }

    #[tokio::test]
    async fn test_successful_reply() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "A"}, {"text": "B"}]
                }
            }]
        });
        let base_url = serve_once("200 OK", body.to_string()).await;
        let resp = provider(&base_url).send_request(&request()).await.unwrap();
        assert_eq!(resp, ModelResponse::Text("AB".to_owned()));
    }

    #[tokio::test]
    async fn test_unparseable_reply() {
        let base_url = serve_once("200 OK", "not json".to_owned()).await;
        let err = provider(&base_url)
            .send_request(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = provider("http://127.0.0.1:9");
        let err = provider.send_request(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.message().contains("secret"));
    }
}
