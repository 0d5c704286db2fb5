//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex};

use wednesday_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
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

#[derive(Default)]
struct Script {
    replies: Vec<PresetReply>,
    received: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should reply to each request in order. The n-th request gets the
/// n-th reply. If there are not enough replies in the script, the request
/// fails with a `500` status.
///
/// Clones share the same script, so a test can keep one clone to inspect
/// the requests the other clone received.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
}

impl TestModelProvider {
    /// Appends a reply to the script.
    #[inline]
    pub fn add_reply(&mut self, reply: PresetReply) {
        self.lock().replies.push(reply);
    }

    /// Returns all requests received so far, oldest first.
    pub fn received_requests(&self) -> Vec<ModelRequest> {
        self.lock().received.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned script only happens after a test already panicked.
        self.script.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let reply = {
            let mut script = self.lock();
            let step_idx = script.received.len();
            script.received.push(req.clone());
            script.replies.get(step_idx).cloned()
        };

        async move {
            match reply {
                Some(PresetReply::Response(resp)) => Ok(resp),
                Some(PresetReply::Failure(failure, message)) => {
                    let kind = match failure {
                        PresetFailure::Status(code) => ErrorKind::Status(code),
                        PresetFailure::Transport => ErrorKind::Transport,
                        PresetFailure::Parse => ErrorKind::Parse,
                    };
                    Err(Error { message, kind })
                }
                None => Err(Error {
                    message: "no enough replies".to_owned(),
                    kind: ErrorKind::Status(500),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use wednesday_model::{ModelMessage, ModelPart, ModelRole};

    use super::*;

    fn request(text: &str) -> ModelRequest {
        ModelRequest {
            system_instruction: None,
            messages: vec![ModelMessage {
                role: ModelRole::User,
                parts: vec![ModelPart::Text(text.to_owned())],
            }],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_reply(PresetReply::text("Hello, world!"));
        provider.add_reply(PresetReply::status(429, "slow down"));

        let resp = provider.send_request(&request("Hi")).await.unwrap();
        assert_eq!(resp, ModelResponse::Text("Hello, world!".to_owned()));

        let err = provider.send_request(&request("Again")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(429));
        assert_eq!(err.to_string(), "slow down");

        let err = provider.send_request(&request("More")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(500));

        let received = provider.clone().received_requests();
        assert_eq!(received.len(), 3);
        assert_eq!(received[1], request("Again"));
    }
}
