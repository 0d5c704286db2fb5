use std::sync::Arc;

use tracing::Instrument;
use wednesday_model::{ModelProvider, ModelProviderError, ModelRequest, ModelResponse};

use crate::BoxFuture;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(ModelRequest) -> BoxFuture<SendRequestResult> + Send + Sync
>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req: ModelRequest| {
            let resp_fut = provider.send_request(&req);
            let fut: BoxFuture<SendRequestResult> = Box::pin(
                async move {
                    trace!("got a request with {} messages", req.messages.len());
                    match resp_fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            );
            fut
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the response. The request is attempted
    /// exactly once.
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use wednesday_model::{ErrorKind, ModelMessage, ModelPart, ModelRole};
    use wednesday_test_model::{PresetReply, TestModelProvider};

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            system_instruction: None,
            messages: vec![ModelMessage {
                role: ModelRole::User,
                parts: vec![ModelPart::Text("Hi".to_owned())],
            }],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_reply(PresetReply::text("How are you?"));
        let inspector = model_provider.clone();

        let model_client = ModelClient::new(model_provider);
        let resp = model_client.send_request(request()).await.unwrap();
        assert_eq!(resp, ModelResponse::Text("How are you?".to_owned()));
        assert_eq!(inspector.received_requests(), vec![request()]);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        let model_client = ModelClient::new(model_provider);
        let err = model_client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(500));
    }
}
