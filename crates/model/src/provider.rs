use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ModelRequest;
use crate::response::ModelResponse;

/// The error type for a model provider.
///
/// The [`Display`](std::fmt::Display) output of the error is the detail
/// that accompanies its kind, e.g. the response body for
/// [`ErrorKind::Status`].
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a model provider.
///
/// Once the provider is created, it should behave like a stateless object.
/// Every call to [`send_request`](Self::send_request) is attempted exactly
/// once; providers must not retry on their own.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Sends a request to the model.
    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static;
}
