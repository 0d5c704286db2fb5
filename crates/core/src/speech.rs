//! Speech synthesis of assistant answers.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use bytes::Bytes;

use crate::BoxFuture;

/// The language answers are spoken in.
pub const SPEECH_LANGUAGE: &str = "en";

/// Describes a failed synthesis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpeechError {
    reason: String,
}

impl SpeechError {
    /// Creates an error with the given reason.
    #[inline]
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason of this error.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl StdError for SpeechError {}

/// A text-to-speech service.
///
/// Implementations speak [`SPEECH_LANGUAGE`] at normal speed and return an
/// MP3 byte stream.
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesizes the given text.
    ///
    /// The returned future must be fully independent of `self`.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Bytes, SpeechError>> + Send + 'static;
}

type SynthesizeFn =
    Arc<dyn Fn(&str) -> BoxFuture<Result<Bytes, SpeechError>> + Send + Sync>;

/// A type-erased [`SpeechSynthesizer`].
#[derive(Clone)]
pub(crate) struct SpeechClient {
    synthesize_fn: SynthesizeFn,
}

impl SpeechClient {
    pub(crate) fn new<S: SpeechSynthesizer>(synthesizer: S) -> Self {
        let synthesize_fn: SynthesizeFn = Arc::new(
            move |text: &str| -> BoxFuture<Result<Bytes, SpeechError>> {
                Box::pin(synthesizer.synthesize(text))
            },
        );
        Self { synthesize_fn }
    }

    /// Speaks the text. Blank text yields no audio without calling the
    /// synthesizer.
    pub(crate) async fn render(
        &self,
        text: &str,
    ) -> Result<Option<Bytes>, SpeechError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let audio = (self.synthesize_fn)(text).await?;
        debug!("synthesized {} bytes of audio", audio.len());
        Ok(Some(audio))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::future::ready;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns the text itself as "audio", or fails when `broken` is set.
    #[derive(Clone, Default)]
    pub(crate) struct EchoSynthesizer {
        pub(crate) broken: bool,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl SpeechSynthesizer for EchoSynthesizer {
        fn synthesize(
            &self,
            text: &str,
        ) -> impl Future<Output = Result<Bytes, SpeechError>> + Send + 'static
        {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let result = if self.broken {
                Err(SpeechError::new("speech service unavailable"))
            } else {
                Ok(Bytes::from(text.to_owned()))
            };
            ready(result)
        }
    }

    #[tokio::test]
    async fn test_render() {
        let synthesizer = EchoSynthesizer::default();
        let client = SpeechClient::new(synthesizer.clone());
        let audio = client.render("Obviously.").await.unwrap();
        assert_eq!(audio, Some(Bytes::from_static(b"Obviously.")));
        assert_eq!(synthesizer.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_blank_text() {
        let synthesizer = EchoSynthesizer::default();
        let client = SpeechClient::new(synthesizer.clone());
        assert_eq!(client.render(" \n").await.unwrap(), None);
        assert_eq!(synthesizer.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_failure() {
        let client = SpeechClient::new(EchoSynthesizer {
            broken: true,
            ..Default::default()
        });
        let err = client.render("Hello").await.unwrap_err();
        assert_eq!(err.reason(), "speech service unavailable");
    }
}
