//! Speech synthesis through the Google Translate TTS endpoint.

use bytes::{Bytes, BytesMut};
use reqwest::{Client, Url};
use wednesday_core::speech::{SPEECH_LANGUAGE, SpeechError, SpeechSynthesizer};

/// The endpoint rejects longer texts, so answers are spoken in chunks.
const MAX_CHUNK_CHARS: usize = 100;

const DEFAULT_BASE_URL: &str = "https://translate.google.com";

/// Speaks text with the voice of Google Translate.
#[derive(Clone, Debug)]
pub struct GoogleTranslateSpeech {
    client: Client,
    base_url: String,
}

impl Default for GoogleTranslateSpeech {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslateSpeech {
    /// Creates a synthesizer for the public endpoint.
    #[inline]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a synthesizer for a custom endpoint.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chunk_url(&self, chunk: &str) -> Result<Url, SpeechError> {
        let base_url = self.base_url.trim_end_matches('/');
        Url::parse_with_params(
            &format!("{base_url}/translate_tts"),
            [
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", SPEECH_LANGUAGE),
                ("client", "tw-ob"),
                ("ttsspeed", "1"),
            ],
        )
        .map_err(|err| SpeechError::new(format!("invalid endpoint: {err}")))
    }
}

impl SpeechSynthesizer for GoogleTranslateSpeech {
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Bytes, SpeechError>> + Send + 'static {
        let urls: Result<Vec<_>, _> = split_text(text, MAX_CHUNK_CHARS)
            .iter()
            .map(|chunk| self.chunk_url(chunk))
            .collect();
        let client = self.client.clone();

        async move {
            let mut audio = BytesMut::new();
            // Chunks are fetched one after another; the MP3 frames can be
            // concatenated as they are.
            for url in urls? {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status())
                    .map_err(|err| SpeechError::new(err.without_url().to_string()))?;
                let bytes = resp.bytes().await.map_err(|err| {
                    SpeechError::new(err.without_url().to_string())
                })?;
                audio.extend_from_slice(&bytes);
            }
            if audio.is_empty() {
                return Err(SpeechError::new("no audio was produced"));
            }
            Ok(audio.freeze())
        }
    }
}

/// Marks after which a chunk may end early.
const BREAK_AFTER: [char; 5] = ['.', ',', ';', '!', '?'];

/// Splits text into chunks of at most `max_chars` characters, breaking at
/// whitespace. A full chunk is cut after its last punctuation mark when it
/// has one, so sentences are not spoken across two clips. Words longer than
/// the limit are broken up.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            let sep = usize::from(!current.is_empty());
            if chunk_len(&current) + sep + word_len <= max_chars {
                current.push(word);
                break;
            }
            if !current.is_empty() {
                let keep = current[..current.len() - 1]
                    .iter()
                    .rposition(|w| w.ends_with(BREAK_AFTER))
                    .map_or(current.len(), |idx| idx + 1);
                let rest = current.split_off(keep);
                chunks.push(current.join(" "));
                current = rest;
                continue;
            }
            // A single word that doesn't fit in an empty chunk.
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(idx, _)| idx);
            chunks.push(word[..split_at].to_owned());
            word = &word[split_at..];
        }
    }
    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

fn chunk_len(words: &[&str]) -> usize {
    let chars: usize = words.iter().map(|w| w.chars().count()).sum();
    chars + words.len().saturating_sub(1)
}
