use std::fmt::Debug;

use reqwest::Url;
use wednesday_model::ErrorKind;

use crate::Error;

/// Builder for [`GeminiConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GeminiConfigBuilder {
    api_key: String,
    model: Option<String>,
    base_url: Option<String>,
}

impl GeminiConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            base_url: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key,
            model: self.model.unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            base_url: self.base_url.unwrap_or_else(|| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
        }
    }
}

impl Debug for GeminiConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfigBuilder")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for the Gemini provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) base_url: String,
}

impl GeminiConfig {
    /// Returns the model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The `generateContent` URL, authenticated by the `key` query
    /// parameter. Never log the returned value.
    pub(crate) fn endpoint(&self) -> Result<Url, Error> {
        let base_url = self.base_url.trim_end_matches('/');
        Url::parse_with_params(
            &format!("{base_url}/models/{}:generateContent", self.model),
            [("key", self.api_key.as_str())],
        )
        .map_err(|err| {
            Error::new(format!("invalid endpoint: {err}"), ErrorKind::Transport)
        })
    }
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfigBuilder::with_api_key("secret").build();
        assert_eq!(config.model(), "gemini-2.5-flash");
        let url = config.endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/\
             gemini-2.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let config = GeminiConfigBuilder::with_api_key("a b")
            .with_model("gemini-pro")
            .with_base_url("http://localhost:8080/")
            .build();
        let url = config.endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/models/gemini-pro:generateContent?key=a+b"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = GeminiConfigBuilder::with_api_key("secret").build();
        let output = format!("{config:?}");
        assert!(!output.contains("secret"));
        assert!(output.contains("<deducted>"));
    }
}
