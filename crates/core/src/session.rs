use bytes::Bytes;

use crate::conversation::{Conversation, Turn};

/// The agent identifier used until the operator picks one.
pub const DEFAULT_AGENT_ID: &str = "Guest_Detective";

/// Identifies an upload by its file name and size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    name: String,
    size: u64,
}

/// A file the operator uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    name: String,
    bytes: Bytes,
}

impl Upload {
    /// Creates an upload from its file name and content.
    #[inline]
    pub fn new<S: Into<String>, B: Into<Bytes>>(name: S, bytes: B) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the content.
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the name and size pair of this upload.
    #[inline]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            name: self.name.clone(),
            size: self.bytes.len() as u64,
        }
    }
}

/// Everything the operator provided in one UI cycle.
///
/// Spoken text takes precedence over typed text. Empty text counts as no
/// text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserInput {
    spoken: Option<String>,
    typed: Option<String>,
    upload: Option<Upload>,
}

impl UserInput {
    /// Creates an input from typed text.
    #[inline]
    pub fn typed<S: Into<String>>(text: S) -> Self {
        Self {
            typed: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates an input from transcribed speech.
    #[inline]
    pub fn spoken<S: Into<String>>(text: S) -> Self {
        Self {
            spoken: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates an input carrying only an upload.
    #[inline]
    pub fn upload(upload: Upload) -> Self {
        Self {
            upload: Some(upload),
            ..Default::default()
        }
    }

    /// Sets the typed text.
    #[inline]
    pub fn with_typed<S: Into<String>>(mut self, text: S) -> Self {
        self.typed = Some(text.into());
        self
    }

    /// Sets the transcribed speech.
    #[inline]
    pub fn with_spoken<S: Into<String>>(mut self, text: S) -> Self {
        self.spoken = Some(text.into());
        self
    }

    /// Attaches an upload.
    #[inline]
    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Returns the text to process, if any.
    pub fn text(&self) -> Option<&str> {
        self.spoken
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.typed.as_deref().filter(|text| !text.is_empty()))
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Option<Upload>) {
        let text = self.text().map(ToOwned::to_owned);
        (text, self.upload)
    }
}

/// The state of one interactive session.
///
/// A session is owned by exactly one UI loop and passed explicitly to the
/// [`Orchestrator`](crate::Orchestrator) for every exchange.
#[derive(Clone, Debug)]
pub struct Session {
    pub(crate) conversation: Conversation,
    pub(crate) last_upload: Option<Fingerprint>,
    agent_id: String,
}

impl Default for Session {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_ID)
    }
}

impl Session {
    /// Creates an empty session for the given agent identifier.
    #[inline]
    pub fn new<S: Into<String>>(agent_id: S) -> Self {
        Self {
            conversation: Conversation::default(),
            last_upload: None,
            agent_id: agent_id.into(),
        }
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns all turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        self.conversation.turns()
    }

    /// Returns the agent identifier.
    #[inline]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Changes the agent identifier. Already persisted records keep the old
    /// one.
    #[inline]
    pub fn set_agent_id<S: Into<String>>(&mut self, agent_id: S) {
        self.agent_id = agent_id.into();
    }

    /// Returns `true` if this upload was already turned into a turn.
    #[inline]
    pub fn is_processed(&self, upload: &Upload) -> bool {
        self.last_upload.as_ref() == Some(&upload.fingerprint())
    }

    /// Returns `true` if the input would start an exchange.
    pub fn should_process(&self, input: &UserInput) -> bool {
        if input.text().is_some() {
            return true;
        }
        input
            .upload
            .as_ref()
            .is_some_and(|upload| !self.is_processed(upload))
    }

    /// Empties the conversation and forgets the last processed upload.
    pub fn clear_history(&mut self) {
        debug!("clearing {} turns", self.conversation.len());
        self.conversation.clear();
        self.last_upload = None;
    }

    /// Renders the transcript offered for download, or `None` when there is
    /// nothing to download.
    pub fn export_transcript(&self) -> Option<String> {
        if self.conversation.is_empty() {
            return None;
        }
        Some(self.conversation.transcript())
    }

    /// The file name of the downloaded transcript.
    #[inline]
    pub fn transcript_file_name(&self) -> String {
        format!("{}_Case_File.txt", self.agent_id)
    }
}
