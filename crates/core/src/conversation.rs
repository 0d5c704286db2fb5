//! Conversation-related types.

use bytes::Bytes;

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The operator.
    User,
    /// The model.
    Assistant,
}

impl Role {
    /// Returns the upper-cased label used in exported transcripts.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One message unit in the conversation.
///
/// At least one of `text` and `image` is always present. Turns are never
/// modified after being appended to a [`Conversation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: Option<String>,
    image: Option<String>,
    audio: Option<Bytes>,
}

impl Turn {
    pub(crate) fn user(text: Option<String>, image: Option<String>) -> Self {
        debug_assert!(text.is_some() || image.is_some());
        Self {
            role: Role::User,
            text,
            image,
            audio: None,
        }
    }

    pub(crate) fn assistant(text: String, audio: Option<Bytes>) -> Self {
        Self {
            role: Role::Assistant,
            text: Some(text),
            image: None,
            audio,
        }
    }

    /// Returns the role of this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the typed, spoken or answered text.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the base64 encoded PNG the operator uploaded with this turn.
    #[inline]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns the synthesized speech of an assistant turn, as MP3 bytes.
    #[inline]
    pub fn audio(&self) -> Option<&Bytes> {
        self.audio.as_ref()
    }
}

/// An ordered, append-only sequence of turns.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Returns all turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if the conversation has no turns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent assistant turn that carries audio.
    pub fn last_audio(&self) -> Option<&Bytes> {
        self.turns.iter().rev().find_map(Turn::audio)
    }

    /// Renders the conversation as `ROLE: text` lines, one per turn.
    ///
    /// Image-only turns render with an empty text.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| {
                format!("{}: {}", turn.role.label(), turn.text().unwrap_or(""))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[inline]
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}
