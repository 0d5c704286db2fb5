//! Wednesday, a cynical evidence analyzer you can talk to.
//!
//! The crate wires the conversation core to real collaborators: the Gemini
//! model, Google Translate speech and Firestore persistence. It also ships
//! a terminal host for interactive sessions.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod config;
pub mod firestore;
pub mod tts;

pub use config::{Config, ConfigError};
pub use firestore::FirestoreCaseStore;
pub use tts::GoogleTranslateSpeech;

/// Re-exports of [`wednesday_core`] crate.
pub mod core {
    pub use wednesday_core::*;
}
