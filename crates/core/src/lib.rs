//! Core logic of the evidence analyzer: the conversation store, request
//! assembly, reply rendering, speech rendering and the session orchestrator.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod conversation;
pub mod media;
mod model_client;
mod orchestrator;
pub mod persistence;
mod reply;
mod request;
mod session;
pub mod speech;

pub use orchestrator::{Exchange, Orchestrator, OrchestratorBuilder, Outcome};
pub use reply::{NO_RESPONSE, render_error, render_reply, render_response};
pub use request::{DEFAULT_IMAGE_PROMPT, PERSONA, build_model_request};
pub use session::{DEFAULT_AGENT_ID, Fingerprint, Session, Upload, UserInput};

/// A boxed future used at the type-erased collaborator boundaries.
pub type BoxFuture<T> =
    std::pin::Pin<Box<dyn Future<Output = T> + Send + 'static>>;
