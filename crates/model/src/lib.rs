//! An abstraction layer for hosted multimodal LLMs.
//!
//! This crate establishes a provider-agnostic shape for the requests the
//! conversation core builds and the replies it consumes, so that the core
//! never touches a concrete wire format.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
