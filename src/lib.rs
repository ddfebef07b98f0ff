//! Conversational front end for a pre-trained disk-failure classifier.
//!
//! The service keeps per-session chat history in process memory, derives a
//! bounded context window for each turn, assembles a generation request, and
//! sends it to an Ollama-compatible endpoint under a timeout. Every failure
//! mode is classified and surfaced as a readable assistant message so the
//! conversation log never ends up half-applied.

// No unsafe code anywhere in this crate.
#![deny(unsafe_code)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Every public item must be documented.
#![warn(missing_docs)]
// Keep the crate clean under the strict Clippy sets.
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::print_stdout)]
#![warn(clippy::todo)]
#![warn(clippy::unimplemented)]

/// Conversation subsystem: sessions, context windows, prompts, turn control.
pub mod chat;
/// Client components for the remote generation endpoint.
pub mod llm;
/// Classifier facts loaded once at startup and shared read-only.
pub mod model_facts;
/// HTTP server and API routes.
pub mod server;
/// Entry helpers to start the chat service.
pub mod start_diskml_chat;
