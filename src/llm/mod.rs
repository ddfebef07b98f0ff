//! Client components for the remote generation endpoint.

pub mod generation;

pub use generation::{
    EMPTY_RESPONSE_FALLBACK, GenerationBackend, GenerationOutcome, GenerationRequest,
    OllamaGenerationClient,
};
