//! Turn orchestration for one conversation session.
//!
//! A turn is atomic from the log's point of view: the user message is
//! appended, the generation backend is invoked exactly once, and an assistant
//! message is always appended — generated text on success, a readable notice
//! naming the failure kind otherwise. The session phase transitions
//! Idle → AwaitingGeneration on input and back to Idle unconditionally when
//! the backend resolves.

use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::context;
use crate::chat::prompt;
use crate::chat::session::{Message, Session, TurnPhase};
use crate::llm::generation::{GenerationBackend, GenerationOutcome};
use crate::model_facts::ModelFacts;

/// Orchestrates conversation turns against a generation backend.
pub struct ConversationController {
    backend: Arc<dyn GenerationBackend>,
    facts: Option<Arc<ModelFacts>>,
    model: String,
    history_window: usize,
}

impl ConversationController {
    /// Create a controller over the given backend and shared facts.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        facts: Option<Arc<ModelFacts>>,
        model: impl Into<String>,
        history_window: usize,
    ) -> Self {
        Self {
            backend,
            facts,
            model: model.into(),
            history_window,
        }
    }

    /// Run one full turn and return the recorded assistant reply.
    ///
    /// Both appends always complete: the session never ends a turn with an
    /// unmatched trailing user message.
    pub async fn handle_turn(&self, session: &mut Session, input: &str) -> String {
        session.append(Message::user(input));
        session.set_phase(TurnPhase::AwaitingGeneration);

        let request = {
            let history = context::window(session, self.history_window);
            debug!(
                history_len = history.len(),
                "assembling generation request"
            );
            prompt::build_request(&self.model, self.facts.as_deref(), history, input)
        };

        let outcome = self.backend.generate(&request).await;
        let reply = render_outcome(outcome);

        session.append(Message::assistant(reply.clone()));
        session.set_phase(TurnPhase::Idle);
        info!(session = %session.id(), messages = session.len(), "turn completed");

        reply
    }
}

/// Map an outcome to the text recorded as the assistant message.
fn render_outcome(outcome: GenerationOutcome) -> String {
    match outcome {
        GenerationOutcome::Success { text } => text,
        GenerationOutcome::BackendError { status } => {
            format!("Error: the generation backend returned status {status}.")
        }
        GenerationOutcome::ConnectionFailure => {
            "Error: cannot connect to the generation service. \
             Check that the Ollama endpoint is running."
                .to_string()
        }
        GenerationOutcome::UnknownFailure { description } => {
            format!("An error occurred while generating the answer: {description}")
        }
    }
}
