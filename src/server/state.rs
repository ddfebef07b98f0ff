//! Application state shared across all request handlers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::chat::config::ChatConfig;
use crate::chat::controller::ConversationController;
use crate::chat::errors::ChatResult;
use crate::chat::session::{Session, SessionId};
use crate::llm::generation::{GenerationBackend, OllamaGenerationClient};
use crate::model_facts::{self, ModelFacts};

/// Shared application state.
///
/// Sessions proceed fully in parallel; the per-session mutex serializes turns
/// within one session, so a second input waits for the in-flight generation.
pub struct AppState {
    /// Resolved service configuration.
    pub config: ChatConfig,
    /// Classifier facts; absent when the collaborator files were unavailable.
    pub facts: Option<Arc<ModelFacts>>,
    /// Turn orchestrator shared across all sessions.
    pub controller: ConversationController,
    sessions: DashMap<SessionId, Arc<Mutex<Session>>>,
}

impl AppState {
    /// Create application state over the real generation client.
    ///
    /// Facts loading degrades gracefully; an unreachable generation endpoint
    /// is discovered per turn, not at startup.
    ///
    /// # Errors
    /// Returns an error if the config is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: ChatConfig) -> ChatResult<Arc<Self>> {
        config.validate()?;
        let facts = model_facts::load_or_degrade(&config.facts, config.top_features).map(Arc::new);
        let backend: Arc<dyn GenerationBackend> = Arc::new(OllamaGenerationClient::new(&config)?);
        Ok(Self::with_backend(config, facts, backend))
    }

    /// Create application state over an explicit backend (used by tests).
    #[must_use]
    pub fn with_backend(
        config: ChatConfig,
        facts: Option<Arc<ModelFacts>>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Arc<Self> {
        let controller = ConversationController::new(
            backend,
            facts.clone(),
            config.model.clone(),
            config.history_window,
        );

        Arc::new(Self {
            config,
            facts,
            controller,
            sessions: DashMap::new(),
        })
    }

    /// Fetch or create the session for `id`.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::with_id(id))))
            .clone()
    }

    /// Fetch an existing session without creating one.
    #[must_use]
    pub fn existing_session(&self, id: SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }
}
