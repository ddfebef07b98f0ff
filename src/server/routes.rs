//! HTTP route handlers for the chat API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::session::{Message, SessionId};
use crate::model_facts::ModelFacts;

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_turn))
        .route("/api/model", get(model_info))
        .route("/api/sessions/{id}/history", get(session_history))
        .route("/api/sessions/{id}/clear", post(clear_session))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "diskml-chat",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// One conversation turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session to continue; omit to start a fresh one.
    pub session_id: Option<SessionId>,
    /// The user's question.
    pub message: String,
}

/// Reply for one conversation turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Session the turn was recorded under.
    pub session_id: SessionId,
    /// The recorded assistant reply (generated text or a failure notice).
    pub reply: String,
    /// Model the request was sent to.
    pub model: String,
}

/// Handle one conversation turn.
async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    if request.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "message must not be empty".to_string(),
        ));
    }

    let session_id = request.session_id.unwrap_or_else(SessionId::new);
    let session = state.session(session_id);
    let mut session = session.lock().await;

    let reply = state
        .controller
        .handle_turn(&mut session, &request.message)
        .await;

    Ok(Json(ChatResponse {
        session_id,
        reply,
        model: state.config.model.clone(),
    }))
}

/// Ordered history of one session.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Session identifier.
    pub session_id: SessionId,
    /// Full ordered message list.
    pub messages: Vec<Message>,
    /// Timestamp of the last append or clear.
    pub last_refresh: DateTime<Utc>,
}

/// Return the ordered history of a session.
async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<HistoryResponse>, (StatusCode, String)> {
    let session = state
        .existing_session(id)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown session {id}")))?;
    let session = session.lock().await;

    Ok(Json(HistoryResponse {
        session_id: id,
        messages: session.all().to_vec(),
        last_refresh: session.last_refresh(),
    }))
}

/// Clear a session's history (the user-initiated reset action).
async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, (StatusCode, String)> {
    let session = state
        .existing_session(id)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown session {id}")))?;
    session.lock().await.clear();
    Ok(StatusCode::NO_CONTENT)
}

/// Static model figures for sidebar-style collaborators.
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    /// Model identifier used for generation.
    pub model: String,
    /// Classifier facts; `null` when the collaborator files were unavailable.
    pub facts: Option<ModelFacts>,
}

/// Return the static classifier figures.
async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ModelInfoResponse {
        model: state.config.model.clone(),
        facts: state.facts.as_deref().cloned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::chat::config::ChatConfig;
    use crate::llm::generation::{GenerationBackend, GenerationOutcome, GenerationRequest};

    struct FixedBackend(GenerationOutcome);

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, _request: &GenerationRequest) -> GenerationOutcome {
            self.0.clone()
        }
    }

    fn test_router(outcome: GenerationOutcome) -> Router {
        let state = AppState::with_backend(
            ChatConfig::default(),
            None,
            Arc::new(FixedBackend(outcome)),
        );
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = test_router(GenerationOutcome::Success {
            text: "ok".to_string(),
        });
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_turn_roundtrip() {
        let router = test_router(GenerationOutcome::Success {
            text: "It reflects reallocated sector count.".to_string(),
        });

        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"message": "Why is smart_5 important?"}).to_string(),
            ))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reply"], "It reflects reallocated sector count.");
        assert_eq!(json["model"], "llama3");
        assert!(json["session_id"].is_string());
    }

    #[tokio::test]
    async fn test_chat_then_history_and_clear() {
        let router = test_router(GenerationOutcome::Success {
            text: "answer".to_string(),
        });

        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"message": "hello"}).to_string(),
            ))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let json = body_json(response).await;
        let session_id = json["session_id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(
                Request::get(format!("/api/sessions/{session_id}/history"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let history = body_json(response).await;
        assert_eq!(history["messages"].as_array().unwrap().len(), 2);

        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/api/sessions/{session_id}/clear"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(
                Request::get(format!("/api/sessions/{session_id}/history"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let history = body_json(response).await;
        assert_eq!(history["messages"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let router = test_router(GenerationOutcome::Success {
            text: "ok".to_string(),
        });

        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"message": "  "}).to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_history_is_not_found() {
        let router = test_router(GenerationOutcome::Success {
            text: "ok".to_string(),
        });
        let id = SessionId::new();

        let response = router
            .oneshot(
                Request::get(format!("/api/sessions/{id}/history"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_model_info_without_facts_is_null() {
        let router = test_router(GenerationOutcome::Success {
            text: "ok".to_string(),
        });
        let response = router
            .oneshot(Request::get("/api/model").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["model"], "llama3");
        assert!(json["facts"].is_null());
    }
}
