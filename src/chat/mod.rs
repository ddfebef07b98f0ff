//! Conversation subsystem for the DiskML chat service.
//!
//! Organized into:
//! - `session`: ordered message history and per-session state
//! - `context`: bounded recent-history windows for prompt construction
//! - `prompt`: generation-request assembly from facts, history, and input
//! - `controller`: turn orchestration and outcome-to-message mapping
//! - `config`: externally overridable service settings
//! - `errors`: typed error taxonomy
//! - `thinking`: cosmetic placeholder rotation for UI collaborators

pub mod config;
pub mod context;
pub mod controller;
pub mod errors;
pub mod prompt;
pub mod session;
pub mod thinking;

pub use config::{ChatConfig, FactsConfig};
pub use controller::ConversationController;
pub use errors::{ChatError, ChatResult};
pub use session::{Message, Role, Session, SessionId, TurnPhase};
