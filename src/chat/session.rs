//! Session state: ordered message history with a last-refresh timestamp.
//!
//! A [`Session`] is created on the user's first interaction and lives for the
//! process lifetime; there is no persistence. Messages are immutable once
//! appended and insertion order is significant.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The generated reply (or a synthesized error notice).
    Assistant,
}

impl Role {
    /// Prompt label for this role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single conversation message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Phase of a session's turn state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for user input.
    #[default]
    Idle,
    /// A generation request is in flight.
    AwaitingGeneration,
}

/// One user's full ordered conversation for the lifetime of their interaction.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    last_refresh: DateTime<Utc>,
    phase: TurnPhase,
}

impl Session {
    /// Create a fresh session with a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    /// Create a fresh session with an explicit identifier.
    #[must_use]
    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            last_refresh: Utc::now(),
            phase: TurnPhase::Idle,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Append a message to the end of the history. O(1), never fails.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.last_refresh = Utc::now();
    }

    /// Read-only view of the full ordered history.
    #[must_use]
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Empty the history. Idempotent; clearing an empty session is fine.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.last_refresh = Utc::now();
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Timestamp of the last append or clear.
    #[must_use]
    pub const fn last_refresh(&self) -> DateTime<Utc> {
        self.last_refresh
    }

    /// Current turn phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Record a turn-phase transition.
    pub fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut session = Session::new();
        session.append(Message::user("first"));
        session.append(Message::assistant("second"));
        session.append(Message::user("third"));

        let contents: Vec<&str> = session.all().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut session = Session::new();
        session.append(Message::user("hello"));

        session.clear();
        assert_eq!(session.len(), 0);

        session.clear();
        assert_eq!(session.len(), 0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_append_refreshes_timestamp() {
        let mut session = Session::new();
        let created = session.last_refresh();
        session.append(Message::user("hello"));
        assert!(session.last_refresh() >= created);
    }

    #[test]
    fn test_new_session_starts_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert!(session.is_empty());
    }

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
