//! Bounded context window over a session's history.
//!
//! The generation backend has a finite context budget, so only the most recent
//! turns are carried into the prompt; older turns are silently dropped with no
//! summarization. The current user turn is excluded because the assembler
//! interpolates it separately as the final prompt line.

use crate::chat::session::{Message, Session};

/// The most recent `max_size` messages, excluding the current (final) turn.
///
/// Sessions with fewer than `max_size` messages yield everything before the
/// current turn. Chronological order is preserved.
#[must_use]
pub fn window(session: &Session, max_size: usize) -> &[Message] {
    let messages = session.all();
    let Some(end) = messages.len().checked_sub(1) else {
        return &[];
    };
    let start = messages.len().saturating_sub(max_size);
    &messages[start.min(end)..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(count: usize) -> Session {
        let mut session = Session::new();
        for i in 0..count {
            if i % 2 == 0 {
                session.append(Message::user(format!("question {i}")));
            } else {
                session.append(Message::assistant(format!("answer {i}")));
            }
        }
        session
    }

    #[test]
    fn test_empty_session_yields_empty_window() {
        let session = Session::new();
        assert!(window(&session, 20).is_empty());
    }

    #[test]
    fn test_single_message_is_excluded_as_current_turn() {
        let mut session = Session::new();
        session.append(Message::user("first question"));
        assert!(window(&session, 20).is_empty());
    }

    #[test]
    fn test_short_history_returns_everything_before_current_turn() {
        let session = session_with(5);
        let view = window(&session, 20);
        assert_eq!(view.len(), 4);
        assert_eq!(view[0].content, "question 0");
        assert_eq!(view[3].content, "answer 3");
    }

    #[test]
    fn test_sixty_prior_messages_window_twenty_yields_nineteen() {
        // 30 prior turns (60 messages) plus the freshly appended user input.
        let mut session = session_with(60);
        session.append(Message::user("the new question"));

        let view = window(&session, 20);
        assert_eq!(view.len(), 19);
        // The 19 messages immediately preceding the new input, in order.
        assert_eq!(view[0].content, "answer 41");
        assert_eq!(view[18].content, "answer 59");
        assert!(view.iter().all(|m| m.content != "the new question"));
    }

    #[test]
    fn test_window_preserves_chronological_order() {
        let session = session_with(10);
        let view = window(&session, 4);
        let contents: Vec<&str> = view.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["question 6", "answer 7", "question 8"]);
    }

    #[test]
    fn test_zero_window_is_empty() {
        let session = session_with(6);
        assert!(window(&session, 0).is_empty());
    }
}
