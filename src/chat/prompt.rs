//! Prompt assembly: instructions, classifier facts, history, and the question.
//!
//! The layout mirrors the conversation it describes: a fixed expert-persona
//! instruction, a facts block interpolated from [`ModelFacts`], the windowed
//! history as labeled lines in chronological order, and the new user question
//! as the final line. Absent facts render an empty facts block; the prompt is
//! still valid.

use crate::chat::session::Message;
use crate::llm::generation::GenerationRequest;
use crate::model_facts::ModelFacts;

/// Fixed expert-persona instruction opening every prompt.
const INSTRUCTIONS: &str = "You are an expert in machine learning and data storage systems. \
You are analysing a specific Random Forest model that predicts disk drive failures.";

/// Closing guidance after the facts block.
const GROUNDING: &str = "Ground your answers in these facts. When asked about importance, \
consult the list above. Be technical but clear.";

/// Build the full generation request for one turn.
#[must_use]
pub fn build_request(
    model: &str,
    facts: Option<&ModelFacts>,
    history: &[Message],
    user_input: &str,
) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        prompt: build_prompt(facts, history, user_input),
        stream: false,
    }
}

/// Render the prompt text from its three sections.
#[must_use]
pub fn build_prompt(facts: Option<&ModelFacts>, history: &[Message], user_input: &str) -> String {
    let mut out = String::with_capacity(estimate_len(facts, history, user_input));

    out.push_str(INSTRUCTIONS);
    out.push('\n');

    if let Some(facts) = facts {
        render_facts(&mut out, facts);
    }

    if !history.is_empty() {
        out.push_str("\nConversation so far:\n");
        for message in history {
            render_turn(&mut out, message);
        }
    }

    out.push_str("\nThe user asks: ");
    out.push_str(user_input);
    out.push('\n');

    out
}

fn render_facts(out: &mut String, facts: &ModelFacts) {
    out.push_str("\nHERE ARE THE FACTS ABOUT THE MODEL:\n");
    out.push_str(&format!(
        "- Overall accuracy: {:.2}%\n",
        facts.accuracy_percent
    ));
    out.push_str(&format!(
        "- Recall (failure catch rate): {:.0}%\n",
        facts.recall_percent
    ));
    out.push_str("- Most important SMART parameters (feature importance):\n");
    out.push_str(&facts.importance_table());
    out.push('\n');
    out.push_str(GROUNDING);
    out.push('\n');
}

fn render_turn(out: &mut String, message: &Message) {
    out.push_str(message.role.label());
    out.push_str(": ");
    out.push_str(&message.content);
    out.push('\n');
}

fn estimate_len(facts: Option<&ModelFacts>, history: &[Message], user_input: &str) -> usize {
    let history_len: usize = history.iter().map(|m| m.content.len() + 16).sum();
    let facts_len = facts.map_or(0, |f| f.top_features.len() * 32 + 256);
    INSTRUCTIONS.len() + facts_len + history_len + user_input.len() + 64
}
