//! Conversation memory: normalizing and bounding message histories.
//!
//! A [`ConversationContext`] is built fresh per orchestration call from
//! caller-supplied history, owned exclusively by that call, and never
//! persisted here. Normalization is total: malformed input is filtered,
//! not rejected.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// A raw message record as supplied by a caller, before normalization.
///
/// The role is an open string at this boundary; unknown roles are coerced
/// to `user` during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub role: String,
    pub content: String,
}

/// An ordered, normalized conversation history (oldest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    messages: Vec<Message>,
}

impl ConversationContext {
    /// Build a context from raw history records.
    ///
    /// - Drops entries whose content is empty or whitespace-only
    /// - Coerces unknown roles to `user` (the turn is preserved)
    /// - Preserves input order; no sorting, no deduplication
    ///
    /// Never fails.
    pub fn normalize(raw: &[RawMessage]) -> Self {
        let messages = raw
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| Message {
                role: Role::from_loose(&m.role),
                content: m.content.clone(),
            })
            .collect();

        Self { messages }
    }

    /// Context holding the given normalized messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message unless it exactly duplicates the trailing turn
    /// (same role and content).
    ///
    /// Callers resubmitting the same prompt with the history echoed back
    /// would otherwise produce two consecutive identical turns.
    pub fn push_deduped(&mut self, message: Message) {
        if self.messages.last() == Some(&message) {
            return;
        }
        self.messages.push(message);
    }

    /// The last `max_turns` entries, order preserved.
    ///
    /// Used by degraded fallback tiers that send a reduced context.
    pub fn windowed(&self, max_turns: usize) -> Self {
        let skip = self.messages.len().saturating_sub(max_turns);
        Self {
            messages: self.messages[skip..].to_vec(),
        }
    }

    /// Short human-readable digest for diagnostics.
    ///
    /// Reports turn count and a role histogram; pure, no side effects.
    pub fn summarize(&self) -> String {
        let mut system = 0usize;
        let mut user = 0usize;
        let mut assistant = 0usize;
        for message in &self.messages {
            match message.role {
                Role::System => system += 1,
                Role::User => user += 1,
                Role::Assistant => assistant += 1,
            }
        }
        format!(
            "{} turns ({} system, {} user, {} assistant)",
            self.messages.len(),
            system,
            user,
            assistant
        )
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the context, yielding the ordered messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(role: &str, content: &str) -> RawMessage {
        RawMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_normalize_drops_blank_content() {
        let history = vec![
            raw("user", "hello"),
            raw("assistant", ""),
            raw("user", "   \t\n"),
            raw("assistant", "hi"),
        ];

        let context = ConversationContext::normalize(&history);
        assert_eq!(context.len(), 2);
        assert_eq!(context.messages()[0].content, "hello");
        assert_eq!(context.messages()[1].content, "hi");
    }

    #[test]
    fn test_normalize_coerces_unknown_roles() {
        let history = vec![raw("tool", "result: 42"), raw("bot", "done")];

        let context = ConversationContext::normalize(&history);
        assert_eq!(context.len(), 2);
        assert!(context.messages().iter().all(|m| m.role == Role::User));
    }

    #[test]
    fn test_normalize_preserves_order() {
        let history: Vec<RawMessage> = (0..5).map(|i| raw("user", &format!("turn {i}"))).collect();

        let context = ConversationContext::normalize(&history);
        let contents: Vec<_> = context.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["turn 0", "turn 1", "turn 2", "turn 3", "turn 4"]);
    }

    #[test]
    fn test_push_deduped_skips_trailing_duplicate() {
        let mut context = ConversationContext::normalize(&[raw("user", "X")]);
        context.push_deduped(Message::user("X"));
        assert_eq!(context.len(), 1);

        // Same content, different role is not a duplicate
        context.push_deduped(Message::assistant("X"));
        assert_eq!(context.len(), 2);

        // Earlier (non-trailing) occurrences do not suppress
        context.push_deduped(Message::user("X"));
        assert_eq!(context.len(), 3);
    }

    #[test]
    fn test_windowed_caps_and_preserves_order() {
        let history: Vec<RawMessage> = (0..8).map(|i| raw("user", &format!("turn {i}"))).collect();
        let context = ConversationContext::normalize(&history);

        let windowed = context.windowed(6);
        assert_eq!(windowed.len(), 6);
        assert_eq!(windowed.messages()[0].content, "turn 2");
        assert_eq!(windowed.messages()[5].content, "turn 7");

        // Window larger than the history returns everything
        assert_eq!(context.windowed(100).len(), 8);
        assert_eq!(context.windowed(0).len(), 0);
    }

    #[test]
    fn test_summarize_digest() {
        let history = vec![
            raw("system", "be brief"),
            raw("user", "hi"),
            raw("assistant", "hello"),
            raw("user", "bye"),
        ];

        let context = ConversationContext::normalize(&history);
        assert_eq!(context.summarize(), "4 turns (1 system, 2 user, 1 assistant)");
    }

    #[test]
    fn test_empty_history() {
        let context = ConversationContext::normalize(&[]);
        assert!(context.is_empty());
        assert_eq!(context.summarize(), "0 turns (0 system, 0 user, 0 assistant)");
    }
}
