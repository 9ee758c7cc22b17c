use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

const DEFAULT_PERSONALITY: &str = "sarcastic_therapist";
const BASE_ROAST_LEVEL: f64 = 1.0;
const MAX_ROAST_LEVEL: f64 = 5.0;
const ROAST_STEP: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uselessness: Option<f64>,
}

/// One user's running chat. Held only in process memory; no persistence,
/// no expiry. Horizontal scaling loses session continuity.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: String,
    pub messages: Vec<ChatTurn>,
    pub roast_level: f64,
    pub personality: String,
}

impl Session {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            messages: Vec::new(),
            roast_level: BASE_ROAST_LEVEL,
            personality: DEFAULT_PERSONALITY.to_string(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let total: f64 = self
            .messages
            .iter()
            .filter_map(|m| m.uselessness)
            .sum();
        let average_uselessness = if self.messages.is_empty() {
            0.0
        } else {
            total / self.messages.len() as f64
        };
        SessionSummary {
            session_length: self.messages.len(),
            average_uselessness,
            overall_rating: "Another successful session of achieving nothing",
            recommendation:
                "Try talking to an actual therapist... or a houseplant. Both might be more helpful.",
            bill: "$0.00 (you get what you pay for)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_length: usize,
    pub average_uselessness: f64,
    pub overall_rating: &'static str,
    pub recommendation: &'static str,
    pub bill: &'static str,
}

impl SessionSummary {
    pub fn empty() -> Self {
        Session::new("").summary()
    }
}

/// Session repository boundary. Injected into the therapy handlers so
/// the concurrent-access policy is explicit and swappable in tests.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a user/assistant exchange, creating the session lazily on
    /// first contact, and return a snapshot of the session afterwards.
    async fn record_exchange(
        &self,
        user_id: &str,
        user_message: &str,
        reply: &str,
        uselessness: f64,
    ) -> Session;

    async fn get(&self, user_id: &str) -> Option<Session>;
}

/// Process-local map, unbounded for the process lifetime.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn record_exchange(
        &self,
        user_id: &str,
        user_message: &str,
        reply: &str,
        uselessness: f64,
    ) -> Session {
        let mut sessions = self.inner.lock().await;
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Session::new(user_id));

        session.messages.push(ChatTurn {
            role: "user".into(),
            content: user_message.to_string(),
            uselessness: None,
        });
        session.roast_level = (session.roast_level + ROAST_STEP).min(MAX_ROAST_LEVEL);
        session.messages.push(ChatTurn {
            role: "assistant".into(),
            content: reply.to_string(),
            uselessness: Some(uselessness),
        });
        session.clone()
    }

    async fn get(&self, user_id: &str) -> Option<Session> {
        self.inner.lock().await.get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_created_lazily_per_user() {
        let store = InMemorySessionStore::default();
        assert!(store.get("nobody").await.is_none());

        let session = store
            .record_exchange("alice", "hi", "That's... a greeting.", 0.4)
            .await;
        assert_eq!(session.user_id, "alice");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.personality, "sarcastic_therapist");
        assert!(store.get("alice").await.is_some());
        assert!(store.get("bob").await.is_none());
    }

    #[tokio::test]
    async fn roast_level_escalates_and_caps() {
        let store = InMemorySessionStore::default();
        let first = store.record_exchange("u", "one", "reply", 0.0).await;
        assert!((first.roast_level - 1.1).abs() < 1e-9);

        let mut last = first;
        for _ in 0..60 {
            last = store.record_exchange("u", "again", "reply", 0.0).await;
        }
        assert!((last.roast_level - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn summary_averages_over_all_turns() {
        let store = InMemorySessionStore::default();
        store.record_exchange("u", "one", "reply one", 0.8).await;
        let session = store.record_exchange("u", "two", "reply two", 0.4).await;

        let summary = session.summary();
        assert_eq!(summary.session_length, 4);
        // Scored turns sum to 1.2 over 4 messages total.
        assert!((summary.average_uselessness - 0.3).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_is_all_zeroes() {
        let summary = SessionSummary::empty();
        assert_eq!(summary.session_length, 0);
        assert_eq!(summary.average_uselessness, 0.0);
    }
}
