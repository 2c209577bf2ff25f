//! Per-session conversation memory
//!
//! Histories are keyed by an opaque session id. The first append for an
//! unknown id creates an empty history, so there is no explicit "create
//! session" call. Reads return owned snapshots: a history handed to a
//! caller is never changed by appends that happen after it.

use crate::types::Message;
use std::collections::HashMap;
use std::sync::Mutex;

/// Conversation memory keyed by session id
///
/// The whole map sits behind one mutex, which also serializes appends to
/// the same session from concurrent turns.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    sessions: Mutex<HashMap<String, Vec<Message>>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the session's history, creating the session on
    /// first write.
    pub fn append(&self, session_id: &str, message: Message) {
        let mut sessions = self.sessions.lock().expect("memory lock poisoned");
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(message);
    }

    /// Snapshot of the session's history, oldest first. Unknown sessions
    /// yield an empty snapshot.
    pub fn history_for(&self, session_id: &str) -> Vec<Message> {
        let sessions = self.sessions.lock().expect("memory lock poisoned");
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Number of messages stored for the session
    pub fn len(&self, session_id: &str) -> usize {
        let sessions = self.sessions.lock().expect("memory lock poisoned");
        sessions.get(session_id).map_or(0, Vec::len)
    }

    /// Whether the session has no recorded turns
    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    /// Drop the session's history entirely
    pub fn clear(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().expect("memory lock poisoned");
        sessions.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_creates_session() {
        let memory = ConversationMemory::new();
        assert!(memory.is_empty("s1"));

        memory.append("s1", Message::user("hello"));
        assert_eq!(memory.len("s1"), 1);
    }

    #[test]
    fn test_history_last_element_is_last_append() {
        let memory = ConversationMemory::new();
        memory.append("s1", Message::user("question"));
        memory.append("s1", Message::assistant("answer"));

        let history = memory.history_for("s1");
        assert_eq!(history.last().unwrap(), &Message::assistant("answer"));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_appends() {
        let memory = ConversationMemory::new();
        memory.append("s1", Message::user("first"));

        let snapshot = memory.history_for("s1");
        memory.append("s1", Message::assistant("second"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(memory.history_for("s1").len(), 2);
    }

    #[test]
    fn test_sessions_are_independent() {
        let memory = ConversationMemory::new();
        memory.append("a", Message::user("for a"));
        memory.append("b", Message::user("for b"));

        assert_eq!(memory.history_for("a").len(), 1);
        assert_eq!(memory.history_for("a")[0].content, "for a");
        assert_eq!(memory.history_for("b")[0].content, "for b");
    }

    #[test]
    fn test_unknown_session_yields_empty_history() {
        let memory = ConversationMemory::new();
        assert!(memory.history_for("nope").is_empty());
    }

    #[test]
    fn test_clear() {
        let memory = ConversationMemory::new();
        memory.append("s1", Message::user("hello"));
        memory.clear("s1");
        assert!(memory.is_empty("s1"));
    }

    #[test]
    fn test_concurrent_appends_preserve_count() {
        use std::sync::Arc;

        let memory = Arc::new(ConversationMemory::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let memory = Arc::clone(&memory);
            handles.push(std::thread::spawn(move || {
                for j in 0..50 {
                    memory.append("shared", Message::user(format!("{i}-{j}")));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(memory.len("shared"), 400);
    }
}
