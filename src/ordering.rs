//! System-first message ordering
//!
//! Some backends require the system instruction to be the first message in
//! the request even though memory replay and retrieval augmentation can
//! insert messages ahead of it. `normalize` compensates with a stable sort:
//! system messages keep their relative order and move to the front, all
//! other messages keep theirs and follow.

use crate::types::Message;

/// Sort key: system messages first, everything else after
fn role_priority(message: &Message) -> u8 {
    if message.is_system() {
        0
    } else {
        1
    }
}

/// Stable-sort messages so all system messages precede the rest. Pure and
/// idempotent; called exactly once immediately before transmission.
pub fn normalize(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by_key(role_priority);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use quickcheck_macros::quickcheck;

    fn msgs(turns: &[(Role, &str)]) -> Vec<Message> {
        turns.iter()
            .map(|(role, content)| Message::new(*role, *content))
            .collect()
    }

    #[test]
    fn test_system_moves_first() {
        let input = msgs(&[
            (Role::User, "turn 1"),
            (Role::Assistant, "answer 1"),
            (Role::System, "instructions"),
            (Role::User, "turn 2"),
        ]);

        let normalized = normalize(input);
        assert_eq!(normalized[0].role, Role::System);
        assert_eq!(normalized[1].content, "turn 1");
        assert_eq!(normalized[2].content, "answer 1");
        assert_eq!(normalized[3].content, "turn 2");
    }

    #[test]
    fn test_relative_order_within_groups_is_preserved() {
        let input = msgs(&[
            (Role::User, "u1"),
            (Role::System, "s1"),
            (Role::User, "u2"),
            (Role::System, "s2"),
        ]);

        let normalized = normalize(input);
        assert_eq!(normalized[0].content, "s1");
        assert_eq!(normalized[1].content, "s2");
        assert_eq!(normalized[2].content, "u1");
        assert_eq!(normalized[3].content, "u2");
    }

    #[test]
    fn test_already_ordered_input_is_unchanged() {
        let input = msgs(&[
            (Role::System, "instructions"),
            (Role::User, "question"),
            (Role::Assistant, "answer"),
        ]);
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(Vec::new()).is_empty());
    }

    fn arbitrary_messages(roles: &[u8]) -> Vec<Message> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let role = match r % 3 {
                    0 => Role::System,
                    1 => Role::User,
                    _ => Role::Assistant,
                };
                Message::new(role, format!("m{i}"))
            })
            .collect()
    }

    #[quickcheck]
    fn prop_normalize_is_idempotent(roles: Vec<u8>) -> bool {
        let once = normalize(arbitrary_messages(&roles));
        normalize(once.clone()) == once
    }

    #[quickcheck]
    fn prop_system_prefix_then_rest(roles: Vec<u8>) -> bool {
        let input = arbitrary_messages(&roles);
        let system_count = input.iter().filter(|m| m.is_system()).count();
        let expected_system: Vec<_> =
            input.iter().filter(|m| m.is_system()).cloned().collect();
        let expected_rest: Vec<_> =
            input.iter().filter(|m| !m.is_system()).cloned().collect();

        let normalized = normalize(input);
        normalized[..system_count] == expected_system[..]
            && normalized[system_count..] == expected_rest[..]
    }
}
