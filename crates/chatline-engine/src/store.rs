//! In-memory message store.
//!
//! The store holds the ordered turns of a single conversation and the busy
//! flag. Every mutation produces a fresh [`ConversationState`] snapshot:
//! appends allocate a new turn list instead of pushing into a shared one, so
//! an observer holding an older snapshot can tell it is stale by identity.

use std::sync::Arc;

use crate::turn::ChatTurn;

/// Immutable snapshot of a conversation.
#[derive(Debug, Clone)]
pub struct ConversationState {
    turns: Arc<[ChatTurn]>,
    busy: bool,
    revision: u64,
}

impl ConversationState {
    /// Committed turns in chronological order.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mutation counter; bumped on every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The most recent committed turn.
    pub fn last_turn(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Whether `other` is the very same snapshot.
    ///
    /// Compares turn-list identity rather than contents, so two
    /// conversations that happen to contain equal text are still distinct.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.turns, &other.turns)
            && self.busy == other.busy
            && self.revision == other.revision
    }
}

/// Owner of the conversation data; mutated only by the controller.
#[derive(Debug)]
pub struct MessageStore {
    state: ConversationState,
}

impl MessageStore {
    /// Create a store seeded with the given turns.
    pub fn new(seed: impl IntoIterator<Item = ChatTurn>) -> Self {
        Self {
            state: ConversationState {
                turns: seed.into_iter().collect(),
                busy: false,
                revision: 0,
            },
        }
    }

    /// Create a store seeded with the assistant greeting.
    pub fn with_greeting() -> Self {
        Self::new([ChatTurn::greeting()])
    }

    /// Append a turn, producing a new snapshot.
    pub fn append(&mut self, turn: ChatTurn) -> &ConversationState {
        let mut turns = Vec::with_capacity(self.state.turns.len() + 1);
        turns.extend(self.state.turns.iter().cloned());
        turns.push(turn);

        self.state = ConversationState {
            turns: turns.into(),
            busy: self.state.busy,
            revision: self.state.revision + 1,
        };
        &self.state
    }

    /// Set the busy flag. Setting it to its current value is not a change.
    pub fn set_busy(&mut self, busy: bool) -> &ConversationState {
        if self.state.busy != busy {
            self.state = ConversationState {
                turns: Arc::clone(&self.state.turns),
                busy,
                revision: self.state.revision + 1,
            };
        }
        &self.state
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ConversationState {
        self.state.clone()
    }

    /// Borrow the current snapshot.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::with_greeting()
    }
}
