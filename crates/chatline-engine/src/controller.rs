//! Conversation controller.
//!
//! The controller is the only writer of the [`MessageStore`]. It is a plain
//! synchronous state machine with two phases:
//!
//! - `Idle`: no request outstanding; a non-blank submit appends the user
//!   turn and moves to `Pending`.
//! - `Pending`: exactly one request outstanding; submits are ignored until
//!   [`Controller::settle`] is called with that request's result.
//!
//! The controller never performs I/O. A successful submit returns a
//! [`Dispatch`] describing the request the caller must send; the caller
//! reports the outcome back through `settle`.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::store::{ConversationState, MessageStore};
use crate::transport::TransportError;
use crate::turn::ChatTurn;

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Controller phase.
///
/// This enum is the single source of truth for whether a request is in
/// flight; the store's busy flag mirrors it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input.
    #[default]
    Idle,
    /// One request outstanding.
    Pending {
        /// The request being waited on.
        request: RequestId,
    },
}

impl Phase {
    /// Human-readable phase name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Pending { .. } => "Pending",
        }
    }
}

/// A request the caller must hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Id to report back to [`Controller::settle`].
    pub request: RequestId,
    /// Trimmed, non-empty message text.
    pub message: String,
}

/// Why a submit was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming.
    Blank,
    /// A request is already outstanding.
    Busy,
}

/// Result of [`Controller::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submit had no effect.
    Ignored(IgnoreReason),
    /// The user turn was appended and a request must be sent.
    Dispatched(Dispatch),
}

impl SubmitOutcome {
    /// Whether the submit was accepted.
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }
}

/// Result of [`Controller::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// A reply turn was appended.
    Replied,
    /// The failure turn was appended.
    Failed,
    /// The settlement did not match the outstanding request and was dropped.
    Stale,
}

/// Owns the conversation and drives its state transitions.
#[derive(Debug)]
pub struct Controller {
    store: MessageStore,
    phase: Phase,
    next_request: u64,
}

impl Controller {
    /// Create a controller for a fresh conversation seeded with the greeting.
    pub fn new() -> Self {
        Self::with_store(MessageStore::with_greeting())
    }

    /// Create a controller over an existing store.
    pub fn with_store(mut store: MessageStore) -> Self {
        store.set_busy(false);
        Self {
            store,
            phase: Phase::Idle,
            next_request: 1,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// Borrow the current snapshot.
    pub fn state(&self) -> &ConversationState {
        self.store.state()
    }

    /// Clone the current snapshot.
    pub fn snapshot(&self) -> ConversationState {
        self.store.snapshot()
    }

    /// Handle a user submit.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        if let Phase::Pending { request } = self.phase {
            debug!(%request, "submit ignored while a request is outstanding");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }

        let message = input.trim();
        if message.is_empty() {
            trace!("blank submit ignored");
            return SubmitOutcome::Ignored(IgnoreReason::Blank);
        }

        let request = RequestId(self.next_request);
        self.next_request += 1;

        self.store.append(ChatTurn::user(message));
        self.store.set_busy(true);
        self.phase = Phase::Pending { request };
        debug!(%request, "message dispatched");

        SubmitOutcome::Dispatched(Dispatch {
            request,
            message: message.to_string(),
        })
    }

    /// Apply the outcome of a dispatched request.
    pub fn settle(
        &mut self,
        request: RequestId,
        result: Result<String, TransportError>,
    ) -> SettleOutcome {
        match self.phase {
            Phase::Pending { request: current } if current == request => {}
            phase => {
                warn!(%request, ?phase, "dropping settlement for a request that is not outstanding");
                return SettleOutcome::Stale;
            }
        }

        let outcome = match result {
            Ok(reply) => {
                self.store.append(ChatTurn::assistant(reply));
                SettleOutcome::Replied
            }
            Err(e) => {
                warn!(%request, error = %e, "message failed");
                self.store.append(ChatTurn::failure());
                SettleOutcome::Failed
            }
        };

        self.store.set_busy(false);
        self.phase = Phase::Idle;
        debug!(%request, ?outcome, "request settled");
        outcome
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
