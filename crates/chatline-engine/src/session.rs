//! Async session driver.
//!
//! A [`Session`] couples a [`Controller`] with a [`Transport`]. Accepted
//! submits are sent on a spawned tokio task; the owner polls for the result
//! and the session feeds it back into the controller. Every new snapshot is
//! published on a watch channel so views can observe the conversation
//! without holding the session.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::{Controller, Phase, RequestId, SettleOutcome, SubmitOutcome};
use crate::store::ConversationState;
use crate::transport::{Transport, TransportError};

/// The single outstanding request.
struct InFlight {
    request: RequestId,
    handle: JoinHandle<Result<String, TransportError>>,
}

/// A live conversation bound to a transport.
pub struct Session {
    controller: Controller,
    transport: Arc<dyn Transport>,
    in_flight: Option<InFlight>,
    updates: watch::Sender<ConversationState>,
}

impl Session {
    /// Start a new conversation seeded with the greeting.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let controller = Controller::new();
        let (updates, _) = watch::channel(controller.snapshot());
        Self {
            controller,
            transport,
            in_flight: None,
            updates,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &ConversationState {
        self.controller.state()
    }

    /// Current controller phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Observe snapshots as they are produced.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.updates.subscribe()
    }

    /// Submit user input.
    ///
    /// On acceptance the request is spawned onto the current tokio runtime,
    /// so this must be called from within one.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let outcome = self.controller.submit(input);

        if let SubmitOutcome::Dispatched(dispatch) = &outcome {
            let transport = Arc::clone(&self.transport);
            let message = dispatch.message.clone();
            let handle = tokio::spawn(async move { transport.send(&message).await });

            self.in_flight = Some(InFlight {
                request: dispatch.request,
                handle,
            });
            self.publish();
        }

        outcome
    }

    /// Apply the outstanding request's result if it has finished.
    ///
    /// Never waits on the network; returns `None` when there is nothing to
    /// apply yet.
    pub async fn poll_settled(&mut self) -> Option<SettleOutcome> {
        if !self.in_flight.as_ref()?.handle.is_finished() {
            return None;
        }
        self.wait_settled().await
    }

    /// Wait for the outstanding request to finish and apply its result.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn wait_settled(&mut self) -> Option<SettleOutcome> {
        let InFlight { request, handle } = self.in_flight.take()?;

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(TransportError::Aborted(e.to_string())),
        };

        let outcome = self.controller.settle(request, result);
        self.publish();
        Some(outcome)
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        debug!(
            revision = snapshot.revision(),
            busy = snapshot.is_busy(),
            "conversation updated"
        );
        self.updates.send_replace(snapshot);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("controller", &self.controller)
            .field("in_flight", &self.in_flight.as_ref().map(|f| f.request))
            .finish_non_exhaustive()
    }
}
