//! Session lifecycle and event delivery
//!
//! A session is the lifetime of one upload-to-completion (or abort)
//! interaction. The controller holds a single mutable slot for the current
//! session: at most one cancellation handle is live process-wide, which is
//! what keeps disconnect and abort wiring simple. Beginning a new session
//! while one is live cancels the old one before installing the new one.

use crate::types::StreamEvent;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outbound event channel for one session
///
/// Writes are non-blocking; the pipeline never waits for client
/// acknowledgment. When the receiving side is dropped (client disconnect),
/// the sink latches closed and every further write is silently swallowed.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<StreamEvent>,
    closed: Arc<AtomicBool>,
}

impl EventSink {
    /// Create a sink and the receiver its events drain from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        };
        (sink, rx)
    }

    /// Write one event to the stream
    ///
    /// A failed send marks the sink closed; no further writes are attempted.
    pub fn send(&self, event: StreamEvent) {
        if self.closed.load(Ordering::Relaxed) {
            return;
        }
        if self.tx.send(event).is_err() {
            self.closed.store(true, Ordering::Relaxed);
            tracing::debug!("event sink closed by receiver, dropping further events");
        }
    }

    /// Whether the receiving side has gone away
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed) || self.tx.is_closed()
    }
}

struct ActiveSession {
    id: u64,
    cancel: CancellationToken,
}

/// Arbiter for the single active-session slot
///
/// States: Idle (slot empty), Active (slot holds a session), back to Idle
/// when the owning [`SessionGuard`] drops.
pub struct SessionController {
    active: Mutex<Option<ActiveSession>>,
    next_id: AtomicU64,
}

impl SessionController {
    /// Create a controller with an empty slot
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Begin a new session, preempting any live one
    ///
    /// If the slot is occupied, the previous session's token is cancelled
    /// before the new session is installed. The returned guard owns the slot
    /// entry and clears it on drop.
    pub fn begin(self: &Arc<Self>) -> SessionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        let mut slot = self.lock_slot();
        if let Some(previous) = slot.take() {
            tracing::warn!(
                preempted_session = previous.id,
                new_session = id,
                "preempting active session for a new upload"
            );
            previous.cancel.cancel();
        }
        *slot = Some(ActiveSession {
            id,
            cancel: cancel.clone(),
        });
        drop(slot);

        tracing::info!(session = id, "session started");
        SessionGuard {
            controller: Arc::clone(self),
            id,
            cancel,
        }
    }

    /// Cancel the active session, if any
    ///
    /// Idempotent: cancelling an already-cancelled session is a no-op and
    /// the session still emits exactly one `aborted` event. Returns false
    /// when the slot is idle.
    pub fn abort_active(&self) -> bool {
        let slot = self.lock_slot();
        match slot.as_ref() {
            Some(session) => {
                tracing::info!(session = session.id, "aborting active session");
                session.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a session currently occupies the slot
    pub fn is_active(&self) -> bool {
        self.lock_slot().is_some()
    }

    /// Clear the slot, but only if `id` still owns it
    ///
    /// A guard from a preempted session must not clear its successor's entry.
    fn finish(&self, id: u64) {
        let mut slot = self.lock_slot();
        if slot.as_ref().map(|session| session.id) == Some(id) {
            *slot = None;
            tracing::info!(session = id, "session slot released");
        }
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Owning handle for one session's slot entry
///
/// Carries the session's cancellation token; dropping the guard returns the
/// controller to Idle (unless the session was already preempted).
pub struct SessionGuard {
    controller: Arc<SessionController>,
    id: u64,
    cancel: CancellationToken,
}

impl SessionGuard {
    /// This session's identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The session's cancellation token
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.controller.finish(self.id);
    }
}
