//! Update requests and the tickets callers hold while one is pending.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use customizer_common::{DispatchError, RequestId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

/// Two-tier queue placement: `High` goes to the front, `Normal` to the back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
}

/// Dedup identity: the action plus a stable serialization of the payload.
///
/// `serde_json` keeps object keys sorted unless `preserve_order` is on, so
/// payloads that differ only in key order serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity {
    action: String,
    payload: String,
}

impl RequestIdentity {
    pub fn new(action: &str, payload: &Value) -> Self {
        Self {
            action: action.to_string(),
            payload: payload.to_string(),
        }
    }
}

/// Lifecycle of a request as seen by its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Queued,
    Executing { attempt: u32 },
    RetryScheduled { attempt: u32, delay_ms: u64 },
    Resolved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Resolved | RequestStatus::Rejected)
    }
}

type Reply = oneshot::Sender<Result<Value, DispatchError>>;

/// One pending remote-persistence operation, owned by the dispatcher.
pub struct UpdateRequest {
    pub id: RequestId,
    pub action: String,
    pub payload: Value,
    pub priority: Priority,
    pub created_at: Instant,
    /// Retries already consumed; 0 on the first attempt.
    pub attempt: u32,
    identity: RequestIdentity,
    observers: Vec<Reply>,
    status: watch::Sender<RequestStatus>,
}

impl UpdateRequest {
    /// Build a request together with the ticket of its first observer.
    pub(crate) fn new(action: String, payload: Value, priority: Priority) -> (Self, UpdateTicket) {
        let identity = RequestIdentity::new(&action, &payload);
        let (status, _) = watch::channel(RequestStatus::Queued);
        let mut request = Self {
            id: RequestId::new(),
            action,
            payload,
            priority,
            created_at: Instant::now(),
            attempt: 0,
            identity,
            observers: Vec::new(),
            status,
        };
        let ticket = request.observe();
        (request, ticket)
    }

    pub fn identity(&self) -> &RequestIdentity {
        &self.identity
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Attach another caller to this request's eventual outcome.
    pub(crate) fn observe(&mut self) -> UpdateTicket {
        let (tx, rx) = oneshot::channel();
        self.observers.push(tx);
        UpdateTicket {
            id: self.id.clone(),
            rx,
            status: self.status.subscribe(),
        }
    }

    pub(crate) fn set_status(&self, status: RequestStatus) {
        self.status.send_replace(status);
    }

    pub(crate) fn resolve(self, data: Value) {
        self.set_status(RequestStatus::Resolved);
        for observer in self.observers {
            let _ = observer.send(Ok(data.clone()));
        }
    }

    pub(crate) fn reject(self, error: DispatchError) {
        self.set_status(RequestStatus::Rejected);
        for observer in self.observers {
            let _ = observer.send(Err(error.clone()));
        }
    }
}

impl std::fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("priority", &self.priority)
            .field("attempt", &self.attempt)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A caller's handle on a submitted request; resolves to the server result.
///
/// If the dispatcher goes away before answering, the ticket resolves to
/// [`DispatchError::Cancelled`].
#[derive(Debug)]
pub struct UpdateTicket {
    id: RequestId,
    rx: oneshot::Receiver<Result<Value, DispatchError>>,
    status: watch::Receiver<RequestStatus>,
}

impl UpdateTicket {
    /// Id of the underlying request; shared by deduplicated tickets.
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn status(&self) -> RequestStatus {
        self.status.borrow().clone()
    }

    /// Receiver for status changes, including non-terminal retry notices.
    pub fn status_updates(&self) -> watch::Receiver<RequestStatus> {
        self.status.clone()
    }
}

impl Future for UpdateTicket {
    type Output = Result<Value, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(DispatchError::Cancelled)))
    }
}
