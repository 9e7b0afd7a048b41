//! Serial, deduplicating, retrying update dispatcher.
//!
//! Requests go into a two-tier queue and are executed one at a time by a
//! background worker. Submitting an action/payload pair that is already
//! queued, executing or waiting for a retry attaches the caller to the
//! existing request instead of creating a new one. Transient failures are
//! retried with exponential backoff; retries re-enter at the front of the
//! queue. Dispatch pauses while the host is hidden or offline and resumes
//! draining as soon as both conditions clear.
//!
//! The worker runs on the ambient Tokio runtime; build the dispatcher from
//! within one. Dropping the [`Dispatcher`] stops the worker and every
//! outstanding ticket resolves to [`DispatchError::Cancelled`].

mod worker;


use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use customizer_common::{DispatchError, Event, EventBus, RequestId};
use customizer_config::DispatchConfig;
use serde_json::Value;
use tokio::sync::{broadcast, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::history::{DispatchStats, History, Outcome};
use crate::request::{Priority, RequestIdentity, UpdateRequest, UpdateTicket};
use crate::transport::Transport;

// =============================================================================
// OPTIONS & BUILDER
// =============================================================================

#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Attempt `n` (0-based) waits `base_delay * 2^n` before retrying.
    pub base_delay: Duration,
    pub request_timeout: Duration,
    pub inter_request_delay: Duration,
    pub history_capacity: usize,
    pub recent_window: Duration,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self::from(&DispatchConfig::default())
    }
}

impl From<&DispatchConfig> for DispatcherOptions {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
            history_capacity: config.history_capacity,
            recent_window: Duration::from_secs(config.recent_window_secs),
        }
    }
}

impl DispatcherOptions {
    /// Backoff before the retry following a failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub struct DispatcherBuilder {
    transport: Arc<dyn Transport>,
    options: DispatcherOptions,
    credential_token: String,
    events: EventBus,
}

impl DispatcherBuilder {
    pub fn options(mut self, options: DispatcherOptions) -> Self {
        self.options = options;
        self
    }

    /// Token sent as `credentialToken` with every request.
    pub fn credential_token(mut self, token: impl Into<String>) -> Self {
        self.credential_token = token.into();
        self
    }

    /// Publish dispatch events on a shared bus instead of a private one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Start the worker. Must be called within a Tokio runtime.
    pub fn build(self) -> Dispatcher {
        let shared = Arc::new(Shared {
            transport: self.transport,
            state: Mutex::new(State {
                queue: VecDeque::new(),
                executing: None,
                waiting: HashMap::new(),
                paused: false,
                online: true,
                history: History::new(self.options.history_capacity),
            }),
            options: self.options,
            credential_token: self.credential_token,
            events: self.events,
            wake: Notify::new(),
            shutdown: CancellationToken::new(),
        });
        tokio::spawn(worker::run(Arc::clone(&shared)));
        Dispatcher { shared }
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Host environment changes that gate dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    Online,
    Offline,
    Visible,
    Hidden,
}

pub struct Dispatcher {
    shared: Arc<Shared>,
}

struct Shared {
    transport: Arc<dyn Transport>,
    options: DispatcherOptions,
    credential_token: String,
    events: EventBus,
    state: Mutex<State>,
    wake: Notify,
    shutdown: CancellationToken,
}

struct State {
    queue: VecDeque<UpdateRequest>,
    executing: Option<InFlight>,
    /// Requests sleeping until their retry timer fires.
    waiting: HashMap<RequestId, UpdateRequest>,
    paused: bool,
    online: bool,
    history: History,
}

struct InFlight {
    request: UpdateRequest,
    abort: CancellationToken,
}

impl State {
    fn find_mut(&mut self, identity: &RequestIdentity) -> Option<&mut UpdateRequest> {
        if let Some(inflight) = self.executing.as_mut() {
            if inflight.request.identity() == identity {
                return Some(&mut inflight.request);
            }
        }
        if let Some(request) = self.queue.iter_mut().find(|r| r.identity() == identity) {
            return Some(request);
        }
        self.waiting.values_mut().find(|r| r.identity() == identity)
    }

    fn can_dispatch(&self) -> bool {
        !self.paused && self.online
    }
}

impl Dispatcher {
    pub fn builder(transport: impl Transport + 'static) -> DispatcherBuilder {
        Self::builder_arc(Arc::new(transport))
    }

    pub fn builder_arc(transport: Arc<dyn Transport>) -> DispatcherBuilder {
        DispatcherBuilder {
            transport,
            options: DispatcherOptions::default(),
            credential_token: String::new(),
            events: EventBus::default(),
        }
    }

    /// Dispatcher with default options and no credential.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::builder(transport).build()
    }

    /// Queue `action` with `payload`, or join an identical pending request.
    pub fn submit(
        &self,
        action: impl Into<String>,
        payload: Value,
        priority: Priority,
    ) -> UpdateTicket {
        let action = action.into();
        let identity = RequestIdentity::new(&action, &payload);

        let ticket = {
            let mut state = self.shared.lock_state();
            if let Some(existing) = state.find_mut(&identity) {
                debug!(action = %action, id = %existing.id, "joining identical pending request");
                return existing.observe();
            }

            let (request, ticket) = UpdateRequest::new(action, payload, priority);
            debug!(action = %request.action, id = %request.id, ?priority, "update queued");
            match priority {
                Priority::High => state.queue.push_front(request),
                Priority::Normal => state.queue.push_back(request),
            }
            ticket
        };

        self.shared.wake.notify_one();
        ticket
    }

    pub fn handle_signal(&self, signal: HostSignal) {
        let event = {
            let mut state = self.shared.lock_state();
            match signal {
                HostSignal::Online => {
                    state.online = true;
                    Event::ConnectivityChanged { online: true }
                }
                HostSignal::Offline => {
                    state.online = false;
                    Event::ConnectivityChanged { online: false }
                }
                HostSignal::Visible => {
                    state.paused = false;
                    Event::VisibilityChanged { visible: true }
                }
                HostSignal::Hidden => {
                    state.paused = true;
                    Event::VisibilityChanged { visible: false }
                }
            }
        };

        info!(?signal, "host signal");
        self.shared.events.publish(event);
        if matches!(signal, HostSignal::Online | HostSignal::Visible) {
            self.shared.wake.notify_one();
        }
    }

    /// Stop dispatching new requests; the one in flight is left to finish.
    pub fn pause(&self) {
        self.handle_signal(HostSignal::Hidden);
    }

    pub fn resume(&self) {
        self.handle_signal(HostSignal::Visible);
    }

    pub fn set_online(&self, online: bool) {
        self.handle_signal(if online {
            HostSignal::Online
        } else {
            HostSignal::Offline
        });
    }

    pub fn is_paused(&self) -> bool {
        self.shared.lock_state().paused
    }

    pub fn is_online(&self) -> bool {
        self.shared.lock_state().online
    }

    /// Cancel the in-flight call and reject every pending request.
    ///
    /// Returns how many requests were cancelled.
    pub fn abort_all(&self) -> usize {
        let cancelled: Vec<UpdateRequest> = {
            let mut state = self.shared.lock_state();
            let mut cancelled = Vec::new();
            if let Some(inflight) = state.executing.take() {
                inflight.abort.cancel();
                cancelled.push(inflight.request);
            }
            cancelled.extend(state.queue.drain(..));
            cancelled.extend(state.waiting.drain().map(|(_, request)| request));
            cancelled
        };

        let count = cancelled.len();
        for request in cancelled {
            request.reject(DispatchError::Cancelled);
        }

        info!(count, "all pending updates aborted");
        self.shared
            .events
            .publish(Event::DispatchCancelled { count });
        count
    }

    pub fn stats(&self) -> DispatchStats {
        let state = self.shared.lock_state();
        state.history.stats(
            state.queue.len() + state.waiting.len(),
            usize::from(state.executing.is_some()),
            self.shared.options.recent_window,
        )
    }

    /// Retained outcomes, oldest first.
    pub fn history(&self) -> Vec<Outcome> {
        self.shared.lock_state().history.iter().cloned().collect()
    }

    /// Requests waiting in the queue, excluding those sleeping on a retry.
    pub fn queue_len(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    pub fn is_executing(&self) -> bool {
        self.shared.lock_state().executing.is_some()
    }

    pub fn options(&self) -> &DispatcherOptions {
        &self.shared.options
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shared.shutdown.cancel();
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
