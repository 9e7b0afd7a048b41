//! The single task that executes requests.

use std::sync::Arc;

use customizer_common::{DispatchError, Event, RequestId};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{InFlight, Shared};
use crate::history::Outcome;
use crate::request::RequestStatus;
use crate::transport::Envelope;

/// What the worker needs to run one attempt without holding the lock.
struct Job {
    id: RequestId,
    envelope: Envelope,
    abort: CancellationToken,
}

pub(super) async fn run(shared: Arc<Shared>) {
    debug!("dispatch worker started");
    loop {
        let Some(job) = shared.next_job() else {
            tokio::select! {
                _ = shared.wake.notified() => {}
                _ = shared.shutdown.cancelled() => break,
            }
            continue;
        };

        let result = shared.execute(&job).await;
        shared.settle(job.id, result);

        tokio::select! {
            _ = tokio::time::sleep(shared.options.inter_request_delay) => {}
            _ = shared.shutdown.cancelled() => break,
        }
    }
    debug!("dispatch worker stopped");
}

impl Shared {
    /// Move the queue head into the executing slot, if dispatch is allowed.
    fn next_job(&self) -> Option<Job> {
        let mut state = self.lock_state();
        if !state.can_dispatch() || state.executing.is_some() {
            return None;
        }
        let request = state.queue.pop_front()?;

        request.set_status(RequestStatus::Executing {
            attempt: request.attempt,
        });
        let job = Job {
            id: request.id.clone(),
            envelope: Envelope {
                action: request.action.clone(),
                payload: request.payload.clone(),
                credential_token: self.credential_token.clone(),
            },
            abort: CancellationToken::new(),
        };
        debug!(
            action = %request.action,
            id = %request.id,
            attempt = request.attempt,
            "dispatching"
        );
        state.executing = Some(InFlight {
            request,
            abort: job.abort.clone(),
        });
        Some(job)
    }

    async fn execute(&self, job: &Job) -> Result<Value, DispatchError> {
        tokio::select! {
            _ = job.abort.cancelled() => Err(DispatchError::Cancelled),
            _ = self.shutdown.cancelled() => Err(DispatchError::Cancelled),
            result = tokio::time::timeout(
                self.options.request_timeout,
                self.transport.call(&job.envelope),
            ) => match result {
                Ok(result) => result,
                Err(_) => Err(DispatchError::Timeout),
            },
        }
    }

    /// Resolve, schedule a retry for, or reject the request that just ran.
    fn settle(self: &Arc<Self>, id: RequestId, result: Result<Value, DispatchError>) {
        let mut state = self.lock_state();
        let request = match state.executing.take() {
            Some(inflight) if inflight.request.id == id => inflight.request,
            other => {
                // abort_all already settled it.
                state.executing = other;
                debug!(id = %id, "discarding outcome of aborted request");
                return;
            }
        };

        match result {
            Ok(data) => {
                info!(action = %request.action, attempts = request.attempt + 1, "update succeeded");
                state.history.record(Outcome {
                    action: request.action.clone(),
                    success: true,
                    attempts: request.attempt + 1,
                    turnaround: request.created_at.elapsed(),
                    finished_at: tokio::time::Instant::now(),
                });
                self.events.publish(Event::DispatchSucceeded {
                    action: request.action.clone(),
                    result: data.clone(),
                });
                request.resolve(data);
            }
            Err(err) if err.is_retryable() && request.attempt < self.options.max_retries => {
                let mut request = request;
                let delay = self.options.backoff(request.attempt);
                request.attempt += 1;
                let delay_ms = delay.as_millis() as u64;

                warn!(
                    action = %request.action,
                    attempt = request.attempt,
                    delay_ms,
                    error = %err,
                    "update failed, retrying"
                );
                request.set_status(RequestStatus::RetryScheduled {
                    attempt: request.attempt,
                    delay_ms,
                });
                self.events.publish(Event::DispatchRetry {
                    action: request.action.clone(),
                    attempt: request.attempt,
                    delay_ms,
                });
                state.waiting.insert(request.id.clone(), request);
                drop(state);
                self.schedule_retry(id, delay);
            }
            Err(err) => {
                let attempts = request.attempt + 1;
                let err = if err.is_retryable() {
                    DispatchError::Exhausted {
                        attempts,
                        last: Box::new(err),
                    }
                } else {
                    err
                };
                error!(action = %request.action, attempts, error = %err, "update failed");
                state.history.record(Outcome {
                    action: request.action.clone(),
                    success: false,
                    attempts,
                    turnaround: request.created_at.elapsed(),
                    finished_at: tokio::time::Instant::now(),
                });
                self.events.publish(Event::DispatchFailed {
                    action: request.action.clone(),
                    error: err.to_string(),
                });
                request.reject(err);
            }
        }
    }

    /// Put a waiting request back at the queue front once `delay` passes.
    fn schedule_retry(self: &Arc<Self>, id: RequestId, delay: std::time::Duration) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shared.shutdown.cancelled() => return,
            }
            let requeued = {
                let mut state = shared.lock_state();
                match state.waiting.remove(&id) {
                    Some(request) => {
                        request.set_status(RequestStatus::Queued);
                        state.queue.push_front(request);
                        true
                    }
                    None => false,
                }
            };
            if requeued {
                shared.wake.notify_one();
            }
        });
    }
}
