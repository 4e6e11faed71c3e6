//! Runs backend requests off the UI thread
//!
//! Every submitted request gets its own short-lived worker thread. Workers
//! report back through a channel which the UI loop drains between frames, so
//! the session is only ever mutated on the UI thread.
//!
//! A cancelled or superseded request cannot be interrupted; its worker keeps
//! waiting on the service. At most [`MAX_IN_FLIGHT`] workers exist at once and
//! anything submitted beyond that fails straight away with
//! [`RequestError::Busy`].

use super::{Action, Completion, Outcome, RequestTicket};
use crate::client::{Backend, RequestError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on worker threads alive at the same time
pub const MAX_IN_FLIGHT: usize = 8;

pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: Arc<AtomicUsize>,
}

/// One claimed worker slot, given back when dropped
struct WorkerSlot(Arc<AtomicUsize>);

impl WorkerSlot {
    fn claim(counter: &Arc<AtomicUsize>) -> Option<Self> {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < MAX_IN_FLIGHT).then_some(n + 1)
            })
            .ok()
            .map(|_| WorkerSlot(Arc::clone(counter)))
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Dispatcher {
            backend,
            sender,
            receiver,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Workers that have not reported back yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `code` for `ticket` on a worker thread
    pub fn submit(&self, ticket: RequestTicket, code: String) {
        let Some(slot) = WorkerSlot::claim(&self.in_flight) else {
            warn!(?ticket, limit = MAX_IN_FLIGHT, "too many workers, request refused");
            let _ = self.sender.send(Completion {
                ticket,
                result: Err(RequestError::Busy(MAX_IN_FLIGHT)),
            });
            return;
        };
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("{:?}-{}", ticket.action, ticket.seq).to_lowercase())
            .spawn(move || {
                let result = match ticket.action {
                    Action::Analyze => backend.tokenize(&code).map(Outcome::Tokens),
                    Action::Parse => backend.parse(&code).map(Outcome::Tree),
                };
                drop(slot);
                // The receiver lives as long as the app; a send error means we are shutting down
                let _ = sender.send(Completion { ticket, result });
            });

        match spawned {
            Ok(_) => debug!(?ticket, "worker started"),
            Err(e) => {
                warn!(?ticket, error = %e, "could not start worker");
                let _ = self.sender.send(Completion {
                    ticket,
                    result: Err(RequestError::Transport(e.to_string())),
                });
            }
        }
    }

    /// Completions that have arrived since the last call, without blocking
    pub fn drain(&self) -> Vec<Completion> {
        self.receiver.try_iter().collect()
    }

    /// Block until the next completion arrives or `timeout` elapses
    pub fn wait(&self, timeout: Duration) -> Option<Completion> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
