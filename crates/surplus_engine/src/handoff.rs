//! Bounded, ordered hand-off from the scheduler thread to the presentation
//! loop.
//!
//! The sender never waits on the receiver. When `capacity` events are
//! pending and another cycle report arrives, it is folded into the newest
//! pending report (see [`CycleReport::absorb`]): the latest snapshot wins and
//! every distinct new offer is kept, so notifications are never lost.
//! Non-report events are always queued as-is.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use surplus_core::CycleReport;
use surplus_logging::watch_debug;

pub const DEFAULT_HANDOFF_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    Cycle(CycleReport),
    AuthenticationRequired(String),
    Stopped,
}

struct Shared {
    queue: Mutex<VecDeque<SchedulerEvent>>,
    ready: Condvar,
    capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, VecDeque<SchedulerEvent>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct HandoffSender {
    shared: Arc<Shared>,
}

pub struct HandoffReceiver {
    shared: Arc<Shared>,
}

pub fn handoff(capacity: usize) -> (HandoffSender, HandoffReceiver) {
    let shared = Arc::new(Shared {
        queue: Mutex::new(VecDeque::new()),
        ready: Condvar::new(),
        capacity: capacity.max(1),
    });
    (
        HandoffSender {
            shared: shared.clone(),
        },
        HandoffReceiver { shared },
    )
}

impl HandoffSender {
    pub fn send(&self, event: SchedulerEvent) {
        {
            let mut queue = self.shared.lock();
            match event {
                SchedulerEvent::Cycle(report) if queue.len() >= self.shared.capacity => {
                    let pending_count = queue.len();
                    match queue.back_mut() {
                        Some(SchedulerEvent::Cycle(pending)) => {
                            pending.absorb(report);
                            watch_debug!(
                                "Hand-off full ({} pending); coalesced report now spans {} cycles",
                                pending_count,
                                pending.coalesced + 1
                            );
                        }
                        _ => queue.push_back(SchedulerEvent::Cycle(report)),
                    }
                }
                event => queue.push_back(event),
            }
        }
        self.shared.ready.notify_one();
    }
}

impl HandoffReceiver {
    pub fn try_recv(&self) -> Option<SchedulerEvent> {
        self.shared.lock().pop_front()
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<SchedulerEvent> {
        self.shared.lock().drain(..).collect()
    }

    /// Waits up to `timeout` for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SchedulerEvent> {
        let queue = self.shared.lock();
        let (mut queue, _) = self
            .shared
            .ready
            .wait_timeout_while(queue, timeout, |queue| queue.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.shared.lock().len()
    }
}
