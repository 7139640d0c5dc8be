//! Scheduler state machine driving repeated poll cycles.
//!
//! ```text
//! Idle -> Polling -> Sleeping -> Polling -> ...
//!            |  ^
//!            v  |
//!          Backoff            (any state) -> Stopped
//! ```
//!
//! The scheduler owns [`PollState`] and runs every cycle inline, so at most
//! one fetch is ever in flight. A `run_now` trigger is a [`Notify`] permit:
//! pressed during a cycle it is stored and consumed by the next sleep, which
//! then ends immediately. Cancellation drops the in-flight cycle future;
//! state is only replaced once a cycle has fully completed.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use surplus_core::{
    refresh_interval_from_secs, ConfigError, FilterCriteria, Location, PollState, SearchSnapshot,
};
use surplus_logging::{watch_debug, watch_error, watch_info, watch_warn};
use tokio::sync::{watch, Notify};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::handoff::{handoff, HandoffReceiver, HandoffSender, SchedulerEvent};
use crate::{run_cycle, BackoffPolicy, CycleFailure, CycleOutcome, OfferSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Polling,
    Sleeping,
    Backoff,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub backoff: BackoffPolicy,
    pub handoff_capacity: usize,
    /// Stop on SIGINT / ctrl-c.
    pub stop_on_ctrl_c: bool,
}

impl SchedulerConfig {
    pub fn new(refresh_interval_secs: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            refresh_interval: refresh_interval_from_secs(refresh_interval_secs)?,
            fetch_timeout: Duration::from_secs(20),
            backoff: BackoffPolicy::default(),
            handoff_capacity: crate::handoff::DEFAULT_HANDOFF_CAPACITY,
            stop_on_ctrl_c: false,
        })
    }
}

/// Control surface shared with the presentation side. Cloning is cheap.
#[derive(Clone)]
pub struct SchedulerHandle {
    search: Arc<watch::Sender<SearchSnapshot>>,
    interval: Arc<watch::Sender<Duration>>,
    run_now: Arc<Notify>,
    cancel: CancellationToken,
    phase: watch::Receiver<SchedulerPhase>,
}

impl SchedulerHandle {
    /// Single entry point for search changes. Publishes a new snapshot for
    /// the next cycle and asks for that cycle to run right away. Returns the
    /// new revision.
    pub fn update_search(&self, location: Location, criteria: FilterCriteria) -> u64 {
        let mut revision = 0;
        self.search.send_modify(|snapshot| {
            *snapshot = snapshot.revise(location, criteria);
            revision = snapshot.revision;
        });
        watch_info!("Search updated (revision {})", revision);
        self.run_now();
        revision
    }

    pub fn set_refresh_interval(&self, interval: Duration) -> Result<(), ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        self.interval.send_replace(interval);
        watch_info!("Refresh interval set to {:?}", interval);
        Ok(())
    }

    pub fn run_now(&self) {
        self.run_now.notify_one();
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn search(&self) -> SearchSnapshot {
        self.search.borrow().clone()
    }

    pub fn phase(&self) -> SchedulerPhase {
        *self.phase.borrow()
    }

    pub fn phase_receiver(&self) -> watch::Receiver<SchedulerPhase> {
        self.phase.clone()
    }
}

enum Step {
    Sleep,
    Backoff(Duration),
    Stop,
}

pub struct Scheduler {
    source: Arc<dyn OfferSource>,
    fetch_timeout: Duration,
    backoff: BackoffPolicy,
    stop_on_ctrl_c: bool,
    search: watch::Receiver<SearchSnapshot>,
    interval: watch::Receiver<Duration>,
    run_now: Arc<Notify>,
    cancel: CancellationToken,
    phase: watch::Sender<SchedulerPhase>,
    events: HandoffSender,
    state: PollState,
    cycle: u64,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn OfferSource>,
        config: SchedulerConfig,
        search: SearchSnapshot,
    ) -> (Self, SchedulerHandle, HandoffReceiver) {
        let (search_tx, search_rx) = watch::channel(search);
        let (interval_tx, interval_rx) = watch::channel(config.refresh_interval);
        let (phase_tx, phase_rx) = watch::channel(SchedulerPhase::Idle);
        let (events, receiver) = handoff(config.handoff_capacity);
        let run_now = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let handle = SchedulerHandle {
            search: Arc::new(search_tx),
            interval: Arc::new(interval_tx),
            run_now: run_now.clone(),
            cancel: cancel.clone(),
            phase: phase_rx,
        };
        let scheduler = Self {
            source,
            fetch_timeout: config.fetch_timeout,
            backoff: config.backoff,
            stop_on_ctrl_c: config.stop_on_ctrl_c,
            search: search_rx,
            interval: interval_rx,
            run_now,
            cancel,
            phase: phase_tx,
            events,
            state: PollState::new(),
            cycle: 0,
        };
        (scheduler, handle, receiver)
    }

    /// Runs until cancelled or until the marketplace demands re-authentication.
    pub async fn run(mut self) {
        watch_info!("Scheduler started");
        if self.stop_on_ctrl_c {
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    watch_info!("Interrupt received; stopping scheduler");
                    cancel.cancel();
                }
            });
        }

        let cancel = self.cancel.clone();
        loop {
            self.enter(SchedulerPhase::Polling);
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    watch_debug!("Cancelled during cycle; abandoning fetch");
                    break;
                }
                step = self.poll_once() => step,
            };
            surplus_logging::clear_cycle();

            match step {
                Step::Sleep => {
                    self.enter(SchedulerPhase::Sleeping);
                    if !self.sleep().await {
                        break;
                    }
                }
                Step::Backoff(delay) => {
                    self.enter(SchedulerPhase::Backoff);
                    if !self.back_off(delay).await {
                        break;
                    }
                }
                Step::Stop => break,
            }
        }

        surplus_logging::clear_cycle();
        self.enter(SchedulerPhase::Stopped);
        self.events.send(SchedulerEvent::Stopped);
        watch_info!(
            "Scheduler stopped after {} cycles ({} consecutive failures)",
            self.cycle,
            self.state.consecutive_failures
        );
    }

    async fn poll_once(&mut self) -> Step {
        self.cycle += 1;
        surplus_logging::set_cycle(self.cycle);
        let search = self.search.borrow_and_update().clone();

        match run_cycle(self.source.as_ref(), &search, &self.state, self.fetch_timeout).await {
            Ok(CycleOutcome::NoLocation) => {
                watch_info!("No location configured; waiting for one");
                Step::Sleep
            }
            Ok(CycleOutcome::Completed { report, state }) => {
                self.state = state;
                self.events.send(SchedulerEvent::Cycle(report));
                Step::Sleep
            }
            Err(CycleFailure { error, state }) => {
                self.state = state;
                if error.is_fatal() {
                    watch_error!("Cycle failed and needs re-authentication: {}", error);
                    self.events
                        .send(SchedulerEvent::AuthenticationRequired(error.to_string()));
                    Step::Stop
                } else {
                    let failures = self.state.consecutive_failures;
                    let delay = self.backoff.delay(failures, &error);
                    watch_warn!(
                        "Cycle failed ({} in a row): {}; retrying in {:?}",
                        failures,
                        error,
                        delay
                    );
                    Step::Backoff(delay)
                }
            }
        }
    }

    /// Waits out the refresh interval. Returns `false` when cancelled.
    async fn sleep(&mut self) -> bool {
        let started = Instant::now();
        let mut interval = *self.interval.borrow_and_update();
        let mut interval_open = true;
        loop {
            let deadline = started + interval;
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return false,
                _ = self.run_now.notified() => {
                    watch_debug!("Run-now trigger; polling early");
                    return true;
                }
                changed = self.interval.changed(), if interval_open => match changed {
                    Ok(()) => {
                        interval = *self.interval.borrow_and_update();
                        watch_debug!("Refresh interval changed mid-sleep to {:?}", interval);
                    }
                    Err(_) => interval_open = false,
                },
                _ = tokio::time::sleep_until(deadline) => return true,
            }
        }
    }

    /// Waits out a backoff delay. Returns `false` when cancelled.
    ///
    /// A run-now trigger does not shorten the delay. The retry that follows
    /// is the requested poll, so the stored permit is consumed here.
    async fn back_off(&self, delay: Duration) -> bool {
        let waited = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        };
        if waited {
            self.take_run_now_permit().await;
        }
        waited
    }

    /// Consumes a stored run-now permit without waiting for one.
    async fn take_run_now_permit(&self) {
        tokio::select! {
            biased;
            _ = self.run_now.notified() => {
                watch_debug!("Run-now trigger during backoff folded into the retry");
            }
            () = std::future::ready(()) => {}
        }
    }

    fn enter(&self, phase: SchedulerPhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            watch_debug!("Scheduler {:?} -> {:?}", previous, phase);
        }
    }
}

/// Scheduler running on its own thread with a single-threaded runtime.
pub struct SchedulerThread {
    handle: SchedulerHandle,
    join: JoinHandle<()>,
}

impl SchedulerThread {
    pub fn spawn(
        source: Arc<dyn OfferSource>,
        config: SchedulerConfig,
        search: SearchSnapshot,
    ) -> io::Result<(Self, HandoffReceiver)> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (scheduler, handle, receiver) = Scheduler::new(source, config, search);
        let join = thread::Builder::new()
            .name("surplus-scheduler".to_string())
            .spawn(move || runtime.block_on(scheduler.run()))?;
        Ok((Self { handle, join }, receiver))
    }

    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }

    /// Cancels the scheduler and waits for its thread to exit.
    pub fn shutdown(self) {
        self.handle.stop();
        if self.join.join().is_err() {
            watch_error!("Scheduler thread panicked during shutdown");
        }
    }
}
