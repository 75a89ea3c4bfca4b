#![forbid(unsafe_code)]

//! Recurring callbacks declared by the model.
//!
//! A model never starts or cancels a timer itself. It lists the
//! subscriptions it wants from [`Model::subscriptions`](crate::Model::subscriptions),
//! and after every update the runtime hands that list to
//! [`SubscriptionManager::reconcile`]:
//!
//! - an id that was not running before is started on its own thread,
//! - a running id that is no longer listed is stopped,
//! - an id that stays listed keeps running untouched, so its schedule is
//!   not reset by unrelated updates.
//!
//! # Cancellation
//!
//! Every running subscription sends into a channel of its own. Stopping it
//! drops the receiving end together with whatever is still queued, so a
//! firing that raced with the cancel is lost rather than delivered late.
//! The thread sees the closed channel (or the stop signal) and exits, and
//! [`SubscriptionManager`] joins it before `reconcile` returns.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

/// Identity of a subscription across reconciles.
pub type SubId = u64;

/// A background source of messages.
pub trait Subscription<M: Send + 'static>: Send {
    /// Two declarations with the same id are the same subscription.
    fn id(&self) -> SubId;

    /// Body of the subscription thread.
    ///
    /// Runs until `stop` fires or `sender` reports a closed channel.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);

    /// Cadence of a clock-driven subscription.
    ///
    /// [`ProgramSimulator`](crate::ProgramSimulator) only drives
    /// subscriptions that report one.
    fn interval(&self) -> Option<Duration> {
        None
    }

    /// The message one firing produces, for virtual-clock driving.
    fn fire(&self) -> Option<M> {
        None
    }
}

struct StopState {
    stopped: Mutex<bool>,
    wake: Condvar,
}

/// Read side of a subscription's stop flag.
#[derive(Clone)]
pub struct StopSignal {
    state: Arc<StopState>,
}

impl StopSignal {
    pub(crate) fn new() -> (Self, StopTrigger) {
        let state = Arc::new(StopState {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            StopTrigger { state },
        )
    }

    pub fn is_stopped(&self) -> bool {
        *self
            .state
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration` unless stopped first. Returns `true` if stopped.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let guard = self
            .state
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .state
            .wake
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Write side of the stop flag, held by the manager.
pub(crate) struct StopTrigger {
    state: Arc<StopState>,
}

impl StopTrigger {
    /// Idempotent.
    pub(crate) fn stop(&self) {
        let mut stopped = self
            .state
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.state.wake.notify_all();
    }
}

struct Running<M> {
    id: SubId,
    trigger: StopTrigger,
    inbox: mpsc::Receiver<M>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<M> Running<M> {
    /// Stop, drop anything queued, wait for the thread.
    fn shut_down(mut self) {
        self.trigger.stop();
        while self.inbox.try_recv().is_ok() {}
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl<M> Drop for Running<M> {
    fn drop(&mut self) {
        // Unjoined only when dropped without shut_down, e.g. while unwinding.
        self.trigger.stop();
    }
}

/// Owns the running subscriptions of one program.
pub struct SubscriptionManager<M: Send + 'static> {
    running: Vec<Running<M>>,
    cursor: usize,
    started: u64,
    stopped: u64,
}

impl<M: Send + 'static> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> SubscriptionManager<M> {
    pub fn new() -> Self {
        Self {
            running: Vec::new(),
            cursor: 0,
            started: 0,
            stopped: 0,
        }
    }

    /// Make the running set match `declared`.
    ///
    /// Retired subscriptions are stopped before new ones start. Repeated ids
    /// within `declared` start one subscription.
    pub fn reconcile(&mut self, declared: Vec<Box<dyn Subscription<M>>>) {
        let wanted: HashSet<SubId> = declared.iter().map(|s| s.id()).collect();
        let before = self.running.len();

        let (keep, retire): (Vec<_>, Vec<_>) = self
            .running
            .drain(..)
            .partition(|r| wanted.contains(&r.id));
        self.running = keep;
        for running in retire {
            self.retire(running);
        }

        for sub in declared {
            if !self.is_active(sub.id()) {
                self.spawn(sub);
            }
        }

        if self.cursor >= self.running.len() {
            self.cursor = 0;
        }
        tracing::trace!(before, after = self.running.len(), "subscriptions reconciled");
    }

    fn spawn(&mut self, sub: Box<dyn Subscription<M>>) {
        let id = sub.id();
        tracing::debug!(sub_id = id, "starting subscription");
        let (signal, trigger) = StopSignal::new();
        let (sender, inbox) = mpsc::channel();
        let worker = thread::spawn(move || sub.run(sender, signal));
        self.started += 1;
        self.running.push(Running {
            id,
            trigger,
            inbox,
            worker: Some(worker),
        });
    }

    fn retire(&mut self, running: Running<M>) {
        tracing::debug!(sub_id = running.id, "stopping subscription");
        self.stopped += 1;
        running.shut_down();
    }

    /// One pending message, visiting subscriptions round-robin.
    ///
    /// The runtime takes exactly one message per dispatch, so a subscription
    /// cancelled by that dispatch delivers nothing more.
    pub fn next_message(&mut self) -> Option<M> {
        let count = self.running.len();
        for step in 0..count {
            let idx = (self.cursor + step) % count;
            if let Ok(msg) = self.running[idx].inbox.try_recv() {
                self.cursor = (idx + 1) % count;
                return Some(msg);
            }
        }
        None
    }

    /// Everything pending right now, in round-robin order.
    pub fn drain_messages(&mut self) -> Vec<M> {
        std::iter::from_fn(|| self.next_message()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    pub fn is_active(&self, id: SubId) -> bool {
        self.running.iter().any(|r| r.id == id)
    }

    /// `(started, stopped)` since the manager was created.
    pub fn lifetime_counts(&self) -> (u64, u64) {
        (self.started, self.stopped)
    }

    /// Stop everything. A no-op when nothing runs.
    pub fn stop_all(&mut self) {
        let running: Vec<_> = self.running.drain(..).collect();
        for r in running {
            self.retire(r);
        }
        self.cursor = 0;
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Fires `make_msg` every `interval`, first one interval after start.
///
/// ```ignore
/// fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
///     if self.playing {
///         vec![Box::new(Every::new(Duration::from_secs(1), || Msg::Tick))]
///     } else {
///         vec![]
///     }
/// }
/// ```
pub struct Every<M: Send + 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: Send + 'static> Every<M> {
    /// Id derived from the interval, so equal cadences are one subscription.
    pub fn new(interval: Duration, make_msg: impl Fn() -> M + Send + Sync + 'static) -> Self {
        Self::with_id(interval.as_nanos() as u64 ^ 0x5449_434B, interval, make_msg)
    }

    pub fn with_id(
        id: SubId,
        interval: Duration,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }
}

impl<M: Send + 'static> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        let mut fired: u64 = 0;
        while !stop.wait_timeout(self.interval) {
            if sender.send((self.make_msg)()).is_err() {
                break;
            }
            fired += 1;
        }
        tracing::trace!(sub_id = self.id, fired, "interval subscription exited");
    }

    fn interval(&self) -> Option<Duration> {
        Some(self.interval)
    }

    fn fire(&self) -> Option<M> {
        Some((self.make_msg)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Tick,
        N(i32),
    }

    /// Sends a fixed list at once, then idles until stopped.
    struct Burst {
        id: SubId,
        msgs: Vec<Msg>,
    }

    impl Subscription<Msg> for Burst {
        fn id(&self) -> SubId {
            self.id
        }

        fn run(&self, sender: mpsc::Sender<Msg>, stop: StopSignal) {
            for msg in &self.msgs {
                let _ = sender.send(msg.clone());
            }
            while !stop.wait_timeout(Duration::from_millis(50)) {}
        }
    }

    fn burst(id: SubId, msgs: &[Msg]) -> Box<dyn Subscription<Msg>> {
        Box::new(Burst {
            id,
            msgs: msgs.to_vec(),
        })
    }

    fn tick(id: SubId, ms: u64) -> Box<dyn Subscription<Msg>> {
        Box::new(Every::with_id(id, Duration::from_millis(ms), || Msg::Tick))
    }

    fn settle() {
        thread::sleep(Duration::from_millis(30));
    }

    #[test]
    fn signal_wait_times_out_when_not_stopped() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.is_stopped());
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn trigger_wakes_a_waiting_thread() {
        let (signal, trigger) = StopSignal::new();
        let waiter = thread::spawn(move || signal.wait_timeout(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(10));
        let t0 = Instant::now();
        trigger.stop();
        trigger.stop();
        assert!(waiter.join().unwrap());
        assert!(t0.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn every_ticks_until_stopped() {
        let every = Every::new(Duration::from_millis(5), || Msg::Tick);
        let (tx, rx) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let worker = thread::spawn(move || every.run(tx, signal));
        thread::sleep(Duration::from_millis(40));
        trigger.stop();
        worker.join().unwrap();
        let got: Vec<_> = rx.try_iter().collect();
        assert!(!got.is_empty());
        assert!(got.iter().all(|m| *m == Msg::Tick));
    }

    #[test]
    fn every_exits_when_receiver_is_gone() {
        let every = Every::new(Duration::from_millis(1), || Msg::Tick);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let (signal, _trigger) = StopSignal::new();
        assert!(thread::spawn(move || every.run(tx, signal)).join().is_ok());
    }

    #[test]
    fn every_ids_and_clock_hooks() {
        let a = Every::<Msg>::new(Duration::from_secs(1), || Msg::Tick);
        let b = Every::<Msg>::new(Duration::from_secs(1), || Msg::Tick);
        let c = Every::<Msg>::new(Duration::from_secs(2), || Msg::Tick);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());

        let d = Every::with_id(3, Duration::from_millis(1000), || Msg::N(7));
        assert_eq!(d.interval(), Some(Duration::from_millis(1000)));
        assert_eq!(d.fire(), Some(Msg::N(7)));
        let e = Burst { id: 1, msgs: vec![] };
        assert_eq!(e.interval(), None);
        assert_eq!(e.fire(), None);
    }

    #[test]
    fn reconcile_starts_keeps_and_stops() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![tick(50, 5)]);
        mgr.reconcile(vec![tick(50, 5)]);
        assert_eq!(mgr.lifetime_counts(), (1, 0));
        settle();
        assert!(!mgr.drain_messages().is_empty());

        mgr.reconcile(vec![]);
        assert_eq!(mgr.lifetime_counts(), (1, 1));
        settle();
        assert!(mgr.drain_messages().is_empty());
    }

    #[test]
    fn repeated_ids_start_once() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![burst(7, &[Msg::N(1)]), burst(7, &[Msg::N(2)])]);
        settle();
        assert_eq!(mgr.drain_messages(), vec![Msg::N(1)]);
        assert_eq!(mgr.active_count(), 1);
        assert!(mgr.is_active(7));
    }

    #[test]
    fn queued_messages_die_with_their_subscription() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![burst(9, &[Msg::N(1), Msg::N(2), Msg::N(3)])]);
        settle();
        assert_eq!(mgr.next_message(), Some(Msg::N(1)));
        mgr.reconcile(vec![]);
        assert_eq!(mgr.next_message(), None);
        assert_eq!(mgr.active_count(), 0);
    }

    #[test]
    fn sources_take_turns() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![
            burst(1, &[Msg::N(1), Msg::N(1)]),
            burst(2, &[Msg::N(2), Msg::N(2)]),
        ]);
        settle();
        assert_eq!(
            mgr.drain_messages(),
            vec![Msg::N(1), Msg::N(2), Msg::N(1), Msg::N(2)]
        );
    }

    #[test]
    fn stop_all_twice_is_harmless() {
        let mut mgr = SubscriptionManager::<Msg>::new();
        mgr.stop_all();
        mgr.reconcile(vec![tick(1, 1000)]);
        mgr.stop_all();
        mgr.stop_all();
        assert_eq!(mgr.lifetime_counts(), (1, 1));
    }

    #[test]
    fn dropping_the_manager_joins_workers() {
        struct Flagged(Arc<AtomicBool>);

        impl Subscription<Msg> for Flagged {
            fn id(&self) -> SubId {
                1
            }

            fn run(&self, _sender: mpsc::Sender<Msg>, stop: StopSignal) {
                while !stop.wait_timeout(Duration::from_millis(5)) {}
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let done = Arc::new(AtomicBool::new(false));
        {
            let mut mgr = SubscriptionManager::<Msg>::new();
            mgr.reconcile(vec![Box::new(Flagged(Arc::clone(&done)))]);
        }
        assert!(done.load(Ordering::SeqCst));
    }
}
