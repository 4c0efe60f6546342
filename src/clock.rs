//! Tick sources
//!
//! Everything runs on one thread: a clock fires its callbacks when it is
//! advanced (tests) or pumped from the event loop (TUI). Dropping or
//! cancelling a [`TickHandle`] stops delivery immediately, including for
//! ticks still pending in the current pump.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

const SECOND: Duration = Duration::from_secs(1);

pub type TickCallback = Box<dyn FnMut()>;

/// Capability to receive one notification per elapsed second
pub trait Ticker {
    fn on_every_second(&self, callback: TickCallback) -> TickHandle;
}

/// Cancellation handle for a tick subscription. Cancels on drop.
#[derive(Debug)]
pub struct TickHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TickHandle {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let cancelled = Rc::new(Cell::new(false));
        (Self { cancelled: cancelled.clone() }, cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Subscription {
    cancelled: Rc<Cell<bool>>,
    callback: TickCallback,
    next_due: Instant,
}

/// Subscription list that tolerates callbacks subscribing or cancelling
/// while a round of ticks is being delivered
#[derive(Default)]
struct Subscriptions {
    list: RefCell<Vec<Subscription>>,
}

impl Subscriptions {
    fn add(&self, callback: TickCallback, first_due: Instant) -> TickHandle {
        let (handle, cancelled) = TickHandle::new();
        self.list.borrow_mut().push(Subscription {
            cancelled,
            callback,
            next_due: first_due,
        });
        handle
    }

    /// Deliver every tick that is due at `now`, in order per subscription
    fn deliver(&self, now: Instant) {
        let mut current = std::mem::take(&mut *self.list.borrow_mut());

        for sub in current.iter_mut() {
            while !sub.cancelled.get() && sub.next_due <= now {
                sub.next_due += SECOND;
                (sub.callback)();
            }
        }

        let mut list = self.list.borrow_mut();
        let added = std::mem::take(&mut *list);
        *list = current;
        list.extend(added);
        list.retain(|s| !s.cancelled.get());
    }

    fn active(&self) -> usize {
        self.list
            .borrow()
            .iter()
            .filter(|s| !s.cancelled.get())
            .count()
    }

    fn next_due(&self) -> Option<Instant> {
        self.list
            .borrow()
            .iter()
            .filter(|s| !s.cancelled.get())
            .map(|s| s.next_due)
            .min()
    }
}

/// Simulated time for tests: nothing happens until [`ManualClock::advance`]
pub struct ManualClock {
    origin: Instant,
    elapsed: Cell<Duration>,
    subscriptions: Subscriptions,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            subscriptions: Subscriptions::default(),
        }
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    /// Move time forward one second at a time, delivering ticks as they fall due
    pub fn advance(&self, seconds: u32) {
        for _ in 0..seconds {
            self.elapsed.set(self.elapsed.get() + SECOND);
            self.subscriptions.deliver(self.now());
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for ManualClock {
    fn on_every_second(&self, callback: TickCallback) -> TickHandle {
        self.subscriptions.add(callback, self.now() + SECOND)
    }
}

/// Wall-clock ticker, pumped from the front-end's event loop
#[derive(Default)]
pub struct SystemClock {
    subscriptions: Subscriptions,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver all ticks that became due since the last pump
    pub fn pump(&self) {
        self.subscriptions.deliver(Instant::now());
    }

    /// When the next tick falls due, if anything is subscribed
    pub fn next_deadline(&self) -> Option<Instant> {
        self.subscriptions.next_due()
    }
}

impl Ticker for SystemClock {
    fn on_every_second(&self, callback: TickCallback) -> TickHandle {
        self.subscriptions.add(callback, Instant::now() + SECOND)
    }
}
