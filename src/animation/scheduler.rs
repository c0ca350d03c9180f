use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// What a repeating tick callback wants next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickFlow {
    /// Fire again after one more interval.
    Continue,
    /// Unregister this timer.
    Stop,
}

/// Callback invoked on every tick of a repeating timer.
pub type TickFn = Box<dyn FnMut() -> TickFlow>;

/// Cancellation token of one scheduled repeating timer.
///
/// Clones share the same flag. Once [`TickHandle::cancel`] returns, the scheduler never invokes
/// the timer's callback again, even if a tick was already due.
#[derive(Clone, Debug)]
pub struct TickHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl TickHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl PartialEq for TickHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TickHandle {}

/// A single-threaded event loop able to run repeating timers.
///
/// Contract: callbacks run one at a time on the loop thread, ticks of one timer fire in order and
/// never overlap, and a cancelled handle's callback is never invoked afterwards.
pub trait TickScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> TickHandle;
}

struct Timer {
    handle: TickHandle,
    interval: Duration,
    next_due: Duration,
    /// `None` while the callback is running.
    tick: Option<TickFn>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

/// Deterministic virtual-time event loop.
///
/// Time only moves when the owner calls [`ManualScheduler::advance`] or
/// [`ManualScheduler::run_until_idle`]. Due ticks fire in `(due time, schedule order)` order.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<SchedulerState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Timers that are still registered and not cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .timers
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    /// Move time forward by `dt`, firing every tick that falls due on the way.
    ///
    /// Returns the number of callbacks invoked.
    pub fn advance(&self, dt: Duration) -> usize {
        let deadline = self.now() + dt;
        let mut fired = 0;
        while self.fire_next(Some(deadline)) {
            fired += 1;
        }
        self.state.borrow_mut().now = deadline;
        fired
    }

    /// Jump from tick to tick until no timer is left or `max_ticks` callbacks ran.
    pub fn run_until_idle(&self, max_ticks: usize) -> usize {
        let mut fired = 0;
        while fired < max_ticks && self.fire_next(None) {
            fired += 1;
        }
        fired
    }

    fn fire_next(&self, deadline: Option<Duration>) -> bool {
        let (id, handle, mut tick) = {
            let mut st = self.state.borrow_mut();
            st.timers.retain(|t| !t.handle.is_cancelled());
            let next = st
                .timers
                .iter_mut()
                .filter(|t| t.tick.is_some())
                .filter(|t| deadline.is_none_or(|d| t.next_due <= d))
                .min_by_key(|t| (t.next_due, t.handle.id));
            let Some(timer) = next else {
                return false;
            };
            let due = timer.next_due;
            let Some(tick) = timer.tick.take() else {
                return false;
            };
            let id = timer.handle.id;
            let handle = timer.handle.clone();
            st.now = st.now.max(due);
            (id, handle, tick)
        };

        // The state borrow is released: the callback may schedule or cancel timers.
        let flow = tick();

        let mut st = self.state.borrow_mut();
        if let Some(pos) = st.timers.iter().position(|t| t.handle.id == id) {
            if flow == TickFlow::Stop || handle.is_cancelled() {
                st.timers.remove(pos);
            } else {
                let timer = &mut st.timers[pos];
                timer.next_due += timer.interval;
                timer.tick = Some(tick);
            }
        }
        true
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> TickHandle {
        // A zero interval would make `advance` spin forever.
        let interval = interval.max(Duration::from_nanos(1));
        let mut st = self.state.borrow_mut();
        let handle = TickHandle::new(st.next_id);
        st.next_id += 1;
        let next_due = st.now + interval;
        tracing::trace!(timer = handle.id, ?interval, "scheduled repeating tick");
        st.timers.push(Timer {
            handle: handle.clone(),
            interval,
            next_due,
            tick: Some(tick),
        });
        handle
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
