use std::sync::Condvar;
use std::sync::Mutex;

/// Counting gate drained by watcher callbacks and awaited by the test thread.
///
/// A scenario arms the sink with the number of watcher events it expects,
/// registers its watchers and parks on `wait`. The ZooKeeper client invokes
/// the watcher callbacks on its own dispatch thread, so `signal` must be
/// safe to call concurrently with `wait`.
///
/// The count never goes below zero: once the sink is drained further
/// `signal` calls are ignored.
pub struct EventSink {
    state: Mutex<SinkState>,
    zeroed: Condvar,
}

/// Inner sink state guarded by the mutex.
struct SinkState {
    armed: bool,
    remaining: u32,
    signalled: u32,
}

impl EventSink {
    pub fn new() -> EventSink {
        let state = SinkState {
            armed: false,
            remaining: 0,
            signalled: 0,
        };
        EventSink {
            state: Mutex::new(state),
            zeroed: Condvar::new(),
        }
    }

    /// Arm the sink with the number of events to wait for.
    ///
    /// # Panics
    /// Arming is a once-per-scenario operation: re-arming, arming after a
    /// signal was already observed or arming with a zero count are scenario
    /// programming errors and panic rather than silently resetting the count.
    pub fn arm(&self, count: u32) {
        if count == 0 {
            panic!("event sink must be armed with a positive count");
        }
        let mut state = self.state.lock().expect("EventSink lock poisoned");
        if state.armed {
            panic!("event sink is already armed");
        }
        if state.signalled > 0 {
            panic!("event sink armed after a signal was observed");
        }
        state.armed = true;
        state.remaining = count;
    }

    /// Record one observed event, waking waiters once the count is drained.
    pub fn signal(&self) {
        let mut state = self.state.lock().expect("EventSink lock poisoned");
        state.signalled += 1;
        if state.remaining > 0 {
            state.remaining -= 1;
            if state.remaining == 0 {
                self.zeroed.notify_all();
            }
        }
    }

    /// Block until the armed count has been drained to zero.
    pub fn wait(&self) {
        let mut state = self.state.lock().expect("EventSink lock poisoned");
        while !state.armed || state.remaining > 0 {
            state = self.zeroed.wait(state).expect("EventSink lock poisoned");
        }
    }
}

#[cfg(test)]
impl EventSink {
    pub(crate) fn remaining(&self) -> u32 {
        let state = self.state.lock().expect("EventSink lock poisoned");
        state.remaining
    }
}

/// Binary latch released once the ZooKeeper session is ready.
///
/// Releasing is idempotent: the session watcher and the session-state
/// listener may both report readiness and only the first release counts.
pub struct ReadyGate {
    ready: Condvar,
    released: Mutex<bool>,
}

impl ReadyGate {
    pub fn new() -> ReadyGate {
        ReadyGate {
            ready: Condvar::new(),
            released: Mutex::new(false),
        }
    }

    /// Release the gate, waking all waiters.
    pub fn release(&self) {
        let mut released = self.released.lock().expect("ReadyGate lock poisoned");
        if !*released {
            *released = true;
            self.ready.notify_all();
        }
    }

    /// Block until the gate has been released.
    pub fn wait(&self) {
        let mut released = self.released.lock().expect("ReadyGate lock poisoned");
        while !*released {
            released = self.ready.wait(released).expect("ReadyGate lock poisoned");
        }
    }
}

#[cfg(test)]
impl ReadyGate {
    pub(crate) fn released(&self) -> bool {
        *self.released.lock().expect("ReadyGate lock poisoned")
    }
}
