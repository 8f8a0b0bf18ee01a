use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct GenState<T> {
    items: VecDeque<T>,
    inflight: usize,
    closed: bool,
}

/// FIFO shared between the main thread (producer) and the generation worker (consumer).
///
/// Only the hand-off is locked. A popped item counts as in flight until the
/// consumer calls [`GenerationQueue::task_done`], so `pending` never reports
/// zero while a result is still being produced.
pub struct GenerationQueue<T> {
    state: Mutex<GenState<T>>,
    changed: Condvar,
}

impl<T> Default for GenerationQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GenerationQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GenState {
                items: VecDeque::new(),
                inflight: 0,
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GenState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends `item`; returns false (dropping it) once the queue is closed.
    pub fn push(&self, item: T) -> bool {
        let mut st = self.lock();
        if st.closed {
            return false;
        }
        st.items.push_back(item);
        drop(st);
        self.changed.notify_all();
        true
    }

    /// Blocks until an item is available or the queue is closed.
    pub fn pop_blocking(&self) -> Option<T> {
        let mut st = self.lock();
        loop {
            if st.closed {
                return None;
            }
            if let Some(item) = st.items.pop_front() {
                st.inflight += 1;
                return Some(item);
            }
            st = self.changed.wait(st).unwrap_or_else(|e| e.into_inner());
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        let mut st = self.lock();
        if st.closed {
            return None;
        }
        let item = st.items.pop_front()?;
        st.inflight += 1;
        Some(item)
    }

    /// Marks one popped item as finished.
    pub fn task_done(&self) {
        let mut st = self.lock();
        st.inflight = st.inflight.saturating_sub(1);
        drop(st);
        self.changed.notify_all();
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn inflight(&self) -> usize {
        self.lock().inflight
    }

    /// Queued plus in-flight items.
    pub fn pending(&self) -> usize {
        let st = self.lock();
        st.items.len() + st.inflight
    }

    /// Waits until nothing is queued or in flight. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut st = self.lock();
        while !(st.items.is_empty() && st.inflight == 0) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .changed
                .wait_timeout(st, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            st = guard;
        }
        true
    }

    /// Wakes every waiter and refuses further pushes. Queued items are dropped.
    pub fn close(&self) -> usize {
        let mut st = self.lock();
        st.closed = true;
        let dropped = st.items.len();
        st.items.clear();
        drop(st);
        self.changed.notify_all();
        dropped
    }

    pub fn reopen(&self) {
        let mut st = self.lock();
        st.closed = false;
        st.inflight = 0;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// Main-thread FIFO of chunks waiting for a mesh build. Not synchronized.
#[derive(Debug, Clone)]
pub struct BuildQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for BuildQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BuildQueue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
