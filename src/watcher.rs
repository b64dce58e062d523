//! Timeout protection for in-flight driver callbacks.
//!
//! The driver aborts any callback that exceeds its per-operation
//! deadline, and a slow backend can blow that budget. Every callback
//! therefore checks in here on entry; a single supervisor thread keeps
//! pushing out the deadline of the oldest unfinished operation until it
//! completes. The queue is strictly FIFO, so one stuck callback stalls
//! the pump for everything behind it; the driver's own deadline remains
//! the backstop for that case.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::driver::{Driver, RequestInfo};

/// How long an operation may run before its deadline is pushed out.
const WATCH_INTERVAL: Duration = Duration::from_secs(4 * 60);
/// Deadline extension requested from the driver, in milliseconds.
const RESET_MS: u32 = 5 * 60 * 1000;

struct Entry {
    enqueued: Instant,
    info: RequestInfo,
    finished: Arc<AtomicBool>,
}

#[derive(Default)]
struct Queue {
    entries: VecDeque<Entry>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
}

/// Supervisor handle, owned by the dispatcher. The thread starts lazily
/// on the first watched operation and is woken and joined on drop.
pub struct TimeoutWatcher {
    driver: Arc<dyn Driver>,
    shared: Arc<Shared>,
    interval: Duration,
    reset_ms: u32,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Armed for the duration of one callback; marks the operation finished
/// when dropped.
pub struct WatchGuard {
    finished: Arc<AtomicBool>,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

impl TimeoutWatcher {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self::with_timing(driver, WATCH_INTERVAL, RESET_MS)
    }

    /// Timing-injectable constructor for tests.
    pub fn with_timing(driver: Arc<dyn Driver>, interval: Duration, reset_ms: u32) -> Self {
        Self {
            driver,
            shared: Arc::new(Shared { queue: Mutex::new(Queue::default()), wake: Condvar::new() }),
            interval,
            reset_ms,
            worker: Mutex::new(None),
        }
    }

    /// Register an in-flight operation.
    pub fn watch(&self, info: RequestInfo) -> WatchGuard {
        let finished = Arc::new(AtomicBool::new(false));
        {
            let mut queue = self.shared.queue.lock().expect("watcher mutex poisoned");
            queue.entries.push_back(Entry {
                enqueued: Instant::now(),
                info,
                finished: finished.clone(),
            });
        }
        self.ensure_worker();
        self.shared.wake.notify_all();
        WatchGuard { finished }
    }

    fn ensure_worker(&self) {
        let mut worker = self.worker.lock().expect("watcher worker slot poisoned");
        if worker.is_none() {
            let shared = self.shared.clone();
            let driver = self.driver.clone();
            let interval = self.interval;
            let reset_ms = self.reset_ms;
            *worker = Some(thread::spawn(move || run(&shared, &*driver, interval, reset_ms)));
        }
    }
}

impl Drop for TimeoutWatcher {
    fn drop(&mut self) {
        {
            let mut queue = self.shared.queue.lock().expect("watcher mutex poisoned");
            queue.shutdown = true;
        }
        self.shared.wake.notify_all();
        let handle = self.worker.lock().expect("watcher worker slot poisoned").take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn run(shared: &Shared, driver: &dyn Driver, interval: Duration, reset_ms: u32) {
    let mut queue = shared.queue.lock().expect("watcher mutex poisoned");
    loop {
        if queue.shutdown {
            return;
        }
        let Some(entry) = queue.entries.pop_front() else {
            queue = shared.wake.wait(queue).expect("watcher mutex poisoned");
            continue;
        };
        if entry.finished.load(Ordering::SeqCst) {
            continue;
        }
        // Wait out the remainder of the oldest entry's interval. New
        // arrivals wake the condvar early; only the clock matters here.
        let due = entry.enqueued + interval;
        loop {
            if queue.shutdown {
                return;
            }
            let now = Instant::now();
            if now >= due {
                break;
            }
            let (guard, _timeout) = shared
                .wake
                .wait_timeout(queue, due - now)
                .expect("watcher mutex poisoned");
            queue = guard;
        }
        // Re-check under the lock so a finish that raced the wait wins.
        if entry.finished.load(Ordering::SeqCst) {
            continue;
        }
        driver.reset_timeout(reset_ms, &entry.info);
        queue.entries.push_back(Entry {
            enqueued: due,
            info: entry.info,
            finished: entry.finished,
        });
    }
}
