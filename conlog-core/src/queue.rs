use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
};

use crate::{
    config::CONLOG_CONFIG,
    entry::LogEntry,
    error::{ConlogError, Result},
    error_detail::ErrorRenderSettings,
    mode::QueueFullMode,
};

/// Runtime-adjustable queue settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    /// Number of records the queue holds before `full_mode` applies.
    pub max_queue_length: usize,
    pub full_mode: QueueFullMode,
    pub error_settings: ErrorRenderSettings,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_queue_length: CONLOG_CONFIG.QUEUE_CAPACITY,
            full_mode: CONLOG_CONFIG.QUEUE_FULL_MODE,
            error_settings: ErrorRenderSettings::default(),
        }
    }
}

impl QueueOptions {
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.max_queue_length)
    }
}

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(ConlogError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// Outcome of [`BoundedQueue::enqueue`].
///
/// Rejected entries are handed back so the caller can write them inline.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    /// The queue was full under [`QueueFullMode::DropAndWriteInline`]; the drop counter was incremented.
    Dropped(LogEntry),
    /// The queue is closed and accepts nothing anymore.
    Closed(LogEntry),
}

fn drop_warning(count: usize) -> LogEntry {
    LogEntry::new(
        format!("{count} message(s) dropped because the log queue was full"),
        true,
    )
}

struct QueueState {
    items: VecDeque<LogEntry>,
    capacity: usize,
    mode: QueueFullMode,
    closed: bool,
    dropped: usize,
    error_settings: Arc<ErrorRenderSettings>,
}

/// FIFO of pending entries shared by any number of producers and one writer.
///
/// All state sits behind one mutex. A single condition variable serves every
/// wait reason (not full, not empty, closed), so every wake is a broadcast and
/// every waiter re-checks its own condition.
pub struct BoundedQueue {
    state: Mutex<QueueState>,
    signal: Condvar,
}

impl BoundedQueue {
    pub fn new(options: QueueOptions) -> Result<Self> {
        options.validate()?;
        let QueueOptions {
            max_queue_length,
            full_mode,
            error_settings,
        } = options;
        Ok(Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                capacity: max_queue_length,
                mode: full_mode,
                closed: false,
                dropped: 0,
                error_settings: Arc::new(error_settings),
            }),
            signal: Condvar::new(),
        })
    }

    // Nothing user-provided runs while the lock is held, so a poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, QueueState>) -> MutexGuard<'a, QueueState> {
        self.signal
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, entry: LogEntry) -> Enqueued {
        let mut state = self.lock();
        while state.items.len() >= state.capacity && !state.closed {
            if state.mode == QueueFullMode::DropAndWriteInline {
                state.dropped += 1;
                return Enqueued::Dropped(entry);
            }
            state = self.wait(state);
        }
        if state.closed {
            return Enqueued::Closed(entry);
        }

        let started_empty = state.items.is_empty();
        if state.dropped > 0 {
            // May push the queue one past capacity; the warning must precede the next queued entry.
            let warning = drop_warning(state.dropped);
            state.items.push_back(warning);
            state.dropped = 0;
        }
        state.items.push_back(entry);
        if started_empty {
            self.signal.notify_all();
        }
        Enqueued::Queued
    }

    /// Blocks until an entry is available. Returns `None` once the queue is closed and drained.
    pub fn try_dequeue(&self) -> Option<(LogEntry, Arc<ErrorRenderSettings>)> {
        let mut state = self.lock();
        while state.items.is_empty() && !state.closed {
            state = self.wait(state);
        }
        let was_full = state.items.len() == state.capacity;
        let entry = state.items.pop_front()?;
        if was_full {
            self.signal.notify_all();
        }
        Some((entry, Arc::clone(&state.error_settings)))
    }

    /// Changes the capacity for future enqueues. Entries already queued are kept.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        let mut state = self.lock();
        state.capacity = capacity;
        self.signal.notify_all();
        Ok(())
    }

    pub fn set_mode(&self, mode: QueueFullMode) {
        let mut state = self.lock();
        state.mode = mode;
        self.signal.notify_all();
    }

    pub fn set_error_settings(&self, settings: ErrorRenderSettings) {
        let mut state = self.lock();
        state.error_settings = Arc::new(settings);
        self.signal.notify_all();
    }

    /// Applies all options at once. Invalid options leave the queue untouched.
    pub fn configure(&self, options: &QueueOptions) -> Result<()> {
        options.validate()?;
        let mut state = self.lock();
        state.capacity = options.max_queue_length;
        state.mode = options.full_mode;
        state.error_settings = Arc::new(options.error_settings.clone());
        self.signal.notify_all();
        Ok(())
    }

    /// Stops accepting entries and wakes every blocked producer and the writer.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.signal.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    pub fn mode(&self) -> QueueFullMode {
        self.lock().mode
    }

    /// Entries dropped since the last drop warning was queued.
    pub fn dropped(&self) -> usize {
        self.lock().dropped
    }

    pub fn error_settings(&self) -> Arc<ErrorRenderSettings> {
        Arc::clone(&self.lock().error_settings)
    }
}
