use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::{
    config::CONLOG_CONFIG,
    entry::LogEntry,
    error::{ConlogError, Result},
    error_detail::ErrorRenderSettings,
    mode::QueueFullMode,
    queue::{BoundedQueue, Enqueued, QueueOptions},
    sink::{ConsoleSink, StderrSink, StdoutSink},
};

/// Name of the dedicated thread that writes queued entries.
pub const WRITER_THREAD_NAME: &str = "conlog-writer";

struct Sinks {
    stdout: Arc<dyn ConsoleSink>,
    stderr: Arc<dyn ConsoleSink>,
}

impl Sinks {
    fn write(&self, entry: &LogEntry, settings: &ErrorRenderSettings) -> io::Result<()> {
        let sink = if entry.is_error_stream() {
            &self.stderr
        } else {
            &self.stdout
        };
        sink.write_block(&render(entry, settings))
    }

    fn flush(&self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}

fn render(entry: &LogEntry, settings: &ErrorRenderSettings) -> String {
    let text = entry.text().trim_end();
    let mut block = String::with_capacity(text.len() + 1);
    block.push_str(text);
    block.push('\n');
    if let Some(error) = entry.error() {
        error.render_into(&mut block, settings);
    }
    block
}

struct WriterHandle {
    thread: JoinHandle<()>,
    done: Receiver<()>,
}

/// Owns the queue, the two sinks and the writer thread.
///
/// Producers call [`submit`](Self::submit) from any thread. Entries that the
/// queue accepts are written by the writer thread in FIFO order; entries it
/// rejects (full under [`QueueFullMode::DropAndWriteInline`], or closed) are
/// written right away on the submitting thread, so they can appear out of
/// order relative to queued ones.
pub struct LogProcessor {
    queue: Arc<BoundedQueue>,
    sinks: Arc<Sinks>,
    writer: Mutex<Option<WriterHandle>>,
    /// Grace used when the processor is dropped.
    shutdown_grace: Mutex<Duration>,
}

impl LogProcessor {
    pub fn new(
        stdout: Arc<dyn ConsoleSink>,
        stderr: Arc<dyn ConsoleSink>,
        options: QueueOptions,
    ) -> Result<Self> {
        let queue = Arc::new(BoundedQueue::new(options)?);
        let sinks = Arc::new(Sinks { stdout, stderr });
        let (done_sender, done) = bounded(1);
        let thread = {
            let queue = Arc::clone(&queue);
            let sinks = Arc::clone(&sinks);
            thread::Builder::new()
                .name(WRITER_THREAD_NAME.into())
                .spawn(move || run_writer(&queue, &sinks, done_sender))
                .map_err(ConlogError::SpawnWriter)?
        };
        Ok(Self {
            queue,
            sinks,
            writer: Mutex::new(Some(WriterHandle { thread, done })),
            shutdown_grace: Mutex::new(CONLOG_CONFIG.shutdown_grace()),
        })
    }

    /// A processor writing to the process' standard output and standard error.
    pub fn stdio(options: QueueOptions) -> Result<Self> {
        Self::new(Arc::new(StdoutSink), Arc::new(StderrSink), options)
    }

    /// Hands an entry to the writer thread, or writes it inline when the queue rejects it.
    ///
    /// Never fails. Under [`QueueFullMode::Wait`] this blocks while the queue is full.
    pub fn submit(&self, entry: LogEntry) {
        match self.queue.enqueue(entry) {
            Enqueued::Queued => {}
            Enqueued::Dropped(entry) | Enqueued::Closed(entry) => {
                let settings = self.queue.error_settings();
                // Inline writes are best effort: a dead sink is the writer thread's concern.
                let _ = self.sinks.write(&entry, &settings);
            }
        }
    }

    /// Applies capacity, full mode and error settings together.
    pub fn configure(&self, options: &QueueOptions) -> Result<()> {
        self.queue.configure(options)
    }

    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        self.queue.set_capacity(capacity)
    }

    pub fn set_mode(&self, mode: QueueFullMode) {
        self.queue.set_mode(mode)
    }

    pub fn set_error_settings(&self, settings: ErrorRenderSettings) {
        self.queue.set_error_settings(settings)
    }

    /// Sets how long dropping the processor waits for the writer to drain.
    pub fn set_shutdown_grace(&self, grace: Duration) {
        *self
            .shutdown_grace
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = grace;
    }

    pub fn shutdown_grace(&self) -> Duration {
        *self
            .shutdown_grace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Closes the queue and waits up to `grace` for the writer to drain it.
    ///
    /// Entries still queued when the grace period expires are abandoned with
    /// the writer thread. Calling this again is a no-op.
    pub fn shutdown(&self, grace: Duration) {
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.queue.close();
        let Some(WriterHandle { thread, done }) = writer else {
            return;
        };
        match done.recv_timeout(grace) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = thread.join();
            }
            // The writer is detached and keeps draining on its own.
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// Entries waiting for the writer thread.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn dropped(&self) -> usize {
        self.queue.dropped()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn mode(&self) -> QueueFullMode {
        self.queue.mode()
    }
}

impl Drop for LogProcessor {
    fn drop(&mut self) {
        self.shutdown(self.shutdown_grace());
    }
}

fn run_writer(queue: &BoundedQueue, sinks: &Sinks, done: Sender<()>) {
    while let Some((entry, settings)) = queue.try_dequeue() {
        if sinks.write(&entry, &settings).is_err() {
            // The console is gone: stop queueing so producers fall back to inline writes.
            queue.close();
            break;
        }
    }
    sinks.flush();
    let _ = done.send(());
}
