use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

/// A console destination for rendered records.
///
/// Sinks are shared between the writer thread and producers taking the
/// inline fallback path, so writes go through `&self` and each call must
/// write the whole block in one go.
pub trait ConsoleSink: Send + Sync {
    /// Writes one rendered record. `block` is newline terminated.
    fn write_block(&self, block: &str) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(block.as_bytes())?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct StderrSink;

impl ConsoleSink for StderrSink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(block.as_bytes())?;
        err.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Captures rendered records in memory. Clones share the same buffer.
#[derive(Default, Debug, Clone)]
pub struct MemorySink {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written so far, in write order.
    pub fn blocks(&self) -> Vec<String> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every line written so far, without line terminators.
    pub fn lines(&self) -> Vec<String> {
        self.blocks()
            .iter()
            .flat_map(|block| block.lines().map(String::from))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConsoleSink for MemorySink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(block.to_string());
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_memory_sink() {
    let sink = MemorySink::new();
    let shared = sink.clone();
    sink.write_block("Hello, world!\n").unwrap();
    sink.write_block("error: boom\n  caused by: io\n").unwrap();
    sink.flush().unwrap();
    assert_eq!(shared.len(), 2);
    assert_eq!(
        shared.lines(),
        ["Hello, world!", "error: boom", "  caused by: io"]
    );
}

#[test]
fn test_std_sinks() {
    StdoutSink.write_block("conlog stdout sink\n").unwrap();
    StderrSink.write_block("conlog stderr sink\n").unwrap();
    StdoutSink.flush().unwrap();
    StderrSink.flush().unwrap();
}
