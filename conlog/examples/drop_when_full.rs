use std::io;

use conlog::{QueueFullMode, logger_config};
use log::Level;

fn main() {
    // A tiny queue so producers outrun the writer and write inline.
    let registry = logger_config()
        .with_max_queue_length(2)
        .with_queue_full_mode(QueueFullMode::DropAndWriteInline)
        .build()
        .expect("Unable to start the logger");
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = registry.logger(&format!("producer {i}"));
            std::thread::spawn(move || {
                for j in 0..50 {
                    logger.log(Level::Info, format!("record {j}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let error = io::Error::new(io::ErrorKind::BrokenPipe, "upstream closed the connection");
    registry
        .logger("main")
        .log_error(Level::Error, "request aborted", &error);
    registry
        .logger("main")
        .log(Level::Info, "the next queued record reports how many were written inline");
    registry.shutdown();
}
