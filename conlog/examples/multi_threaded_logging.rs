use conlog::logger_config;
use log::LevelFilter;

fn main() {
    let _guard = logger_config()
        .with_level(LevelFilter::Debug)
        .init_global()
        .expect("Unable to install the logger");
    log::info!("Hello, world!");
    let handles: Vec<_> = (0..5)
        .map(|i| {
            std::thread::spawn(move || {
                let target = format!("thread {i}");
                for j in 0..3 {
                    log::info!(target: &target, "message {j}");
                }
                log::debug!(target: &target, "done");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    log::error!("errors go to stderr");
    // guard drains the queue when dropped
}
