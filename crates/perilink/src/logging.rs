//! Subscriber setup for applications embedding the driver.
//!
//! The library crates only emit `tracing` events; nothing is printed until a
//! binary installs a subscriber.

use tracing_subscriber::filter::LevelFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Install a global fmt subscriber writing to stderr.
///
/// Does nothing if a subscriber is already installed. Frame hex dumps are
/// logged at `DEBUG`.
pub fn init_logging(format: LogFormat, level: LevelFilter) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
