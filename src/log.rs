//! Logging setup for the runner and for tests.
use failure::Error;
use log::{debug, error, LevelFilter};

#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static INIT_TEST_LOGGING: Once = Once::new();

/// Level for the given amount of `-v` flags, `None` meaning `--quiet`.
pub fn level_for(verbosity_level: Option<u64>) -> LevelFilter {
    match verbosity_level {
        None => LevelFilter::Off,
        Some(0) => LevelFilter::Warn,
        Some(1) => LevelFilter::Info,
        Some(2) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initializes logging to stderr for normal operation.
///
/// On failure, complains once on stderr and stays silent afterwards.
pub fn init_logging(verbosity_level: Option<u64>) {
    if let Err(err) = cute_log::init_with_max_level(level_for(verbosity_level)) {
        eprintln!(
            "Failed to initialize logging, no further log output will be shown. Error: {}",
            err
        )
    }
}

/// Initializes logging output for test builds, safe to call from
/// every test.
#[cfg(test)]
pub fn init_test_logging() {
    INIT_TEST_LOGGING.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    })
}

/// Logs the error with its whole chain of causes before the runner
/// exits with a failure status.
///
/// The backtrace goes to debug level.
pub fn log_fatal(error: &Error) {
    error!("Exiting due to fatal error: {}", error);
    for cause in error.iter_causes() {
        error!("Caused by: {}", cause);
    }
    debug!("Backtrace: {}", error.backtrace());
}
