//! State shared between the background poller and the acquisition loop.
//!
//! The latest reading and the shutdown request are guarded separately
//! and no code path ever holds both locks at once.
mod cell;
mod shutdown;

pub use cell::ReadingCell;
pub use shutdown::ShutdownSignal;

use crate::instrument::Reading;
use std::sync::Arc;
use std::time::Duration;

/// One acquisition session, shared through `Arc` by the poller thread and
/// the foreground loop.
#[derive(Debug, Default)]
pub struct Session {
    reading: ReadingCell,
    shutdown: ShutdownSignal,
}

/// Progress of the shutdown handshake between loop and poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Poller is connecting or polling, no shutdown requested.
    Running,
    /// Shutdown was requested but the poller did not confirm yet.
    ShutdownRequested,
    /// The poller released the instrument and terminated.
    PollerStopped,
}

impl Session {
    pub fn new() -> Arc<Self> {
        Arc::new(Default::default())
    }

    pub fn publish(&self, reading: Reading) {
        self.reading.publish(reading)
    }

    pub fn latest(&self) -> Option<Reading> {
        self.reading.latest()
    }

    pub fn wait_first_reading(&self) -> Reading {
        self.reading.wait_first()
    }

    pub fn wait_first_reading_timeout(&self, timeout: Duration) -> Option<Reading> {
        self.reading.wait_first_timeout(timeout)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request()
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.is_requested()
    }
}
