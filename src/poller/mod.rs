//! Background thread owning the polarimeter.
//!
//! Connects with unlimited retries, then keeps publishing readings into
//! the session until shutdown is requested. Releasing the instrument is
//! confirmed through a one-shot channel, so the owner can wait for it.
mod notice;

pub use notice::{LogNotice, Notice, Prompt};

use crate::instrument::{self, Connect, Instrument};
use crate::result::Result;
use crate::session::{Phase, Session};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, error, info, warn};

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Device = Box<dyn Instrument + Send>;

/// How the poller thread ended.
#[derive(Debug)]
pub enum Outcome {
    /// Observed the shutdown request and released the instrument,
    /// if it ever got connected.
    Shutdown,
    /// Reading failed, the instrument was released and no further
    /// readings will be published.
    ReadFailed(instrument::Error),
    /// The thread went away without reporting, e.g. after a panic
    /// in the driver.
    Vanished,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Shutdown => write!(f, "stopped on request"),
            Outcome::ReadFailed(e) => write!(f, "stopped after failed reading: {}", e),
            Outcome::Vanished => write!(f, "terminated without reporting"),
        }
    }
}

/// Handle to the poller thread, used to observe its termination.
pub struct Poller {
    session: Arc<Session>,
    stopped: Receiver<Outcome>,
    outcome: Option<Outcome>,
    thread: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawns the poller thread, which starts connecting right away.
    pub fn spawn(
        session: &Arc<Session>,
        connector: Box<dyn Connect>,
        notice: Box<dyn Notice>,
    ) -> Result<Self> {
        let (tx, rx) = bounded(1);
        let thread_session = Arc::clone(session);
        let thread = thread::Builder::new()
            .name("poller".into())
            .spawn(move || run(thread_session, connector, notice, tx))?;

        Ok(Poller {
            session: Arc::clone(session),
            stopped: rx,
            outcome: None,
            thread: Some(thread),
        })
    }

    /// Checks without blocking whether the poller has stopped.
    pub fn poll_stopped(&mut self) -> Option<&Outcome> {
        if self.outcome.is_none() {
            let received = match self.stopped.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Outcome::Vanished),
            };
            if let Some(outcome) = received {
                self.finish(outcome);
            }
        }

        self.outcome.as_ref()
    }

    /// Waits at most `timeout` for the poller to stop.
    ///
    /// A read in progress is never interrupted, so a hanging instrument
    /// can make this time out even after shutdown has been requested.
    pub fn await_stopped(&mut self, timeout: Duration) -> Option<&Outcome> {
        if self.outcome.is_none() {
            let received = match self.stopped.recv_timeout(timeout) {
                Ok(outcome) => Some(outcome),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(Outcome::Vanished),
            };
            if let Some(outcome) = received {
                self.finish(outcome);
            }
        }

        self.outcome.as_ref()
    }

    pub fn phase(&mut self) -> Phase {
        if self.poll_stopped().is_some() {
            Phase::PollerStopped
        } else if self.session.shutdown_requested() {
            Phase::ShutdownRequested
        } else {
            Phase::Running
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        // the thread sends its outcome last, joining does not block for long
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Poller thread panicked.");
            }
        }
    }
}

fn run(
    session: Arc<Session>,
    mut connector: Box<dyn Connect>,
    mut notice: Box<dyn Notice>,
    stopped: Sender<Outcome>,
) {
    let outcome = match connect(&session, &mut *connector, &mut *notice) {
        Some(device) => keep_polling(&session, device),
        None => {
            debug!("shutdown requested before the polarimeter was connected");
            Outcome::Shutdown
        }
    };

    if stopped.send(outcome).is_err() {
        debug!("nobody waits for the poller to stop");
    }
}

/// Retries until connected, or returns `None` if shutdown was requested
/// before the device showed up.
fn connect(session: &Session, connector: &mut dyn Connect, notice: &mut dyn Notice) -> Option<Device> {
    let mut attempt: u64 = 1;
    loop {
        if session.shutdown_requested() {
            return None;
        }

        debug!("connecting to polarimeter, attempt {}", attempt);
        match connector.connect() {
            Ok(device) => {
                info!("Polarimeter connected after {} attempt(s).", attempt);
                return Some(device);
            }
            Err(e) => notice.device_not_found(&e),
        }

        attempt += 1;
    }
}

/// Publishes one reading per iteration until shutdown is requested
/// or a reading fails, then closes the device.
fn keep_polling(session: &Session, mut device: Device) -> Outcome {
    let outcome = loop {
        if session.shutdown_requested() {
            break Outcome::Shutdown;
        }

        match device.read() {
            Ok(reading) => session.publish(reading),
            Err(e) => {
                error!("Giving up on polarimeter after failed reading: {}", e);
                break Outcome::ReadFailed(e);
            }
        }
    };

    match device.close() {
        Ok(()) => debug!("polarimeter released"),
        Err(e) => warn!("Failed to release polarimeter: {}", e),
    }

    outcome
}
