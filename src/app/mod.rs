mod builder;

use crate::acquisition::{AcquisitionLoop, SampleBuffer, Timers};
use crate::err::compound_result;
use crate::instrument::Connect;
use crate::persist::Persist;
use crate::poller::{Notice, Outcome, Poller};
use crate::result::Result;
use crate::session::Session;
use crate::stimulus::{Render, Stimuli};

use failure::format_err;
use log::{debug, info, warn};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use builder::Builder;

/// Longest the main loop sleeps before checking for termination.
const IDLE: Duration = Duration::from_millis(10);

/// Runs one acquisition: spawns the poller, drives the acquisition loop
/// until terminated or enough samples were taken, then shuts the poller
/// down and hands the samples to persistence.
pub struct App {
    connector: Box<dyn Connect>,
    notice: Box<dyn Notice>,
    stimuli: Box<dyn Stimuli>,
    renderer: Box<dyn Render>,
    sink: Box<dyn Persist>,
    period: Duration,
    sample_limit: Option<usize>,
    startup_timeout: Option<Duration>,
    shutdown_timeout: Duration,
    termination_flag: Arc<AtomicBool>,
}

type Shared = Rc<RefCell<AcquisitionLoop>>;

impl App {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Acquires until the termination flag is set, the sample limit is
    /// reached or the poller fails.
    ///
    /// Samples collected so far are persisted even if the poller failed,
    /// the failure is reported as an error afterwards. A run that took no
    /// samples leaves earlier dumps untouched.
    pub fn run(self) -> Result<SampleBuffer> {
        let App {
            connector,
            notice,
            stimuli,
            renderer,
            mut sink,
            period,
            sample_limit,
            startup_timeout,
            shutdown_timeout,
            termination_flag,
        } = self;

        let session = Session::new();
        let mut poller = Poller::spawn(&session, connector, notice)?;
        let acquisition: Shared = Rc::new(RefCell::new(AcquisitionLoop::new(
            &session, stimuli, renderer, period,
        )));
        let timers = Timers::new();
        let mut run = Run {
            acquisition: &acquisition,
            timers: &timers,
            poller: &mut poller,
            termination_flag: &termination_flag,
        };

        let result = run.start(startup_timeout).and_then(|started| {
            if started {
                run.drive(sample_limit)
            } else {
                Ok(())
            }
        });

        acquisition.borrow().close();
        await_poller(&mut poller, shutdown_timeout);

        // pending ticks hold on to the loop
        drop(timers);
        let samples = match Rc::try_unwrap(acquisition) {
            Ok(acquisition) => acquisition.into_inner().into_samples(),
            Err(shared) => {
                debug!("acquisition loop still shared, copying its samples");
                shared.borrow().samples().clone()
            }
        };

        info!("Collected {} samples.", samples.len());
        let persisted = if samples.is_empty() {
            info!("Nothing sampled, keeping previous dumps.");
            Ok(())
        } else {
            sink.persist(&samples)
        };

        compound_result(vec![result, persisted])?;
        Ok(samples)
    }
}

/// Borrows everything the main loop needs while acquiring.
struct Run<'a> {
    acquisition: &'a Shared,
    timers: &'a Timers,
    poller: &'a mut Poller,
    termination_flag: &'a AtomicBool,
}

impl<'a> Run<'a> {
    /// Waits for the first reading, staying responsive to termination.
    ///
    /// Returns `false` if terminated before acquisition could start.
    fn start(&mut self, timeout: Option<Duration>) -> Result<bool> {
        info!("Waiting for polarimeter to start up.");
        let begin = Instant::now();

        loop {
            if self.should_terminate() {
                info!("Terminated before the polarimeter delivered a reading.");
                return Ok(false);
            }
            if let Some(outcome) = self.poller.poll_stopped() {
                return Err(format_err!("Poller {} before the first reading", outcome));
            }
            if let Some(timeout) = timeout {
                if begin.elapsed() >= timeout {
                    return Err(format_err!(
                        "No polarimeter reading within {:?}",
                        timeout
                    ));
                }
            }

            if AcquisitionLoop::start_within(self.acquisition, self.timers, IDLE) {
                info!("Polarimeter start up finished.");
                return Ok(true);
            }
        }
    }

    fn drive(&mut self, sample_limit: Option<usize>) -> Result<()> {
        loop {
            if self.should_terminate() {
                info!("Termination requested.");
                return Ok(());
            }
            if let Some(limit) = sample_limit {
                if self.acquisition.borrow().ticks() >= limit {
                    debug!("took all {} samples", limit);
                    return Ok(());
                }
            }
            if let Some(outcome) = self.poller.poll_stopped() {
                return Err(format_err!("Poller {} during acquisition", outcome));
            }

            self.timers.run_due();
            self.timers.wait_due(IDLE);
        }
    }

    fn should_terminate(&self) -> bool {
        self.termination_flag.load(SeqCst)
    }
}

/// Gives the poller a bounded time to release the instrument.
fn await_poller(poller: &mut Poller, timeout: Duration) {
    match poller.await_stopped(timeout) {
        Some(Outcome::Shutdown) => debug!("poller stopped, polarimeter released"),
        Some(outcome) => debug!("poller {}", outcome),
        None => warn!(
            "Poller did not stop within {:?}, the polarimeter may not have been released.",
            timeout
        ),
    }
}
