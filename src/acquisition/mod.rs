//! Foreground side of the acquisition.
//!
//! Once the poller delivered a baseline reading, the loop ticks with a
//! fixed period: show the next stimulus and record it together with the
//! reading that is current at that moment. Readings may be stale, the
//! loop never waits for a fresh one.
mod samples;
mod timer;

pub use samples::SampleBuffer;
pub use timer::{Scheduler, Task, Timers};

use crate::session::Session;
use crate::stimulus::{Render, Stimuli};

use log::{info, trace, warn};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

pub struct AcquisitionLoop {
    session: Arc<Session>,
    stimuli: Box<dyn Stimuli>,
    renderer: Box<dyn Render>,
    period: Duration,
    samples: SampleBuffer,
}

impl AcquisitionLoop {
    pub fn new(
        session: &Arc<Session>,
        stimuli: Box<dyn Stimuli>,
        renderer: Box<dyn Render>,
        period: Duration,
    ) -> Self {
        AcquisitionLoop {
            session: Arc::clone(session),
            stimuli,
            renderer,
            period,
            samples: SampleBuffer::new(),
        }
    }

    /// Blocks until the first reading is available, then schedules the
    /// first tick right away.
    ///
    /// Call this only once the stimulus surface is up.
    pub fn start(this: &Rc<RefCell<Self>>, scheduler: &dyn Scheduler) {
        let baseline = this.borrow().session.wait_first_reading();
        info!("Baseline reading {}, starting acquisition.", baseline);
        Self::schedule_tick(this, scheduler, Duration::from_millis(0));
    }

    /// Like `start`, but gives up after `timeout` without scheduling
    /// anything.
    ///
    /// Returns whether acquisition was started.
    pub fn start_within(this: &Rc<RefCell<Self>>, scheduler: &dyn Scheduler, timeout: Duration) -> bool {
        let baseline = this.borrow().session.wait_first_reading_timeout(timeout);
        match baseline {
            Some(baseline) => {
                info!("Baseline reading {}, starting acquisition.", baseline);
                Self::schedule_tick(this, scheduler, Duration::from_millis(0));
                true
            }
            None => false,
        }
    }

    /// Asks the poller to release the instrument.
    ///
    /// Scheduled ticks keep running, the owner decides when to stop
    /// driving the scheduler.
    pub fn close(&self) {
        info!("Closing, requesting poller shutdown.");
        self.session.request_shutdown();
    }

    pub fn ticks(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn into_samples(self) -> SampleBuffer {
        self.samples
    }

    fn schedule_tick(this: &Rc<RefCell<Self>>, scheduler: &dyn Scheduler, delay: Duration) {
        let this = Rc::clone(this);
        scheduler.schedule_after(
            delay,
            Box::new(move |scheduler| {
                let period = {
                    let mut acquisition = this.borrow_mut();
                    acquisition.tick();
                    acquisition.period
                };
                Self::schedule_tick(&this, scheduler, period);
            }),
        );
    }

    fn tick(&mut self) {
        let reading = match self.session.latest() {
            Some(reading) => reading,
            None => {
                // only reachable if ticks got scheduled bypassing start
                warn!("No reading available yet, skipping tick.");
                return;
            }
        };

        let stimulus = self.stimuli.next_stimulus();
        self.samples.push(stimulus, reading);
        trace!("tick {}: gray {} at {}", self.samples.len(), stimulus.level(), reading);
        self.renderer.display(stimulus);
    }
}
