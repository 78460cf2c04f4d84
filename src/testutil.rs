use crate::instrument::{Connect, Error, Instrument, Reading};
use crate::poller::Notice;
use crate::session::Session;
use crate::stimulus::{Render, Stimuli, Stimulus};

use crossbeam_channel::{unbounded, Receiver, Sender};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst};
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};

type Script = Result<Reading, Error>;

/// Polls the condition until it holds or the timeout expires.
pub fn eventually<F: FnMut() -> bool>(timeout: Duration, mut condition: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(1));
    }
    condition()
}

/// Counts what the poller did with the scripted device.
#[derive(Default)]
pub struct Tally {
    connects: AtomicUsize,
    reads: AtomicUsize,
    closes: AtomicUsize,
    reads_after_shutdown: AtomicUsize,
    published_before_connect: AtomicBool,
}

impl Tally {
    pub fn connects(&self) -> usize {
        self.connects.load(SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(SeqCst)
    }

    /// Reads that started while shutdown was already requested.
    pub fn reads_after_shutdown(&self) -> usize {
        self.reads_after_shutdown.load(SeqCst)
    }

    pub fn published_before_connect(&self) -> bool {
        self.published_before_connect.load(SeqCst)
    }
}

/// Test side of a scripted device, decides what each read returns.
pub struct Gate {
    script: Sender<Script>,
    entered: Receiver<()>,
    tally: Arc<Tally>,
}

impl Gate {
    pub fn tally(&self) -> Arc<Tally> {
        Arc::clone(&self.tally)
    }

    /// Lets one pending or future read return the value.
    pub fn feed(&self, value: f64) {
        self.script.send(Ok(Reading::new(value))).unwrap();
    }

    /// Lets one pending or future read fail.
    pub fn fail(&self, detail: &str) {
        self.script.send(Err(Error::read_failure(detail))).unwrap();
    }

    /// Waits until the device has entered one more read.
    pub fn await_read(&self, timeout: Duration) -> bool {
        self.entered.recv_timeout(timeout).is_ok()
    }
}

/// Connector that fails a given number of times, then hands out a
/// device blocking on reads until the `Gate` feeds them.
pub struct ScriptedConnector {
    session: Arc<Session>,
    failures: usize,
    device: Option<ScriptedDevice>,
}

impl ScriptedConnector {
    pub fn new(session: &Arc<Session>) -> (Self, Gate) {
        let (script_tx, script_rx) = unbounded();
        let (entered_tx, entered_rx) = unbounded();
        let tally = Arc::new(Tally::default());

        let device = ScriptedDevice {
            session: Arc::clone(session),
            script: script_rx,
            entered: entered_tx,
            tally: Arc::clone(&tally),
        };
        let connector = ScriptedConnector {
            session: Arc::clone(session),
            failures: 0,
            device: Some(device),
        };
        let gate = Gate {
            script: script_tx,
            entered: entered_rx,
            tally,
        };

        (connector, gate)
    }

    /// Like `new`, but the first `failures` connection attempts fail.
    pub fn failing_first(session: &Arc<Session>, failures: usize) -> (Self, Gate) {
        let (mut connector, gate) = Self::new(session);
        connector.failures = failures;
        (connector, gate)
    }
}

impl Connect for ScriptedConnector {
    fn connect(&mut self) -> Result<Box<dyn Instrument + Send>, Error> {
        let device = self
            .device
            .take()
            .expect("scripted device connected twice");
        device.tally.connects.fetch_add(1, SeqCst);
        if self.session.latest().is_some() {
            device.tally.published_before_connect.store(true, SeqCst);
        }

        if self.failures > 0 {
            self.failures -= 1;
            self.device = Some(device);
            Err(Error::device_not_found("scripted absence"))
        } else {
            Ok(Box::new(device))
        }
    }
}

struct ScriptedDevice {
    session: Arc<Session>,
    script: Receiver<Script>,
    entered: Sender<()>,
    tally: Arc<Tally>,
}

impl Instrument for ScriptedDevice {
    fn read(&mut self) -> Result<Reading, Error> {
        self.tally.reads.fetch_add(1, SeqCst);
        if self.session.shutdown_requested() {
            self.tally.reads_after_shutdown.fetch_add(1, SeqCst);
        }
        self.entered.send(()).ok();

        self.script
            .recv()
            .unwrap_or_else(|_| Err(Error::read_failure("script ended")))
    }

    fn close(self: Box<Self>) -> Result<(), Error> {
        self.tally.closes.fetch_add(1, SeqCst);
        Ok(())
    }
}

/// Notice that remembers how many connection attempts the device had
/// seen by the time each notice was raised.
#[derive(Clone)]
pub struct CountingNotice {
    tally: Arc<Tally>,
    connects_seen: Arc<Mutex<Vec<usize>>>,
}

impl CountingNotice {
    pub fn new(gate: &Gate) -> Self {
        CountingNotice {
            tally: gate.tally(),
            connects_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn notices(&self) -> usize {
        self.connects_seen.lock().unwrap().len()
    }

    /// Connection attempts made before each notice, in notice order.
    pub fn connects_seen(&self) -> Vec<usize> {
        self.connects_seen.lock().unwrap().clone()
    }
}

impl Notice for CountingNotice {
    fn device_not_found(&mut self, _error: &Error) {
        self.connects_seen
            .lock()
            .unwrap()
            .push(self.tally.connects());
    }
}

/// Gray levels 0, 1, 2, ... so ticks can be told apart.
#[derive(Default)]
pub struct Ramp(u8);

impl Stimuli for Ramp {
    fn next_stimulus(&mut self) -> Stimulus {
        let stimulus = Stimulus::gray(self.0);
        self.0 = self.0.wrapping_add(1);
        stimulus
    }
}

/// Remembers everything it was asked to display.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Stimulus>>>);

impl Recorder {
    pub fn shown(&self) -> Vec<Stimulus> {
        self.0.borrow().clone()
    }
}

impl Render for Recorder {
    fn display(&mut self, stimulus: Stimulus) {
        self.0.borrow_mut().push(stimulus);
    }
}
