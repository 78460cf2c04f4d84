use super::{Connect, Error, Instrument, Reading, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread::sleep;
use std::time::Duration;

/// Azimuth is reported in `[-AZIMUTH_LIMIT, AZIMUTH_LIMIT]` degrees.
const AZIMUTH_LIMIT: f64 = 90.0;
/// Largest change of azimuth between two consecutive readings.
const MAX_STEP: f64 = 0.5;

/// Connects to a simulated polarimeter, optionally pretending the
/// device is missing for the first few attempts.
pub struct Simulated {
    connect_failures: u32,
    read_latency: Duration,
    seed: Option<u64>,
}

impl Simulated {
    pub fn new(read_latency: Duration) -> Self {
        Simulated {
            connect_failures: 0,
            read_latency,
            seed: None,
        }
    }

    /// Lets the given amount of connection attempts fail before
    /// the simulated device shows up.
    pub fn failing_first(mut self, attempts: u32) -> Self {
        self.connect_failures = attempts;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Connect for Simulated {
    fn connect(&mut self) -> Result<Box<dyn Instrument + Send>> {
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(Error::device_not_found(format!(
                "simulated device absent, {} more attempt(s) will fail",
                self.connect_failures
            )));
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Box::new(SimulatedPolarimeter {
            rng,
            azimuth: 0.0,
            read_latency: self.read_latency,
        }))
    }
}

/// Random walk of azimuth values, taking `read_latency` per reading.
pub struct SimulatedPolarimeter {
    rng: StdRng,
    azimuth: f64,
    read_latency: Duration,
}

impl Instrument for SimulatedPolarimeter {
    fn read(&mut self) -> Result<Reading> {
        if self.read_latency > Duration::from_millis(0) {
            sleep(self.read_latency);
        }

        let step = self.rng.gen_range(-MAX_STEP, MAX_STEP);
        self.azimuth = (self.azimuth + step).max(-AZIMUTH_LIMIT).min(AZIMUTH_LIMIT);

        Ok(Reading::new(self.azimuth))
    }

    fn close(self: Box<Self>) -> Result<()> {
        debug!("simulated polarimeter released");
        Ok(())
    }
}
