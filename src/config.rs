//! Run settings, loaded from YAML and overridden from the command line.
use crate::result::Result;
use crate::util::time::{period_for_fps, to_duration, to_timeout};

use serde::Deserialize;
use serde_yaml::from_reader;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stimulus frames per second, at most 60.
    pub fps: f64,
    /// Directory receiving the sample dumps.
    pub output: PathBuf,
    /// Stop after this many ticks, run until terminated if `None`.
    pub samples: Option<usize>,
    /// Seed for the white noise, random if `None`.
    pub seed: Option<u64>,
    /// Ask on the terminal before retrying a missing device.
    pub prompt: bool,
    /// Seconds to wait for the first reading, forever if `None`.
    pub startup_timeout: Option<f64>,
    /// Seconds to wait for the poller to release the device on exit.
    pub shutdown_timeout: f64,
    pub simulation: Simulation,
}

/// Behaviour of the simulated polarimeter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    /// Seconds a single reading takes.
    pub read_latency: f64,
    /// Connection attempts failing before the device shows up.
    pub connect_failures: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fps: 10.0,
            output: PathBuf::from("."),
            samples: None,
            seed: None,
            prompt: true,
            startup_timeout: None,
            shutdown_timeout: 2.0,
            simulation: Default::default(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation {
            read_latency: 0.05,
            connect_failures: 0,
        }
    }
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(from_reader(file)?)
    }

    pub fn from_str(source: impl AsRef<str>) -> Result<Self> {
        Ok(serde_yaml::from_str(source.as_ref())?)
    }

    pub fn period(&self) -> Result<Duration> {
        period_for_fps(self.fps)
    }

    pub fn startup_timeout(&self) -> Result<Option<Duration>> {
        self.startup_timeout.map(to_timeout).transpose()
    }

    pub fn shutdown_timeout(&self) -> Result<Duration> {
        to_timeout(self.shutdown_timeout)
    }

    pub fn read_latency(&self) -> Result<Duration> {
        to_duration(self.simulation.read_latency)
    }

    /// Checks all derived values at once so a bad file fails before
    /// anything is spawned.
    pub fn validate(&self) -> Result<()> {
        self.period()?;
        self.startup_timeout()?;
        self.shutdown_timeout()?;
        self.read_latency()?;
        Ok(())
    }
}
