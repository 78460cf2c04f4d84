//! Acquisition core for correlating a full-screen white noise stimulus
//! with polarimeter readings, used by the runner in `main.rs` and by the
//! headless integration tests.
//!
//! A background `Poller` keeps the latest instrument reading in a shared
//! `Session`, while the `AcquisitionLoop` samples it on a fixed period
//! from the main thread. `App` wires both together from a `Config`.

#[cfg(test)]
mod testutil;

mod err;
mod result;
mod util;

pub mod acquisition;
pub mod app;
pub mod config;
pub mod instrument;
pub mod log;
pub mod persist;
pub mod poller;
pub mod session;
pub mod stimulus;

pub use app::{App, Builder as AppBuilder};
pub use config::Config;
pub use instrument::Reading;
pub use session::{Phase, Session};
