//! Boundary to the polarimeter driver.
//!
//! The core only needs to connect, take single blocking readings and
//! release the device again. Wire protocols live behind `Connect` and
//! `Instrument`, the crate itself only ships a simulation.
mod err;
mod reading;
mod sim;

pub use err::Error;
pub use reading::Reading;
pub use sim::{Simulated, SimulatedPolarimeter};

type Result<T> = std::result::Result<T, Error>;

/// Opens connections to a measuring device.
///
/// Connecting may be attempted any number of times, a failed attempt
/// leaves the connector usable for the next one.
pub trait Connect: Send {
    fn connect(&mut self) -> Result<Box<dyn Instrument + Send>>;
}

/// A live connection to a measuring device.
pub trait Instrument {
    /// Blocks until the device has produced one reading.
    fn read(&mut self) -> Result<Reading>;

    /// Releases the device.
    ///
    /// Consumes the handle, so a connection cannot be closed twice.
    fn close(self: Box<Self>) -> Result<()>;
}
