//! Hands the finished sample buffer over to storage.
mod dump;

pub use dump::{TextDump, READINGS_FILE, STIMULI_FILE};

use crate::acquisition::SampleBuffer;
use crate::result::Result;

/// Receives all samples at once after acquisition stopped.
pub trait Persist {
    fn persist(&mut self, samples: &SampleBuffer) -> Result<()>;
}
