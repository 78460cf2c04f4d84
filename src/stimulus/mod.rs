//! What is shown on the stimulus monitor each tick.
//!
//! The full-screen surface itself is out of reach of this crate, `Render`
//! is the seam where a display backend plugs in.
mod noise;

pub use noise::WhiteNoise;

use log::trace;

/// Uniform gray level covering the whole stimulus monitor for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stimulus(u8);

impl Stimulus {
    pub fn gray(level: u8) -> Self {
        Stimulus(level)
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

/// Produces the stimulus for the next tick.
pub trait Stimuli {
    fn next_stimulus(&mut self) -> Stimulus;
}

/// Shows stimuli without blocking the acquisition schedule.
pub trait Render {
    fn display(&mut self, stimulus: Stimulus);
}

/// Renderer for headless runs, only traces what would be shown.
pub struct LogRender;

impl Render for LogRender {
    fn display(&mut self, stimulus: Stimulus) {
        trace!("showing gray level {}", stimulus.level());
    }
}
