use crate::instrument::Reading;
use crate::stimulus::Stimulus;

/// Everything recorded during acquisition, one entry per tick.
///
/// Stimuli and readings are kept in two columns of equal length, the
/// n-th reading was current while the n-th stimulus was shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffer {
    stimuli: Vec<Stimulus>,
    readings: Vec<Reading>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, stimulus: Stimulus, reading: Reading) {
        self.stimuli.push(stimulus);
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn stimuli(&self) -> &[Stimulus] {
        &self.stimuli
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }
}
