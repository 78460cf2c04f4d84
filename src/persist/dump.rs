use super::Persist;
use crate::acquisition::SampleBuffer;
use crate::err::compound_result;
use crate::result::Result;

use log::info;

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Shown gray levels, one per line, named after the histogram
/// that is usually plotted from it.
pub const STIMULI_FILE: &str = "histogram.txt";
/// Azimuth readings in degrees, one per line.
pub const READINGS_FILE: &str = "azimuth.txt";

/// Writes stimuli and readings as two plain text columns into a
/// directory, using the `%.18e` notation most plotting tools read.
pub struct TextDump {
    dir: PathBuf,
}

impl TextDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TextDump { dir: dir.into() }
    }

    pub fn stimuli_path(&self) -> PathBuf {
        self.dir.join(STIMULI_FILE)
    }

    pub fn readings_path(&self) -> PathBuf {
        self.dir.join(READINGS_FILE)
    }
}

impl Persist for TextDump {
    fn persist(&mut self, samples: &SampleBuffer) -> Result<()> {
        create_dir_all(&self.dir)?;

        let stimuli_path = self.stimuli_path();
        let readings_path = self.readings_path();
        let stimuli = samples.stimuli().iter().map(|s| f64::from(s.level()));
        let readings = samples.readings().iter().map(|r| r.value());

        compound_result(vec![
            write_column(&stimuli_path, stimuli),
            write_column(&readings_path, readings),
        ])?;

        info!(
            "Wrote {} samples to {} and {}.",
            samples.len(),
            stimuli_path.display(),
            readings_path.display()
        );
        Ok(())
    }
}

fn write_column(path: &Path, values: impl Iterator<Item = f64>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for value in values {
        writeln!(out, "{}", scientific(value))?;
    }
    out.flush()?;
    Ok(())
}

/// Formats like printf's `%.18e`, e.g. `1.270000000000000000e+02`.
fn scientific(value: f64) -> String {
    let formatted = format!("{:.18e}", value);
    match formatted.find('e') {
        Some(idx) => {
            let (mantissa, exponent) = formatted.split_at(idx);
            // rust never emits a '+' and no padding
            let exponent: i32 = exponent[1..].parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        // inf and NaN have no exponent
        None => formatted,
    }
}
