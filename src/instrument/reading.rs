use std::fmt;

/// One scalar sample from the polarimeter, the azimuth of the
/// polarization ellipse in degrees.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Reading(f64);

impl Reading {
    pub fn new(value: f64) -> Self {
        Reading(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}°", self.0)
    }
}
