use std::sync::{Mutex, PoisonError};

/// Flag asking the poller to stop, once set it stays set.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    requested: Mutex<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn request(&self) {
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn is_requested(&self) -> bool {
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
