use crate::instrument::Reading;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Single slot holding the most recently published reading.
///
/// Readers always get a copy. Waiters for the first reading are woken
/// on every publish through a condition variable paired with the slot.
#[derive(Debug, Default)]
pub struct ReadingCell {
    value: Mutex<Option<Reading>>,
    published: Condvar,
}

impl ReadingCell {
    pub fn new() -> Self {
        Default::default()
    }

    /// Overwrites the current value.
    pub fn publish(&self, reading: Reading) {
        *self.slot() = Some(reading);
        self.published.notify_all();
    }

    /// Latest published reading, or `None` if nothing was ever published.
    pub fn latest(&self) -> Option<Reading> {
        *self.slot()
    }

    /// Blocks until at least one reading was published and returns the
    /// latest one.
    pub fn wait_first(&self) -> Reading {
        let mut slot = self.slot();
        loop {
            if let Some(reading) = *slot {
                return reading;
            }
            slot = self
                .published
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like `wait_first`, but gives up after `timeout`.
    pub fn wait_first_timeout(&self, timeout: Duration) -> Option<Reading> {
        let (slot, _) = self
            .published
            .wait_timeout_while(self.slot(), timeout, |value| value.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        *slot
    }

    /// The guarded data is a plain copy type, a panic elsewhere cannot
    /// leave it half written, so poisoning is ignored.
    fn slot(&self) -> MutexGuard<Option<Reading>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn initially_absent() {
        assert_eq!(ReadingCell::new().latest(), None);
    }

    #[test]
    fn latest_is_last_published() {
        // given
        let cell = ReadingCell::new();

        // when
        cell.publish(Reading::new(1.0));
        cell.publish(Reading::new(2.0));

        // then
        assert_eq!(cell.latest(), Some(Reading::new(2.0)));
        assert_eq!(cell.latest(), Some(Reading::new(2.0)));
    }

    #[test]
    fn wait_first_returns_immediately_when_published() {
        let cell = ReadingCell::new();
        cell.publish(Reading::new(4.0));

        assert_eq!(cell.wait_first(), Reading::new(4.0));
    }

    #[test]
    fn wait_first_wakes_up_on_publish_from_other_thread() {
        // given
        let cell = Arc::new(ReadingCell::new());
        let publisher = Arc::clone(&cell);

        // when
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            publisher.publish(Reading::new(12.5));
        });
        let first = cell.wait_first();

        // then
        assert_eq!(first, Reading::new(12.5));
        handle.join().unwrap();
    }

    #[test]
    fn wait_first_timeout_gives_up_on_absent_value() {
        let cell = ReadingCell::new();
        let start = Instant::now();

        let result = cell.wait_first_timeout(Duration::from_millis(30));

        assert_eq!(result, None);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn readers_never_observe_torn_values() {
        // given
        let cell = Arc::new(ReadingCell::new());
        let writer_cell = Arc::clone(&cell);
        // only ever writes values where both halves of the bit pattern match
        let pattern = |n: u32| f64::from_bits(((n as u64) << 32) | n as u64);

        // when
        let writer = thread::spawn(move || {
            for n in 1..20_000u32 {
                writer_cell.publish(Reading::new(pattern(n)));
            }
        });

        // then
        let mut observed = 0;
        while observed < 20_000 {
            if let Some(reading) = cell.latest() {
                let bits = reading.value().to_bits();
                assert_eq!(bits >> 32, bits & 0xffff_ffff, "torn reading {:x}", bits);
            }
            observed += 1;
        }
        writer.join().unwrap();
    }
}
