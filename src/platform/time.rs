//! Monotonic millisecond clocks

use std::time::Instant;

/// A monotonic, non-decreasing millisecond counter
pub trait Clock {
    fn now_ms(&mut self) -> u64;
}

/// Host clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Widens a 32-bit hardware millisecond counter, which wraps after about
/// 49.7 days, into a `u64` that never goes backwards.
///
/// Must be polled at least once per wrap period.
#[derive(Debug, Clone)]
pub struct WrappingClock<F: FnMut() -> u32> {
    read: F,
    last: u32,
    wraps: u64,
}

impl<F: FnMut() -> u32> WrappingClock<F> {
    pub fn new(mut read: F) -> Self {
        let last = read();
        Self {
            read,
            last,
            wraps: 0,
        }
    }
}

impl<F: FnMut() -> u32> Clock for WrappingClock<F> {
    fn now_ms(&mut self) -> u64 {
        let raw = (self.read)();
        if raw < self.last {
            self.wraps += 1;
        }
        self.last = raw;
        (self.wraps << 32) | raw as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_wrapping_clock_survives_overflow() {
        let raw = Cell::new(u32::MAX - 10);
        let mut clock = WrappingClock::new(|| raw.get());

        let before = clock.now_ms();
        raw.set(5);
        let after = clock.now_ms();

        assert_eq!(before, (u32::MAX - 10) as u64);
        assert_eq!(after, (1u64 << 32) + 5);
        assert_eq!(after - before, 16);
    }

    #[test]
    fn test_wrapping_clock_is_non_decreasing() {
        let raw = Cell::new(0u32);
        let mut clock = WrappingClock::new(|| raw.get());
        let mut last = 0;
        for step in [1_000u32, 2_000_000_000, 4_000_000_000, 100, 100, 3_000_000_000, 7] {
            raw.set(step);
            let now = clock.now_ms();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_system_clock_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
