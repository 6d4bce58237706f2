//! Button sampling and press detection

use crate::sim::TickInput;

/// Instantaneous state of the two buttons (`true` = held down)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    pub primary: bool,
    pub secondary: bool,
}

impl ButtonLevels {
    /// Decode active-low pin readings (a low pin means pressed)
    pub fn from_active_low(primary_pin_high: bool, secondary_pin_high: bool) -> Self {
        Self {
            primary: !primary_pin_high,
            secondary: !secondary_pin_high,
        }
    }
}

/// Source of raw button levels
pub trait Buttons {
    fn sample(&mut self) -> ButtonLevels;
}

impl<F: FnMut() -> ButtonLevels> Buttons for F {
    fn sample(&mut self) -> ButtonLevels {
        self()
    }
}

/// One-bit debounce latch. Turns held buttons into single presses: at most
/// one press per tick, and nothing more until both buttons are released.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLatch {
    held: bool,
}

impl ButtonLatch {
    pub fn sample(&mut self, levels: ButtonLevels) -> TickInput {
        let mut input = TickInput::default();

        if !levels.primary && !levels.secondary {
            self.held = false;
            return input;
        }
        if self.held {
            return input;
        }

        self.held = true;
        // Secondary wins when both go down in the same tick
        if levels.secondary {
            input.secondary = true;
        } else {
            input.primary = true;
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: ButtonLevels = ButtonLevels {
        primary: true,
        secondary: false,
    };
    const SECONDARY: ButtonLevels = ButtonLevels {
        primary: false,
        secondary: true,
    };
    const BOTH: ButtonLevels = ButtonLevels {
        primary: true,
        secondary: true,
    };
    const NONE: ButtonLevels = ButtonLevels {
        primary: false,
        secondary: false,
    };

    #[test]
    fn test_hold_fires_once() {
        let mut latch = ButtonLatch::default();
        assert_eq!(latch.sample(PRIMARY), TickInput::primary());
        for _ in 0..10 {
            assert!(!latch.sample(PRIMARY).any());
        }
        assert!(!latch.sample(NONE).any());
        assert_eq!(latch.sample(PRIMARY), TickInput::primary());
    }

    #[test]
    fn test_rearms_only_when_both_released() {
        let mut latch = ButtonLatch::default();
        assert_eq!(latch.sample(SECONDARY), TickInput::secondary());
        // Switching to the other button while still holding does nothing
        assert!(!latch.sample(BOTH).any());
        assert!(!latch.sample(PRIMARY).any());
        assert!(!latch.sample(NONE).any());
        assert_eq!(latch.sample(PRIMARY), TickInput::primary());
    }

    #[test]
    fn test_simultaneous_press_is_secondary() {
        let mut latch = ButtonLatch::default();
        assert_eq!(latch.sample(BOTH), TickInput::secondary());
    }

    #[test]
    fn test_active_low_decoding() {
        assert_eq!(ButtonLevels::from_active_low(false, true), PRIMARY);
        assert_eq!(ButtonLevels::from_active_low(true, true), NONE);
    }

    #[test]
    fn test_closure_buttons() {
        let mut pins = || SECONDARY;
        assert_eq!(pins.sample(), SECONDARY);
    }
}
