//! Frame-counted countdown timer
//!
//! Shared by cooldowns, TTLs, invulnerability and the progression delays so that
//! every "N frames from now" uses the same off-by-one rules: a timer started with
//! `n` reports expiry on exactly the `n`-th `tick()`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// An expired timer
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    pub const fn new(frames: u32) -> Self {
        Self { remaining: frames }
    }

    /// Restart with `frames` remaining
    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    /// Lengthen to at least `frames` remaining, never shortens
    pub fn extend_to(&mut self, frames: u32) {
        self.remaining = self.remaining.max(frames);
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
    }

    /// Advance one frame. Returns true only on the frame the timer reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_nth_tick() {
        let mut timer = Countdown::new(3);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(timer.expired());
        // Stays expired without firing again
        assert!(!timer.tick());
    }

    #[test]
    fn test_idle_never_fires() {
        let mut timer = Countdown::idle();
        assert!(timer.expired());
        assert!(!timer.tick());
    }

    #[test]
    fn test_extend_to_never_shortens() {
        let mut timer = Countdown::new(100);
        timer.extend_to(24);
        assert_eq!(timer.remaining(), 100);
        timer.start(5);
        timer.extend_to(24);
        assert_eq!(timer.remaining(), 24);
    }

    #[test]
    fn test_cancel() {
        let mut timer = Countdown::new(45);
        assert!(timer.is_running());
        timer.cancel();
        assert!(timer.expired());
    }
}
