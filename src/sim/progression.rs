//! Round progression: score, lives, wave counter and the between-state timers
//!
//! ```text
//! Title --start--> Playing <--> WaveCleared
//!                     |
//!                     +-- last life lost --> GameOver --start--> Playing
//! ```

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::timer::Countdown;
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start signal
    Title,
    /// Active gameplay
    Playing,
    /// Banner pause between clearing a wave and spawning the next
    WaveCleared,
    /// Out of lives; the field keeps drifting until restart
    GameOver,
}

impl GamePhase {
    /// A round is in progress (timers run, the ship can be hit)
    pub fn in_round(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::WaveCleared)
    }

    /// The start signal begins a new round
    pub fn awaits_start(self) -> bool {
        matches!(self, GamePhase::Title | GamePhase::GameOver)
    }
}

/// Timers that expired this frame and need the game state to act
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerExpiry {
    /// Respawn delay elapsed with lives left
    pub respawn: bool,
    /// Wave-clear pause elapsed; the wave counter has not moved yet
    pub next_wave: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub phase: GamePhase,
    /// Never decreases within a round
    pub score: u64,
    pub lives: u8,
    /// 0 until the first wave spawns
    pub wave: u32,
    pub initial_lives: u8,
    pub respawn_timer: Countdown,
    pub wave_clear_timer: Countdown,
    respawn_delay: u32,
    wave_clear_delay: u32,
    /// Start signal level on the previous frame, for edge detection
    pub start_held: bool,
}

impl Progression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Title,
            score: 0,
            lives: config.initial_lives,
            wave: 0,
            initial_lives: config.initial_lives,
            respawn_timer: Countdown::idle(),
            wave_clear_timer: Countdown::idle(),
            // A zero-length countdown would never fire
            respawn_delay: config.respawn_delay.max(1),
            wave_clear_delay: config.wave_clear_delay.max(1),
            start_held: false,
        }
    }

    /// Record the start signal level; true on a released-to-pressed transition
    pub fn start_edge(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.start_held;
        self.start_held = pressed;
        edge
    }

    /// Fresh round: score 0, full lives, wave 0, no timers
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.initial_lives;
        self.wave = 0;
        self.respawn_timer.cancel();
        self.wave_clear_timer.cancel();
    }

    /// Move to the next wave and return its number
    pub fn advance_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.wave
    }

    /// Add points, saturating. Zero deltas are not announced.
    pub fn add_score(&mut self, delta: u64, events: &mut Vec<GameEvent>) {
        if delta == 0 {
            return;
        }
        self.score = self.score.saturating_add(delta);
        events.push(GameEvent::ScoreChanged {
            score: self.score,
            delta,
        });
    }

    /// The ship was destroyed. Returns true if that ended the round.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.phase.in_round() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost {
            lives_remaining: self.lives,
        });

        if self.lives > 0 {
            log::info!("Ship lost, {} lives left", self.lives);
            self.respawn_timer.start(self.respawn_delay);
            return false;
        }

        log::info!("Game over: score {} on wave {}", self.score, self.wave);
        self.phase = GamePhase::GameOver;
        self.respawn_timer.cancel();
        self.wave_clear_timer.cancel();
        events.push(GameEvent::GameOver {
            score: self.score,
            wave: self.wave,
        });
        true
    }

    /// Advance the respawn and wave-clear timers by one frame
    pub fn tick_timers(&mut self) -> TimerExpiry {
        let mut expiry = TimerExpiry::default();
        if !self.phase.in_round() {
            return expiry;
        }
        if self.respawn_timer.tick() && self.lives > 0 {
            expiry.respawn = true;
        }
        if self.wave_clear_timer.tick() && self.phase == GamePhase::WaveCleared {
            self.phase = GamePhase::Playing;
            expiry.next_wave = true;
        }
        expiry
    }

    #[inline]
    pub fn respawn_pending(&self) -> bool {
        self.respawn_timer.is_running()
    }

    /// Enter the wave-clear pause when the field is empty and no respawn is
    /// pending. Returns true on the transition.
    pub fn check_wave_cleared(&mut self, asteroids: usize, events: &mut Vec<GameEvent>) -> bool {
        if self.phase != GamePhase::Playing || asteroids > 0 || self.respawn_pending() {
            return false;
        }
        log::info!("Wave {} cleared", self.wave);
        self.phase = GamePhase::WaveCleared;
        self.wave_clear_timer.start(self.wave_clear_delay);
        events.push(GameEvent::WaveCleared { wave: self.wave });
        true
    }
}
