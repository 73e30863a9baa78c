//! Points accumulator with an escalating capture streak.

use serde::{Deserialize, Serialize};

/// Reward for the first capture in a power-mode window.
pub const BASE_CAPTURE_POINTS: u64 = 200;

/// Highest streak value; captures beyond it keep paying the capped reward.
pub const MAX_CAPTURE_STREAK: u32 = 3;

/// Current game score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    value: u64,
    high_score: u64,
    capture_streak: u32,
}

impl Score {
    /// Fresh score with a previously loaded high score.
    #[must_use]
    pub const fn with_high_score(high_score: u64) -> Self {
        Self {
            value: 0,
            high_score,
            capture_streak: 0,
        }
    }

    /// Points earned so far.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Best score known to this game.
    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Captures so far in the current power-mode window, capped.
    #[must_use]
    pub const fn capture_streak(&self) -> u32 {
        self.capture_streak
    }

    /// Add flat points.
    pub fn add(&mut self, points: u64) {
        self.value += points;
    }

    /// Reward the next capture would pay.
    #[must_use]
    pub const fn next_capture_points(&self) -> u64 {
        BASE_CAPTURE_POINTS << self.capture_streak
    }

    /// Award a capture (200, 400, 800, then 1600 for every further
    /// capture) and advance the streak. Returns the points awarded.
    pub fn add_capture_points(&mut self) -> u64 {
        let points = self.next_capture_points();
        self.value += points;
        if self.capture_streak < MAX_CAPTURE_STREAK {
            self.capture_streak += 1;
        }
        points
    }

    /// Zero the streak. Called when power mode ends.
    pub fn reset_streak(&mut self) {
        self.capture_streak = 0;
    }

    /// Promote the current value to high score if it beats it.
    ///
    /// Returns `true` if the high score changed.
    pub fn settle_high_score(&mut self) -> bool {
        if self.value > self.high_score {
            self.high_score = self.value;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sequence_caps_at_1600() {
        let mut score = Score::default();
        let rewards: Vec<u64> = (0..6).map(|_| score.add_capture_points()).collect();
        assert_eq!(rewards, vec![200, 400, 800, 1600, 1600, 1600]);
        assert_eq!(score.capture_streak(), MAX_CAPTURE_STREAK);
        assert_eq!(score.value(), 200 + 400 + 800 + 1600 * 3);
    }

    #[test]
    fn test_reset_streak_restarts_sequence() {
        let mut score = Score::default();
        score.add_capture_points();
        score.add_capture_points();
        score.reset_streak();
        assert_eq!(score.capture_streak(), 0);
        assert_eq!(score.add_capture_points(), 200);
        assert_eq!(score.value(), 800);
    }

    #[test]
    fn test_settle_high_score() {
        let mut score = Score::with_high_score(100);
        score.add(90);
        assert!(!score.settle_high_score());
        assert_eq!(score.high_score(), 100);

        score.add(10);
        assert!(!score.settle_high_score());

        score.add(1);
        assert!(score.settle_high_score());
        assert_eq!(score.high_score(), 101);
    }
}
