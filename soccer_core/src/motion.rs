//! Smoothed travel direction and speed of the ball.
//!
//! Detection is noisy: the centroid of an organism wobbles by a few pixels from
//! frame to frame. Direction is the average of per-hop unit vectors, so every hop
//! counts the same regardless of its length. Speed is estimated over a longer
//! window that drops tracking jumps.

use glam::Vec2;
use std::collections::VecDeque;

use crate::config::Config;

/// Result of recording one tracked position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// New smoothed direction, if it could be computed this frame.
    pub direction: Option<Vec2>,
    /// True if the step from the previous position was treated as a tracking jump.
    pub discontinuous: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MotionHistory {
    positions: VecDeque<Vec2>,
    speed_positions: VecDeque<Vec2>,
    speed_vector: Vec2,
    speed: f32,
}

impl MotionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.speed_positions.clear();
        self.speed_vector = Vec2::ZERO;
        self.speed = 0.0;
    }

    /// Zero the speed estimate but keep the direction history.
    pub fn zero_speed(&mut self) {
        self.speed_vector = Vec2::ZERO;
        self.speed = 0.0;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Speed in display units (um/s on the scale bar).
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Record the ball's new tracked position and update both estimates.
    pub fn record(&mut self, pos: Vec2, config: &Config) -> MotionSample {
        let discontinuous = self
            .positions
            .back()
            .is_some_and(|last| last.distance(pos) > config.discontinuity_threshold);

        if discontinuous {
            self.speed_positions.clear();
            if config.discontinuity_filters_direction {
                self.positions.clear();
            }
        } else {
            self.speed_positions.push_back(pos);
        }

        self.positions.push_back(pos);
        while self.positions.len() > config.direction_window {
            self.positions.pop_front();
        }

        let direction = smoothed_direction(&self.positions);
        self.update_speed(pos, config);

        MotionSample {
            direction,
            discontinuous,
        }
    }

    fn update_speed(&mut self, pos: Vec2, config: &Config) {
        while self.speed_positions.len() > config.speed_window {
            self.speed_positions.pop_front();
        }

        let n = self.speed_positions.len();
        if n == 0 {
            // Restart after a jump from the current position.
            self.speed_positions.push_back(pos);
            return;
        }
        if n <= config.speed_skip_hops + 1 {
            return;
        }

        let hops = self
            .speed_positions
            .iter()
            .zip(self.speed_positions.iter().skip(1))
            .skip(config.speed_skip_hops)
            .map(|(a, b)| *b - *a);
        for hop in hops {
            self.speed_vector += hop;
        }

        self.speed_vector /= n as f32;
        self.speed = config.velocity_scale * self.speed_vector.length();
    }
}

/// Average of per-hop unit vectors, re-normalized.
///
/// `None` when there are fewer than two positions or the hops cancel out.
pub fn smoothed_direction(positions: &VecDeque<Vec2>) -> Option<Vec2> {
    if positions.len() < 2 {
        return None;
    }

    let hops = positions.len() - 1;
    let sum: Vec2 = positions
        .iter()
        .zip(positions.iter().skip(1))
        .map(|(a, b)| (*b - *a).normalize_or_zero())
        .sum();

    let avg = (sum / hops as f32).normalize_or_zero();
    if avg == Vec2::ZERO {
        None
    } else {
        Some(avg)
    }
}

/// Truncate to two decimals, as shown on screen.
pub fn round_down_2(value: f32) -> f32 {
    (value * 100.0).trunc() / 100.0
}
