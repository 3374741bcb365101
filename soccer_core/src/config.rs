use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::field::Field;
use crate::params::Params;

/// How the ball travels while passed or bounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassMode {
    /// Fixed distance split over a fixed number of frames.
    FrameStepped,
    /// Fixed speed for a fixed duration, scaled by each tick's dt.
    TimeStepped,
}

/// Game configuration. Fixed once the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub turn_duration_ms: u64,
    pub turns_per_game: u32,
    pub swap_duration_ms: u64,
    pub ball_radius: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    pub goal_offset: f32,
    pub goal_arm_thickness: f32,
    pub bounds_buffer: f32,
    pub bounce_buffer: f32,
    pub direction_window: usize,
    pub speed_window: usize,
    pub speed_skip_hops: usize,
    pub discontinuity_threshold: f32,
    pub velocity_scale: f32,
    pub pass_mode: PassMode,
    pub frames_per_pass: u32,
    pub pass_distance: f32,
    pub frames_per_bounce: u32,
    pub bounce_distance: f32,
    pub pass_duration_ms: u64,
    pub pass_speed: f32,
    pub bounce_duration_ms: u64,
    pub bounce_speed: f32,
    pub carry_points: u32,
    pub pass_points: u32,
    pub pickup_penalty: u32,
    /// Scoring leaves the turn with the scorer unless this is set.
    pub goal_changes_turn: bool,
    /// Jump frames are also kept out of the direction history when set.
    pub discontinuity_filters_direction: bool,
    pub winning_score: Option<u32>,
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            turn_duration_ms: Params::TURN_DURATION_MS,
            turns_per_game: Params::TURNS_PER_GAME,
            swap_duration_ms: Params::SWAP_DURATION_MS,
            ball_radius: Params::BALL_RADIUS,
            goal_width: Params::GOAL_WIDTH,
            goal_height: Params::GOAL_HEIGHT,
            goal_offset: Params::GOAL_OFFSET,
            goal_arm_thickness: Params::GOAL_ARM_THICKNESS,
            bounds_buffer: Params::BOUNDS_BUFFER,
            bounce_buffer: Params::BOUNCE_BUFFER,
            direction_window: Params::DIRECTION_WINDOW,
            speed_window: Params::SPEED_WINDOW,
            speed_skip_hops: Params::SPEED_SKIP_HOPS,
            discontinuity_threshold: Params::DISCONTINUITY_THRESHOLD,
            velocity_scale: Params::VELOCITY_SCALE,
            pass_mode: PassMode::FrameStepped,
            frames_per_pass: Params::FRAMES_PER_PASS,
            pass_distance: Params::PASS_DISTANCE,
            frames_per_bounce: Params::FRAMES_PER_BOUNCE,
            bounce_distance: Params::BOUNCE_DISTANCE,
            pass_duration_ms: Params::PASS_DURATION_MS,
            pass_speed: Params::PASS_SPEED,
            bounce_duration_ms: Params::BOUNCE_DURATION_MS,
            bounce_speed: Params::BOUNCE_SPEED,
            carry_points: Params::CARRY_POINTS,
            pass_points: Params::PASS_POINTS,
            pickup_penalty: Params::PICKUP_PENALTY,
            goal_changes_turn: false,
            discontinuity_filters_direction: false,
            winning_score: None,
            rng_seed: Params::RNG_SEED,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_millis(self.turn_duration_ms)
    }

    pub fn swap_duration(&self) -> Duration {
        Duration::from_millis(self.swap_duration_ms)
    }

    pub fn pass_duration(&self) -> Duration {
        Duration::from_millis(self.pass_duration_ms)
    }

    pub fn bounce_duration(&self) -> Duration {
        Duration::from_millis(self.bounce_duration_ms)
    }

    /// Check that this configuration can run on the given field.
    pub fn validate(&self, field: &Field) -> Result<(), ConfigError> {
        at_least("turns_per_game", self.turns_per_game as f64, 1.0)?;
        at_least("turn_duration_ms", self.turn_duration_ms as f64, 1.0)?;
        at_least("direction_window", self.direction_window as f64, 2.0)?;
        at_least("speed_window", self.speed_window as f64, 2.0)?;
        at_least("frames_per_pass", self.frames_per_pass as f64, 1.0)?;
        at_least("frames_per_bounce", self.frames_per_bounce as f64, 1.0)?;
        at_least("ball_radius", self.ball_radius as f64, 1.0)?;
        at_least("bounds_buffer", self.bounds_buffer as f64, 0.0)?;
        at_least("goal_arm_thickness", self.goal_arm_thickness as f64, 0.0)?;

        let (w, h) = (field.width as f32, field.height as f32);
        let edge = self.bounds_buffer.max(self.bounce_buffer);
        if w <= 2.0 * edge || h <= 2.0 * edge {
            return Err(ConfigError::FieldTooSmall {
                width: field.width,
                height: field.height,
                buffer: edge,
            });
        }

        if self.goal_width <= 0.0
            || self.goal_height <= 0.0
            || 2.0 * (self.goal_offset + self.goal_width) > w
            || self.goal_height > h
        {
            return Err(ConfigError::GoalDoesNotFit {
                width: field.width,
                height: field.height,
                goal_width: self.goal_width,
                goal_height: self.goal_height,
                offset: self.goal_offset,
            });
        }

        if 2.0 * self.goal_arm_thickness >= self.goal_height {
            return Err(ConfigError::GoalArmsTooThick {
                thickness: self.goal_arm_thickness,
                goal_height: self.goal_height,
            });
        }

        Ok(())
    }
}

fn at_least(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value < min {
        Err(ConfigError::OutOfRange { name, value, min })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fits_camera_frame() {
        let config = Config::new();
        assert!(config.validate(&Field::new(1000, 800)).is_ok());
        assert_eq!(config.turn_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_field_smaller_than_buffers_rejected() {
        let config = Config::new();
        let err = config.validate(&Field::new(150, 800)).unwrap_err();
        assert!(matches!(err, ConfigError::FieldTooSmall { width: 150, .. }));
    }

    #[test]
    fn test_goal_taller_than_field_rejected() {
        let config = Config::new();
        let err = config.validate(&Field::new(1000, 300)).unwrap_err();
        assert!(matches!(err, ConfigError::GoalDoesNotFit { .. }));
    }

    #[test]
    fn test_zero_pass_frames_rejected() {
        let config = Config {
            frames_per_pass: 0,
            ..Config::new()
        };
        let err = config.validate(&Field::new(1000, 800)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                name: "frames_per_pass",
                value: 0.0,
                min: 1.0
            }
        );
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "goal_changes_turn": true, "turns_per_game": 4 }"#)
                .expect("config should parse");
        assert!(config.goal_changes_turn);
        assert_eq!(config.turns_per_game, 4);
        assert_eq!(config.carry_points, Params::CARRY_POINTS);
        assert_eq!(config.pass_mode, PassMode::FrameStepped);
    }
}
