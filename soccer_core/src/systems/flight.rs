use glam::Vec2;
use std::time::Duration;

use crate::{Config, PassMode};

/// Autonomous ball movement after a pass or a bounce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flight {
    /// Ball follows the nearest organism.
    #[default]
    Tracking,
    Passing {
        frames: u32,
        elapsed: Duration,
    },
    Bouncing {
        frames: u32,
        elapsed: Duration,
    },
}

impl Flight {
    pub fn pass() -> Self {
        Flight::Passing {
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn bounce() -> Self {
        Flight::Bouncing {
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Flight::Tracking)
    }

    pub fn is_passing(&self) -> bool {
        matches!(self, Flight::Passing { .. })
    }

    pub fn is_bouncing(&self) -> bool {
        matches!(self, Flight::Bouncing { .. })
    }
}

/// Distance budget and pacing of one flight kind.
#[derive(Debug, Clone, Copy)]
struct FlightProfile {
    distance: f32,
    frames: u32,
    speed: f32,
    duration: Duration,
}

/// Advance the flight by one tick.
///
/// Returns the ball's next position, or `None` once the frame or time budget is
/// spent. `pass_distance` is the current pass reach, which modifiers can change.
/// While tracking there is nothing to advance and `None` is returned.
pub fn advance_flight(
    flight: &mut Flight,
    pos: Vec2,
    direction: Vec2,
    pass_distance: f32,
    dt: Duration,
    config: &Config,
) -> Option<Vec2> {
    let (frames, elapsed, profile) = match flight {
        Flight::Tracking => return None,
        Flight::Passing { frames, elapsed } => (
            frames,
            elapsed,
            FlightProfile {
                distance: pass_distance,
                frames: config.frames_per_pass,
                speed: config.pass_speed * pass_distance / config.pass_distance.max(f32::EPSILON),
                duration: config.pass_duration(),
            },
        ),
        Flight::Bouncing { frames, elapsed } => (
            frames,
            elapsed,
            FlightProfile {
                distance: config.bounce_distance,
                frames: config.frames_per_bounce,
                speed: config.bounce_speed,
                duration: config.bounce_duration(),
            },
        ),
    };

    match config.pass_mode {
        PassMode::FrameStepped => {
            if *frames >= profile.frames {
                return None;
            }
            *frames += 1;
            let step = profile.distance / profile.frames as f32;
            Some(pos + direction * step)
        }
        PassMode::TimeStepped => {
            if *elapsed >= profile.duration {
                return None;
            }
            *elapsed += dt;
            *frames += 1;
            let step = profile.speed * dt.as_secs_f32() * 1000.0;
            Some(pos + direction * step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_stepped_pass_covers_pass_distance() {
        let config = Config::new();
        let mut flight = Flight::pass();
        let mut pos = Vec2::new(100.0, 400.0);
        let mut steps = 0;
        while let Some(next) = advance_flight(
            &mut flight,
            pos,
            Vec2::X,
            config.pass_distance,
            Duration::from_millis(16),
            &config,
        ) {
            pos = next;
            steps += 1;
        }
        assert_eq!(steps, config.frames_per_pass);
        assert!((pos.x - (100.0 + config.pass_distance)).abs() < 1e-3);
    }

    #[test]
    fn test_frame_stepped_bounce_budget() {
        let config = Config::new();
        let mut flight = Flight::bounce();
        let first = advance_flight(
            &mut flight,
            Vec2::ZERO,
            Vec2::Y,
            config.pass_distance,
            Duration::ZERO,
            &config,
        );
        assert_eq!(
            first,
            Some(Vec2::new(0.0, config.bounce_distance / config.frames_per_bounce as f32))
        );
        assert_eq!(
            flight,
            Flight::Bouncing {
                frames: 1,
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn test_time_stepped_pass_scales_with_dt() {
        let config = Config {
            pass_mode: PassMode::TimeStepped,
            ..Config::new()
        };
        let mut flight = Flight::pass();
        let next = advance_flight(
            &mut flight,
            Vec2::ZERO,
            Vec2::X,
            config.pass_distance,
            Duration::from_millis(100),
            &config,
        )
        .expect("pass in progress");
        assert!((next.x - config.pass_speed * 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_time_stepped_pass_ends_after_duration() {
        let config = Config {
            pass_mode: PassMode::TimeStepped,
            ..Config::new()
        };
        let mut flight = Flight::Passing {
            frames: 3,
            elapsed: config.pass_duration(),
        };
        let next = advance_flight(
            &mut flight,
            Vec2::ZERO,
            Vec2::X,
            config.pass_distance,
            Duration::from_millis(16),
            &config,
        );
        assert_eq!(next, None);
    }

    #[test]
    fn test_tracking_does_not_move() {
        let config = Config::new();
        let mut flight = Flight::Tracking;
        let next = advance_flight(
            &mut flight,
            Vec2::ONE,
            Vec2::X,
            config.pass_distance,
            Duration::from_millis(16),
            &config,
        );
        assert_eq!(next, None);
        assert!(!flight.is_active());
    }
}
