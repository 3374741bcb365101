use glam::Vec2;

use crate::field::{Aabb, Field};
use crate::resources::Turn;

/// Ball component - the virtual ball carried by an organism
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    /// Smoothed travel direction; frozen into the pass direction while passing
    pub direction: Vec2,
    /// Random direction used while bouncing
    pub bounce_direction: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            direction: Vec2::ZERO,
            bounce_direction: Vec2::ZERO,
        }
    }

    /// Put the ball back on the center spot with no travel direction.
    pub fn reset(&mut self, field: &Field) {
        self.pos = field.center();
        self.direction = Vec2::ZERO;
        self.bounce_direction = Vec2::ZERO;
    }
}

/// Goal component. `owner` defends it; the other player scores in it.
#[derive(Debug, Clone)]
pub struct Goal {
    pub owner: Turn,
    pub body: Aabb,
    /// Post regions cut out of the body; a ball on a post is not a goal.
    pub arms: Vec<Aabb>,
}

impl Goal {
    /// Lay out the goal defended by `owner` on `field`.
    ///
    /// Red defends the left side, Blue the right. Both are vertically centered.
    pub fn for_side(owner: Turn, field: &Field, config: &crate::Config) -> Self {
        let x = match owner {
            Turn::Red => config.goal_offset,
            Turn::Blue => field.width as f32 - config.goal_width - config.goal_offset,
        };
        let y = (field.height as f32 - config.goal_height) / 2.0;
        let body = Aabb::from_origin_size(
            Vec2::new(x, y),
            Vec2::new(config.goal_width, config.goal_height),
        );

        let mut arms = Vec::new();
        let t = config.goal_arm_thickness;
        if t > 0.0 {
            arms.push(Aabb::from_origin_size(
                body.min,
                Vec2::new(config.goal_width, t),
            ));
            arms.push(Aabb::from_origin_size(
                Vec2::new(body.min.x, body.max.y - t),
                Vec2::new(config.goal_width, t),
            ));
        }

        Self { owner, body, arms }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.body.contains(point) && !self.arms.iter().any(|arm| arm.contains(point))
    }
}

/// Effect of a power-up or handicap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierKind {
    /// Adds time to the current turn. Instant, nothing to revert.
    ExtraTime(std::time::Duration),
    /// Resizes the ball (and with it the tracking window) for a while.
    BallRadius {
        radius: f32,
        duration: std::time::Duration,
    },
    /// Changes how far a pass travels for a while.
    PassDistance {
        distance: f32,
        duration: std::time::Duration,
    },
}

impl ModifierKind {
    pub fn duration(&self) -> Option<std::time::Duration> {
        match self {
            ModifierKind::ExtraTime(_) => None,
            ModifierKind::BallRadius { duration, .. }
            | ModifierKind::PassDistance { duration, .. } => Some(*duration),
        }
    }
}

/// Handle to an applied timed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierId(pub u64);

/// Scheduled reversal of a timed modifier
#[derive(Debug, Clone, Copy)]
pub struct PendingReversal {
    pub id: ModifierId,
    pub kind: ModifierKind,
    pub t_left: std::time::Duration,
}

impl PendingReversal {
    pub fn is_due(&self) -> bool {
        self.t_left.is_zero()
    }
}
