use glam::Vec2;

use crate::{Config, Field};

/// Where the ball sits relative to the field edges this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStatus {
    /// Within the out-of-bounds buffer.
    pub out_of_bounds: bool,
    /// Within the wider band where an in-flight ball bounces.
    pub in_bounce_band: bool,
}

pub fn edge_status(pos: Vec2, field: &Field, config: &Config) -> EdgeStatus {
    EdgeStatus {
        out_of_bounds: field.near_edge(pos, config.bounds_buffer),
        in_bounce_band: field.near_edge(pos, config.bounce_buffer),
    }
}

/// Per-axis latch so an excursion into the bounce band flips direction only once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub bounced_x: bool,
    pub bounced_y: bool,
}

impl WallContact {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Reflect an in-flight direction off the walls the ball is pressing against.
///
/// Each axis flips at most once per excursion into its band, and its latch
/// releases when the ball leaves that band. In a corner both axes can flip.
/// Returns true if any component was flipped.
pub fn bounce_off_walls(
    pos: Vec2,
    direction: &mut Vec2,
    contact: &mut WallContact,
    field: &Field,
    config: &Config,
) -> bool {
    let mut flipped = false;

    if field.near_vertical_edge(pos, config.bounce_buffer) {
        if !contact.bounced_x {
            direction.x = -direction.x;
            contact.bounced_x = true;
            flipped = true;
        }
    } else {
        contact.bounced_x = false;
    }

    if field.near_horizontal_edge(pos, config.bounce_buffer) {
        if !contact.bounced_y {
            direction.y = -direction.y;
            contact.bounced_y = true;
            flipped = true;
        }
    } else {
        contact.bounced_y = false;
    }

    flipped
}
