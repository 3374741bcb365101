//! Game core for microscope soccer.
//!
//! Two players take turns steering light-responsive Euglena under a microscope.
//! A blob detector reports organism centroids each frame; the organism nearest
//! the virtual ball carries it. This crate holds the association step and the
//! turn, scoring and ball-physics state machine. It does no I/O.

pub mod associator;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod motion;
pub mod params;
pub mod resources;
pub mod systems;

pub use associator::*;
pub use components::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use params::*;
pub use resources::*;

use hecs::World;

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, radius: f32) -> hecs::Entity {
    world.spawn((Ball::new(pos, radius),))
}

/// Copy of the ball component, if one exists
pub fn ball_state(world: &World) -> Option<Ball> {
    world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball)
}

/// Mutate the ball in place. Returns `None` if there is no ball.
pub fn with_ball<R>(world: &mut World, f: impl FnOnce(&mut Ball) -> R) -> Option<R> {
    world.query_mut::<&mut Ball>().into_iter().next().map(|(_e, ball)| f(ball))
}
