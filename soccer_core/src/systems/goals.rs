use hecs::World;

use crate::{Ball, Config, Events, Field, GameEvent, Goal, Score, Turn};

/// Spawn both goals for `field`, replacing any existing ones.
pub fn layout_goals(world: &mut World, field: &Field, config: &Config) {
    let stale: Vec<_> = world.query::<&Goal>().iter().map(|(e, _)| e).collect();
    for entity in stale {
        let _ = world.despawn(entity);
    }

    world.spawn((Goal::for_side(Turn::Red, field, config),));
    world.spawn((Goal::for_side(Turn::Blue, field, config),));
}

/// The goal defended by `owner`, if laid out.
pub fn goal_of(world: &World, owner: Turn) -> Option<Goal> {
    world
        .query::<&Goal>()
        .iter()
        .find(|(_e, goal)| goal.owner == owner)
        .map(|(_e, goal)| goal.clone())
}

/// Check if the attacker put the ball in the opponent's goal, and award points.
///
/// A ball carried in by an organism earns the carry bonus; a ball that arrived
/// while passed or bounced earns the pass points. Returns the points awarded.
pub fn check_goal(
    world: &World,
    attacker: Turn,
    in_flight: bool,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
) -> Option<u32> {
    let ball_pos = world.query::<&Ball>().iter().next().map(|(_e, b)| b.pos)?;
    let target = goal_of(world, attacker.opponent())?;

    if !target.contains(ball_pos) {
        return None;
    }

    let points = if in_flight {
        config.pass_points
    } else {
        config.carry_points
    };
    score.add(attacker, points);
    events.push(GameEvent::GoalScored {
        turn: attacker,
        points,
    });
    Some(points)
}
