use hecs::World;
use std::time::Duration;

use crate::components::*;

/// Schedule the reversal of a timed modifier.
pub fn schedule_reversal(world: &mut World, id: ModifierId, kind: ModifierKind, delay: Duration) {
    world.spawn((PendingReversal {
        id,
        kind,
        t_left: delay,
    },));
}

/// Count down every pending reversal and remove the ones that came due.
///
/// Due reversals are returned in the order their modifiers were applied.
pub fn tick_reversals(world: &mut World, dt: Duration) -> Vec<PendingReversal> {
    let mut due = Vec::new();
    for (entity, reversal) in world.query_mut::<&mut PendingReversal>() {
        reversal.t_left = reversal.t_left.saturating_sub(dt);
        if reversal.is_due() {
            due.push((entity, *reversal));
        }
    }

    for (entity, _) in &due {
        let _ = world.despawn(*entity);
    }

    let mut due: Vec<_> = due.into_iter().map(|(_, r)| r).collect();
    due.sort_by_key(|r| r.id.0);
    due
}

/// Drop a pending reversal without waiting for it. Returns false if it already ran.
pub fn cancel_reversal(world: &mut World, id: ModifierId) -> bool {
    let entity = world
        .query::<&PendingReversal>()
        .iter()
        .find(|(_e, r)| r.id == id)
        .map(|(e, _)| e);

    match entity {
        Some(entity) => world.despawn(entity).is_ok(),
        None => false,
    }
}

/// Drop every pending reversal. Used on reset so stale effects never fire.
pub fn clear_reversals(world: &mut World) {
    let pending: Vec<_> = world
        .query::<&PendingReversal>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in pending {
        let _ = world.despawn(entity);
    }
}

/// Modifiers still in effect, oldest first.
pub fn active_modifiers(world: &World) -> Vec<PendingReversal> {
    let mut active: Vec<_> = world
        .query::<&PendingReversal>()
        .iter()
        .map(|(_e, r)| *r)
        .collect();
    active.sort_by_key(|r| r.id.0);
    active
}
