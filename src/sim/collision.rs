//! Lane-based collision detection
//!
//! An entity is reached when it shares the runner's lane, the runner has not
//! already passed it, and the forward gap is under the collision threshold.
//! The evaluator only marks entities consumed; the caller applies scoring and
//! resource effects.

use super::state::{EntityKind, Lane, SpawnedEntity};
use crate::consts::COLLISION_THRESHOLD;

/// Entities reached in one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reached {
    pub collected: Vec<u32>,
    pub hazards: Vec<u32>,
}

impl Reached {
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty() && self.hazards.is_empty()
    }
}

/// Whether the runner at (`lane`, `position`) reaches `entity`
#[inline]
pub fn is_reached(lane: Lane, position: f32, entity: &SpawnedEntity) -> bool {
    entity.lane == lane
        && position <= entity.position
        && (entity.position - position).abs() < COLLISION_THRESHOLD
}

/// Mark and report every live entity the runner reaches
pub fn evaluate(lane: Lane, position: f32, entities: &mut [SpawnedEntity]) -> Reached {
    let mut reached = Reached::default();
    for entity in entities.iter_mut().filter(|e| !e.consumed) {
        if !is_reached(lane, position, entity) {
            continue;
        }
        entity.consumed = true;
        match entity.kind {
            EntityKind::Collectible => reached.collected.push(entity.id),
            EntityKind::Hazard => reached.hazards.push(entity.id),
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u32, kind: EntityKind, lane: Lane, position: f32) -> SpawnedEntity {
        SpawnedEntity {
            id,
            kind,
            lane,
            position,
            consumed: false,
        }
    }

    #[test]
    fn test_reached_within_threshold_ahead() {
        let mut entities = vec![entity(1, EntityKind::Collectible, Lane::Center, 10.0)];

        // Too far ahead
        assert!(evaluate(Lane::Center, 8.4, &mut entities).is_empty());

        let reached = evaluate(Lane::Center, 8.6, &mut entities);
        assert_eq!(reached.collected, vec![1]);
        assert!(entities[0].consumed);

        // Reported exactly once
        assert!(evaluate(Lane::Center, 9.0, &mut entities).is_empty());
    }

    #[test]
    fn test_passed_entities_are_not_reached() {
        let mut entities = vec![entity(1, EntityKind::Hazard, Lane::Left, 10.0)];
        assert!(evaluate(Lane::Left, 10.1, &mut entities).is_empty());
        assert!(!entities[0].consumed);

        // Level with the entity still counts
        assert_eq!(evaluate(Lane::Left, 10.0, &mut entities).hazards, vec![1]);
    }

    #[test]
    fn test_other_lanes_never_reached() {
        let mut entities = vec![
            entity(1, EntityKind::Collectible, Lane::Left, 10.0),
            entity(2, EntityKind::Hazard, Lane::Right, 10.0),
        ];
        for step in 0..40 {
            let pos = step as f32 * 0.5;
            assert!(evaluate(Lane::Center, pos, &mut entities).is_empty());
        }
    }

    #[test]
    fn test_simultaneous_reaches_reported_together() {
        let mut entities = vec![
            entity(1, EntityKind::Collectible, Lane::Right, 10.0),
            entity(2, EntityKind::Hazard, Lane::Right, 11.0),
            entity(3, EntityKind::Collectible, Lane::Center, 10.0),
        ];
        let reached = evaluate(Lane::Right, 9.8, &mut entities);
        assert_eq!(reached.collected, vec![1]);
        assert_eq!(reached.hazards, vec![2]);
        assert!(!entities[2].consumed);
    }
}
