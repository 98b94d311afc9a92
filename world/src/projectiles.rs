use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lane_blast_core::{AgentId, CellCoord, CellId, PooledInstance, ProjectileId, SlotId, Tuning};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) agent: AgentId,
    pub(crate) target: CellId,
    pub(crate) instance: PooledInstance,
}

/// Projectiles in flight keyed by identifier.
///
/// Identifiers keep counting across level loads.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProjectileTracker {
    next_id: u32,
    in_flight: BTreeMap<ProjectileId, Projectile>,
}

impl ProjectileTracker {
    pub(crate) fn launch(&mut self, projectile: Projectile) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.in_flight.insert(id, projectile);
        id
    }

    pub(crate) fn land(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.in_flight.remove(&id)
    }

    /// Removes every projectile in flight.
    pub(crate) fn drain(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.in_flight).into_values().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.in_flight.len()
    }
}

/// Time a projectile needs from a slot to a grid position.
///
/// Slots sit in a row centred under the grid, `slot_distance` cells in front
/// of row zero. A non-positive speed makes impacts immediate.
pub(crate) fn travel_time(
    tuning: &Tuning,
    lanes: u32,
    slot: SlotId,
    target: CellCoord,
) -> Duration {
    if !(tuning.projectile_speed > 0.0) {
        return Duration::ZERO;
    }

    let origin = slot_position(tuning, lanes, slot);
    let destination = Vec2::new(target.lane() as f32, target.row() as f32);
    let seconds = origin.distance(destination) / tuning.projectile_speed;
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO)
}

fn slot_position(tuning: &Tuning, lanes: u32, slot: SlotId) -> Vec2 {
    let grid_centre = (lanes.max(1) - 1) as f32 * 0.5;
    let slot_centre = (tuning.slot_count.max(1) - 1) as f32 * 0.5;
    let x = grid_centre + (slot.get() as f32 - slot_centre) * tuning.slot_spacing;
    Vec2::new(x, -tuning.slot_distance)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lane_blast_core::{AgentId, CellCoord, CellId, PooledInstance, ProjectileId, SlotId, Tuning};

    use super::{travel_time, Projectile, ProjectileTracker};

    fn projectile(target: u32) -> Projectile {
        Projectile {
            agent: AgentId::new(0),
            target: CellId::new(target),
            instance: PooledInstance::new(0),
        }
    }

    #[test]
    fn straight_shot_travels_distance_over_speed() {
        let tuning = Tuning {
            slot_count: 1,
            slot_distance: 4.0,
            projectile_speed: 20.0,
            ..Tuning::default()
        };

        // Single lane and single slot: the slot sits 4 cells straight below row 0.
        let travel = travel_time(&tuning, 1, SlotId::new(0), CellCoord::new(0, 0));
        assert!((travel.as_secs_f32() - 0.2).abs() < 1e-6, "travel was {travel:?}");
    }

    #[test]
    fn far_lanes_take_longer_than_near_lanes() {
        let tuning = Tuning::default();
        let near = travel_time(&tuning, 9, SlotId::new(2), CellCoord::new(4, 0));
        let far = travel_time(&tuning, 9, SlotId::new(2), CellCoord::new(0, 0));

        assert!(far > near);
    }

    #[test]
    fn non_positive_speed_lands_immediately() {
        let tuning = Tuning {
            projectile_speed: 0.0,
            ..Tuning::default()
        };

        assert_eq!(
            travel_time(&tuning, 3, SlotId::new(0), CellCoord::new(2, 0)),
            Duration::ZERO
        );
    }

    #[test]
    fn identifiers_keep_counting_after_drain() {
        let mut tracker = ProjectileTracker::default();

        assert_eq!(tracker.launch(projectile(1)), ProjectileId::new(0));
        assert_eq!(tracker.launch(projectile(2)), ProjectileId::new(1));
        assert_eq!(tracker.drain().len(), 2);
        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.launch(projectile(3)), ProjectileId::new(2));
        assert_eq!(
            tracker.land(ProjectileId::new(2)).map(|landed| landed.target),
            Some(CellId::new(3))
        );
        assert!(tracker.land(ProjectileId::new(2)).is_none());
    }
}
