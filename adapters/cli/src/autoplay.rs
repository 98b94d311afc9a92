use lane_blast_core::AgentPhase;
use lane_blast_world::{query, World};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stand-in player that taps lanes on behalf of the user.
#[derive(Debug)]
pub(crate) struct Autoplay {
    rng: ChaCha8Rng,
}

impl Autoplay {
    /// Creates a player whose choices are fully determined by `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks the lane to tap next, if any.
    ///
    /// Only lanes whose front agent is still queued are considered, and only
    /// while a slot is free. Fronts whose colour is exposed in row zero are
    /// preferred over the rest.
    pub(crate) fn choose(&mut self, world: &World) -> Option<u32> {
        if query::slot_view(world).free_count() == 0 {
            return None;
        }

        let grid = query::grid_view(world);
        let mut matching = Vec::new();
        let mut others = Vec::new();
        for lane in 0..query::lane_count(world) {
            let view = query::lane_view(world, lane);
            let Some(front) = view.front() else {
                continue;
            };
            if front.phase != AgentPhase::Queued {
                continue;
            }
            match front.color {
                Some(color) if grid.front_row_has(color) => matching.push(lane),
                _ => others.push(lane),
            }
        }

        let pool = if matching.is_empty() {
            &others
        } else {
            &matching
        };
        pool.choose(&mut self.rng).copied()
    }
}
