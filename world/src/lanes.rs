use std::collections::{BTreeMap, VecDeque};

use lane_blast_core::{AgentId, AgentPhase, AgentSnapshot, AgentSpec, Color, SlotId};

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) lane: u32,
    pub(crate) color: Color,
    pub(crate) ammo: u32,
    pub(crate) concealed: bool,
    pub(crate) phase: AgentPhase,
    pub(crate) slot: Option<SlotId>,
}

impl Agent {
    fn from_spec(id: AgentId, lane: u32, spec: AgentSpec) -> Self {
        Self {
            id,
            lane,
            color: spec.color,
            ammo: spec.ammo,
            concealed: spec.hidden,
            phase: AgentPhase::Queued,
            slot: None,
        }
    }

    pub(crate) fn snapshot(&self, position: Option<u32>) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            lane: self.lane,
            position,
            color: (!self.concealed).then_some(self.color),
            ammo: (!self.concealed).then_some(self.ammo),
            phase: self.phase,
            slot: self.slot,
        }
    }
}

/// Per-lane FIFO of agents, front first.
#[derive(Clone, Debug, Default)]
pub(crate) struct LaneQueues {
    queues: Vec<VecDeque<AgentId>>,
}

impl LaneQueues {
    /// Creates agents for every lane of the board, drawing ids from `next_id`.
    pub(crate) fn populate(
        board: &[Vec<AgentSpec>],
        next_id: &mut u32,
    ) -> (Self, BTreeMap<AgentId, Agent>) {
        let mut agents = BTreeMap::new();
        let mut queues = Vec::with_capacity(board.len());

        for (lane, specs) in board.iter().enumerate() {
            let mut queue = VecDeque::with_capacity(specs.len());
            for spec in specs {
                let id = AgentId::new(*next_id);
                *next_id = next_id.wrapping_add(1);
                let _ = agents.insert(id, Agent::from_spec(id, lane as u32, *spec));
                queue.push_back(id);
            }
            queues.push(queue);
        }

        (Self { queues }, agents)
    }

    pub(crate) fn lane_count(&self) -> u32 {
        self.queues.len() as u32
    }

    pub(crate) fn front(&self, lane: u32) -> Option<AgentId> {
        self.queues
            .get(lane as usize)
            .and_then(|queue| queue.front())
            .copied()
    }

    pub(crate) fn position(&self, lane: u32, agent: AgentId) -> Option<u32> {
        self.queues
            .get(lane as usize)
            .and_then(|queue| queue.iter().position(|id| *id == agent))
            .map(|position| position as u32)
    }

    /// Removes the front agent and returns the new front, if any.
    ///
    /// Returns `None` without changes when `expected` is not the front.
    pub(crate) fn advance(&mut self, lane: u32, expected: AgentId) -> Option<Option<AgentId>> {
        let queue = self.queues.get_mut(lane as usize)?;
        if queue.front() != Some(&expected) {
            return None;
        }
        let _ = queue.pop_front();
        Some(queue.front().copied())
    }

    pub(crate) fn agents(&self, lane: u32) -> impl Iterator<Item = AgentId> + '_ {
        self.queues
            .get(lane as usize)
            .into_iter()
            .flat_map(|queue| queue.iter().copied())
    }
}
