use std::collections::VecDeque;

use lane_blast_core::{AgentId, SlotId};

/// Fixed pool of docking slots plus the queue of dock requests waiting for one.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotAllocator {
    slots: Vec<Option<AgentId>>,
    waiting: VecDeque<AgentId>,
}

impl SlotAllocator {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            slots: vec![None; capacity as usize],
            waiting: VecDeque::new(),
        }
    }

    /// Assigns the agent to the first free slot.
    ///
    /// Returns `None` when every slot is taken or the agent already holds one.
    pub(crate) fn try_dock(&mut self, agent: AgentId) -> Option<SlotId> {
        if self.slot_of(agent).is_some() {
            return None;
        }
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(agent);
        Some(SlotId::new(index as u32))
    }

    /// Frees the slot, returning the agent that held it.
    pub(crate) fn release(&mut self, slot: SlotId) -> Option<AgentId> {
        self.slots.get_mut(slot.get() as usize).and_then(Option::take)
    }

    pub(crate) fn slot_of(&self, agent: AgentId) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|occupant| *occupant == Some(agent))
            .map(|index| SlotId::new(index as u32))
    }

    pub(crate) fn occupant(&self, slot: SlotId) -> Option<AgentId> {
        self.slots.get(slot.get() as usize).copied().flatten()
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    pub(crate) fn all_occupied(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Option::is_some)
    }

    /// Appends a dock request to the waiting queue. Duplicates are refused.
    pub(crate) fn defer(&mut self, agent: AgentId) -> bool {
        if self.waiting.contains(&agent) {
            return false;
        }
        self.waiting.push_back(agent);
        true
    }

    /// Longest-waiting dock request.
    pub(crate) fn next_waiting(&mut self) -> Option<AgentId> {
        self.waiting.pop_front()
    }

    pub(crate) fn waiting(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.waiting.iter().copied()
    }
}
