#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when a level is won or lost.

use lane_blast_core::{Command, Event, GameState, GridView, SlotView};

/// Win/lose evaluator driven by hit and lose-poll events.
#[derive(Debug, Default)]
pub struct Outcome;

impl Outcome {
    /// Creates a new outcome evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspects a batch of events and emits at most one [`Command::ResolveGame`].
    ///
    /// A main hit that leaves no active cell wins the level. A lose poll finds
    /// the level lost when every slot is occupied, no shot is in flight, every
    /// occupant still has ammunition and none of them matches the colour of an
    /// active front-row cell. An occupant without ammunition is about to leave
    /// and free its slot, so the verdict waits for a later poll.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        grid: &GridView,
        slots: &SlotView,
        out: &mut Vec<Command>,
    ) {
        if state.is_terminal() {
            return;
        }

        let hit = events
            .iter()
            .any(|event| matches!(event, Event::CellHit { .. }));
        if hit && grid.is_cleared() {
            out.push(Command::ResolveGame {
                state: GameState::Won,
            });
            return;
        }

        let polled = events
            .iter()
            .any(|event| matches!(event, Event::LosePollElapsed));
        if polled && is_stalled(grid, slots) {
            out.push(Command::ResolveGame {
                state: GameState::Lost,
            });
        }
    }
}

fn is_stalled(grid: &GridView, slots: &SlotView) -> bool {
    if !slots.all_occupied() || slots.shots_in_flight() > 0 {
        return false;
    }
    slots
        .occupants()
        .all(|occupant| occupant.ammo > 0 && !grid.front_row_has(occupant.color))
}

#[cfg(test)]
mod tests {
    use lane_blast_core::{
        AgentId, CellCoord, CellId, CellSnapshot, Color, Command, Event, GameState, GridView,
        SlotOccupant, SlotView,
    };

    use super::Outcome;

    fn grid(front: &[(Color, bool)]) -> GridView {
        let cells = front
            .iter()
            .enumerate()
            .map(|(lane, (color, active))| CellSnapshot {
                id: CellId::new(lane as u32),
                coord: CellCoord::new(lane as u32, 0),
                color: *color,
                active: *active,
                reserved: false,
            })
            .collect();
        GridView::from_snapshots(front.len() as u32, 1, cells)
    }

    fn slots(occupants: &[(Color, u32)], free: usize) -> SlotView {
        let mut slots: Vec<Option<SlotOccupant>> = occupants
            .iter()
            .enumerate()
            .map(|(index, (color, ammo))| {
                Some(SlotOccupant {
                    agent: AgentId::new(index as u32),
                    color: *color,
                    ammo: *ammo,
                })
            })
            .collect();
        slots.extend(std::iter::repeat(None).take(free));
        SlotView::from_slots(slots)
    }

    fn hit() -> Event {
        Event::CellHit {
            cell: CellId::new(0),
            coord: CellCoord::new(0, 0),
            color: Color::Red,
        }
    }

    fn evaluate(
        events: &[Event],
        state: GameState,
        grid: &GridView,
        slots: &SlotView,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        Outcome::new().handle(events, state, grid, slots, &mut out);
        out
    }

    #[test]
    fn clearing_the_last_cell_wins() {
        let cleared = grid(&[(Color::Red, false), (Color::Blue, false)]);

        assert_eq!(
            evaluate(&[hit()], GameState::Playing, &cleared, &slots(&[], 2)),
            vec![Command::ResolveGame {
                state: GameState::Won
            }]
        );
    }

    #[test]
    fn win_requires_a_hit_in_the_batch() {
        let cleared = grid(&[(Color::Red, false)]);

        let commands = evaluate(
            &[Event::LosePollElapsed],
            GameState::Playing,
            &cleared,
            &slots(&[], 1),
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn hit_with_cells_left_does_nothing() {
        let remaining = grid(&[(Color::Red, false), (Color::Blue, true)]);

        assert!(evaluate(&[hit()], GameState::Playing, &remaining, &slots(&[], 2)).is_empty());
    }

    #[test]
    fn full_slots_without_a_match_lose() {
        let front = grid(&[(Color::Blue, true), (Color::Green, true)]);
        let full = slots(&[(Color::Red, 3), (Color::Yellow, 1)], 0);

        assert_eq!(
            evaluate(&[Event::LosePollElapsed], GameState::Playing, &front, &full),
            vec![Command::ResolveGame {
                state: GameState::Lost
            }]
        );
    }

    #[test]
    fn a_matching_occupant_prevents_the_loss() {
        let front = grid(&[(Color::Blue, true), (Color::Red, true)]);
        let full = slots(&[(Color::Red, 3), (Color::Yellow, 1)], 0);

        assert!(evaluate(&[Event::LosePollElapsed], GameState::Playing, &front, &full).is_empty());
    }

    #[test]
    fn occupant_about_to_leave_defers_the_verdict() {
        let front = grid(&[(Color::Blue, true)]);
        let full = slots(&[(Color::Red, 0), (Color::Yellow, 2)], 0);

        assert!(evaluate(&[Event::LosePollElapsed], GameState::Playing, &front, &full).is_empty());
    }

    #[test]
    fn shot_in_flight_defers_the_verdict() {
        let front = grid(&[(Color::Blue, true)]);
        let full = slots(&[(Color::Red, 2)], 0).with_shots_in_flight(1);

        assert!(evaluate(&[Event::LosePollElapsed], GameState::Playing, &front, &full).is_empty());
    }

    #[test]
    fn inactive_front_cells_do_not_count_as_matches() {
        let front = grid(&[(Color::Red, false), (Color::Blue, true)]);
        let full = slots(&[(Color::Red, 2)], 0);

        assert_eq!(
            evaluate(&[Event::LosePollElapsed], GameState::Playing, &front, &full).len(),
            1
        );
    }

    #[test]
    fn free_slot_prevents_the_loss() {
        let front = grid(&[(Color::Blue, true)]);

        assert!(evaluate(
            &[Event::LosePollElapsed],
            GameState::Playing,
            &front,
            &slots(&[(Color::Red, 2)], 1)
        )
        .is_empty());
    }

    #[test]
    fn terminal_states_emit_nothing() {
        let cleared = grid(&[(Color::Red, false)]);

        assert!(evaluate(&[hit()], GameState::Won, &cleared, &slots(&[], 1)).is_empty());
        let full = slots(&[(Color::Red, 1)], 0);
        assert!(evaluate(&[Event::LosePollElapsed], GameState::Lost, &cleared, &full).is_empty());
    }
}
