use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Command, Direction, RoomId,
    game::{RoomView, SideView},
};

/// Trait defining the behavior of an agent.
/// Agents decide which command to issue based on the current room's view.
pub trait Agent {
    /// Determines the next command to issue.
    /// `&mut self` allows the agent to keep memory between turns.
    fn next_command(&mut self, view: &RoomView) -> Command;
}

/// An agent that picks a random side each turn.
#[derive(Debug)]
pub struct RandomWalker {
    rng: StdRng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomWalker {
    fn next_command(&mut self, view: &RoomView) -> Command {
        let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];

        // Closed doors get opened rather than bumped into
        match view.side(direction) {
            SideView::ClosedDoor => Command::Open(direction),
            _ => Command::Move(direction),
        }
    }
}

/// An agent that opens every door it finds and prefers rooms it has
/// visited least.
#[derive(Debug, Default)]
pub struct Explorer {
    visits: HashMap<RoomId, usize>,
    last_room: Option<RoomId>,
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many turns the explorer has started in `room`.
    pub fn visits(&self, room: RoomId) -> usize {
        self.visits.get(&room).copied().unwrap_or(0)
    }
}

impl Agent for Explorer {
    fn next_command(&mut self, view: &RoomView) -> Command {
        if self.last_room != Some(view.room) {
            *self.visits.entry(view.room).or_insert(0) += 1;
            self.last_room = Some(view.room);
        }

        // 1. Open any closed door first
        if let Some(direction) = Direction::ALL
            .into_iter()
            .find(|d| view.side(*d) == SideView::ClosedDoor)
        {
            return Command::Open(direction);
        }

        // 2. Head for the least visited neighbour; the first direction wins ties
        let mut best: Option<(usize, Direction)> = None;
        for direction in Direction::ALL {
            let target = match view.side(direction) {
                SideView::OpenDoor { leads_to } => leads_to,
                SideView::Room(room) => room,
                SideView::Wall(_) | SideView::ClosedDoor => continue,
            };
            let visits = self.visits(target);
            if best.is_none_or(|(fewest, _)| visits < fewest) {
                best = Some((visits, direction));
            }
        }

        // 3. Nowhere to go, look around
        match best {
            Some((_, direction)) => Command::Move(direction),
            None => Command::Look,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;

    fn view(room: RoomId, sides: [SideView; 4]) -> RoomView {
        RoomView {
            room,
            theme: Theme::Standard,
            sides,
        }
    }

    const WALL: SideView = SideView::Wall(Theme::Standard);

    #[test]
    fn test_explorer_opens_closed_door_first() {
        let mut agent = Explorer::new();
        let v = view(1, [WALL, SideView::OpenDoor { leads_to: 2 }, SideView::ClosedDoor, WALL]);
        assert_eq!(agent.next_command(&v), Command::Open(Direction::South));
    }

    #[test]
    fn test_explorer_prefers_unvisited_room() {
        let mut agent = Explorer::new();
        let in_two = view(2, [WALL, WALL, WALL, SideView::OpenDoor { leads_to: 1 }]);
        agent.next_command(&in_two);

        let in_one = view(
            1,
            [
                WALL,
                SideView::OpenDoor { leads_to: 2 },
                SideView::OpenDoor { leads_to: 3 },
                WALL,
            ],
        );
        assert_eq!(agent.next_command(&in_one), Command::Move(Direction::South));
        assert_eq!(agent.visits(1), 1);
        assert_eq!(agent.visits(2), 1);
    }

    #[test]
    fn test_explorer_looks_when_boxed_in() {
        let mut agent = Explorer::new();
        assert_eq!(agent.next_command(&view(1, [WALL; 4])), Command::Look);
    }

    #[test]
    fn test_random_walker_is_deterministic_per_seed() {
        let v = view(1, [WALL, SideView::ClosedDoor, WALL, WALL]);
        let mut a = RandomWalker::new(7);
        let mut b = RandomWalker::new(7);
        for _ in 0..20 {
            let command = a.next_command(&v);
            assert_eq!(command, b.next_command(&v));
            if let Command::Move(direction) | Command::Open(direction) = command {
                assert_eq!(
                    matches!(command, Command::Open(_)),
                    direction == Direction::East
                );
            }
        }
    }
}
