use serde::{Deserialize, Serialize};

use crate::{
    Action, Command, Direction, RoomId, Theme,
    builder::{self, MazeBuilder},
    creator::MazeCreator,
    factory::{self, MazeFactory},
    layout::Layout,
    maze::{Maze, MazeError},
    site::{Event, MapSite, Room},
};

/// A fully built maze together with the room traversal starts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub maze: Maze,
    pub start: RoomId,
}

/// One of the interchangeable ways of building a maze.
pub enum Strategy {
    /// A family factory driven by the shared two-room assembly.
    Factory(Box<dyn MazeFactory>),
    /// A staged builder driven by the two-room director.
    Builder(Box<dyn MazeBuilder>),
    /// A staged builder driven by a parsed layout.
    Layout {
        builder: Box<dyn MazeBuilder>,
        layout: Layout,
    },
    /// A creator whose individual steps may be overridden.
    Creator(Box<dyn MazeCreator>),
}

impl Strategy {
    pub fn create_maze(self) -> Result<Blueprint, MazeError> {
        match self {
            Strategy::Factory(factory) => factory::create_maze(factory.as_ref()),
            Strategy::Builder(mut staged) => builder::create_maze(staged.as_mut()),
            Strategy::Layout {
                builder: mut staged,
                layout,
            } => layout.direct(staged.as_mut()),
            Strategy::Creator(creator) => creator.create_maze(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Factory(_) => "factory",
            Strategy::Builder(_) => "builder",
            Strategy::Layout { .. } => "layout",
            Strategy::Creator(_) => "creator",
        }
    }
}

/// What occupies one side of the current room, as seen from inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideView {
    Wall(Theme),
    ClosedDoor,
    OpenDoor { leads_to: RoomId },
    Room(RoomId),
}

/// Read-only snapshot of the current room for agents and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room: RoomId,
    pub theme: Theme,
    pub sides: [SideView; 4],
}

impl RoomView {
    #[inline]
    pub fn side(&self, direction: Direction) -> SideView {
        self.sides[direction.index()]
    }
}

/// Traversal controller. Owns the maze and tracks the current room.
#[derive(Debug, Clone)]
pub struct Game {
    maze: Maze,
    current: RoomId,
}

impl Game {
    /// Starts a traversal over a blueprint.
    ///
    /// The maze is validated and the starting room must exist.
    pub fn new(blueprint: Blueprint) -> Result<Self, MazeError> {
        let Blueprint { maze, start } = blueprint;
        maze.validate()?;
        if !maze.contains_room(start) {
            return Err(MazeError::RoomNotFound(start));
        }
        Ok(Game {
            maze,
            current: start,
        })
    }

    /// Builds a maze with `strategy` and starts traversal in the room it picks.
    pub fn create(strategy: Strategy) -> Result<Self, MazeError> {
        let name = strategy.name();
        let blueprint = strategy.create_maze()?;
        tracing::debug!(
            strategy = name,
            rooms = blueprint.maze.room_count(),
            doors = blueprint.maze.door_count(),
            start = blueprint.start,
            "maze constructed"
        );
        Game::new(blueprint)
    }

    #[inline]
    pub fn current_room(&self) -> RoomId {
        self.current
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    fn room(&self) -> Result<&Room, MazeError> {
        self.maze
            .room(self.current)
            .ok_or(MazeError::RoomNotFound(self.current))
    }

    /// "Look around": reports the current room without changing anything.
    pub fn get_current_room(&self) -> Result<Event, MazeError> {
        Ok(self.room()?.enter())
    }

    /// Executes a move (no action) or an open against one side of the
    /// current room.
    ///
    /// Bumping into walls or closed doors and opening something that is not
    /// a door are ordinary events. Only a broken maze yields an error.
    pub fn command(
        &mut self,
        direction: Direction,
        action: Option<Action>,
    ) -> Result<Event, MazeError> {
        let site = self.room()?.side(direction);
        let event = match action {
            Some(Action::Open) => match site {
                MapSite::Door(door) => self
                    .maze
                    .door_mut(door)
                    .ok_or(MazeError::DoorNotFound(door))?
                    .open(),
                _ => Event::CannotOpen { direction },
            },
            None => {
                let event = site.enter(&self.maze, self.current)?;
                if let Some(room) = event.entered_room() {
                    self.current = room;
                }
                event
            }
        };
        tracing::debug!(%direction, ?action, ?event, current = self.current, "command");
        Ok(event)
    }

    pub fn execute(&mut self, command: Command) -> Result<Event, MazeError> {
        match command.parts() {
            Some((direction, action)) => self.command(direction, action),
            None => self.get_current_room(),
        }
    }

    /// Describes the four sides of the current room.
    pub fn view(&self) -> Result<RoomView, MazeError> {
        let room = self.room()?;
        let mut sides = [SideView::ClosedDoor; 4];
        for (direction, site) in room.sides() {
            sides[direction.index()] = match site {
                MapSite::Unbound => {
                    return Err(MazeError::UnboundSide {
                        room: room.id(),
                        direction,
                    });
                }
                MapSite::Wall(theme) => SideView::Wall(theme),
                MapSite::Door(id) => {
                    let door = self.maze.door(id).ok_or(MazeError::DoorNotFound(id))?;
                    if door.is_open() {
                        SideView::OpenDoor {
                            leads_to: door.other_side(room.id()),
                        }
                    } else {
                        SideView::ClosedDoor
                    }
                }
                MapSite::Room(other) => SideView::Room(other),
            };
        }
        Ok(RoomView {
            room: room.id(),
            theme: room.theme(),
            sides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::StandardMazeBuilder, factory::StandardFactory};

    fn standard_game() -> Game {
        Game::create(Strategy::Factory(Box::new(StandardFactory))).unwrap()
    }

    #[test]
    fn test_starts_in_room_one() {
        let game = standard_game();
        assert_eq!(game.current_room(), 1);
        assert_eq!(
            game.get_current_room(),
            Ok(Event::EnteredRoom {
                room: 1,
                theme: Theme::Standard
            })
        );
    }

    #[test]
    fn test_open_wall_is_not_an_error() {
        let mut game = standard_game();
        assert_eq!(
            game.command(Direction::South, Some(Action::Open)),
            Ok(Event::CannotOpen {
                direction: Direction::South
            })
        );
        assert_eq!(game.current_room(), 1);
    }

    #[test]
    fn test_walk_back_through_open_door() {
        let mut game = standard_game();
        game.execute(Command::Open(Direction::East)).unwrap();
        game.execute(Command::Move(Direction::East)).unwrap();
        assert_eq!(game.current_room(), 2);
        let event = game.execute(Command::Move(Direction::West)).unwrap();
        assert_eq!(event.entered_room(), Some(1));
        assert_eq!(game.current_room(), 1);
    }

    #[test]
    fn test_view_reflects_door_state() {
        let mut game = standard_game();
        assert_eq!(game.view().unwrap().side(Direction::East), SideView::ClosedDoor);
        game.command(Direction::East, Some(Action::Open)).unwrap();
        let view = game.view().unwrap();
        assert_eq!(view.side(Direction::East), SideView::OpenDoor { leads_to: 2 });
        assert_eq!(view.side(Direction::North), SideView::Wall(Theme::Standard));
    }

    #[test]
    fn test_new_rejects_unknown_start() {
        let blueprint = builder::create_maze(&mut StandardMazeBuilder::new()).unwrap();
        let result = Game::new(Blueprint {
            start: 9,
            ..blueprint
        });
        assert!(matches!(result, Err(MazeError::RoomNotFound(9))));
    }

    #[test]
    fn test_new_rejects_incomplete_maze() {
        let mut maze = Maze::new();
        maze.add_room(Room::new(1)).unwrap();
        let result = Game::new(Blueprint { maze, start: 1 });
        assert!(matches!(
            result,
            Err(MazeError::UnboundSide {
                room: 1,
                direction: Direction::North
            })
        ));
    }
}
