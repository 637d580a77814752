use crate::{
    Direction, RoomId, Theme,
    game::Blueprint,
    maze::{Maze, MazeError},
    site::{Door, MapSite, Room},
};

/// Builds a maze through a sequence of staged calls against one in-progress
/// maze held by the builder.
pub trait MazeBuilder {
    /// Starts a new, empty maze, discarding any maze in progress.
    fn build_maze(&mut self);

    /// Adds a room with all four sides walled. Does nothing if the room
    /// already exists.
    fn build_room(&mut self, id: RoomId) -> Result<(), MazeError>;

    /// Connects two existing rooms with a new closed door bound to the named
    /// side of each.
    fn build_door(
        &mut self,
        room_a: RoomId,
        side_a: Direction,
        room_b: RoomId,
        side_b: Direction,
    ) -> Result<(), MazeError>;

    /// Validates and hands over the accumulated maze.
    fn get_maze(&mut self) -> Result<Maze, MazeError>;
}

/// Builder producing rooms and walls of a single theme.
#[derive(Debug, Clone, Default)]
pub struct StandardMazeBuilder {
    theme: Theme,
    current: Option<Maze>,
}

impl StandardMazeBuilder {
    pub fn new() -> Self {
        StandardMazeBuilder::themed(Theme::Standard)
    }

    /// A builder whose rooms and walls all belong to `theme`.
    pub fn themed(theme: Theme) -> Self {
        StandardMazeBuilder {
            theme,
            current: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn maze_mut(&mut self) -> Result<&mut Maze, MazeError> {
        self.current.as_mut().ok_or(MazeError::BuilderNotStarted)
    }
}

impl MazeBuilder for StandardMazeBuilder {
    fn build_maze(&mut self) {
        tracing::debug!(theme = ?self.theme, "starting maze");
        self.current = Some(Maze::new());
    }

    fn build_room(&mut self, id: RoomId) -> Result<(), MazeError> {
        let theme = self.theme;
        let maze = self.maze_mut()?;
        if maze.contains_room(id) {
            return Ok(());
        }
        let mut room = Room::themed(id, theme);
        for direction in Direction::ALL {
            room.set_side(direction, MapSite::Wall(theme));
        }
        maze.add_room(room)?;
        tracing::debug!(room = id, "built room");
        Ok(())
    }

    fn build_door(
        &mut self,
        room_a: RoomId,
        side_a: Direction,
        room_b: RoomId,
        side_b: Direction,
    ) -> Result<(), MazeError> {
        let maze = self.maze_mut()?;
        for id in [room_a, room_b] {
            if !maze.contains_room(id) {
                tracing::warn!(room = id, "door references a missing room");
                return Err(MazeError::RoomNotFound(id));
            }
        }
        let door = MapSite::Door(maze.add_door(Door::new(room_a, room_b)?)?);
        maze.set_side(room_a, side_a, door)?;
        maze.set_side(room_b, side_b, door)?;
        tracing::debug!(room_a, %side_a, room_b, %side_b, "built door");
        Ok(())
    }

    fn get_maze(&mut self) -> Result<Maze, MazeError> {
        let maze = self.current.take().ok_or(MazeError::BuilderNotStarted)?;
        maze.validate()?;
        Ok(maze)
    }
}

/// Drives a builder through the two-room layout: rooms 1 and 2 joined by a
/// door on room 1's east side and room 2's west side. Starts in room 1.
pub fn create_maze<B>(builder: &mut B) -> Result<Blueprint, MazeError>
where
    B: MazeBuilder + ?Sized,
{
    builder.build_maze();
    builder.build_room(1)?;
    builder.build_room(2)?;
    builder.build_door(1, Direction::East, 2, Direction::West)?;
    Ok(Blueprint {
        maze: builder.get_maze()?,
        start: 1,
    })
}
