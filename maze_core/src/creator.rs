use crate::{
    Direction, RoomId, Theme,
    game::Blueprint,
    maze::{Maze, MazeError},
    site::{Door, MapSite, Room},
};

/// Fixed maze assembly with overridable creation steps.
///
/// Implementors override any subset of the `make_*` steps. The steps they
/// leave alone fall back to the standard pieces, so a maze may freely mix
/// overridden and standard pieces.
pub trait MazeCreator {
    fn make_maze(&self) -> Maze {
        Maze::new()
    }

    fn make_room(&self, id: RoomId) -> Room {
        Room::new(id)
    }

    fn make_wall(&self) -> MapSite {
        MapSite::Wall(Theme::Standard)
    }

    fn make_door(&self, room_a: RoomId, room_b: RoomId) -> Result<Door, MazeError> {
        Door::new(room_a, room_b)
    }

    /// Builds the two-room maze from the creation steps. Not meant to be
    /// overridden.
    fn create_maze(&self) -> Result<Blueprint, MazeError> {
        let mut maze = self.make_maze();
        let r1 = self.make_room(1);
        let r2 = self.make_room(2);
        let (id1, id2) = (r1.id(), r2.id());
        let door = self.make_door(id1, id2)?;

        maze.add_room(r1)?;
        maze.add_room(r2)?;
        let door = MapSite::Door(maze.add_door(door)?);

        let sides = [
            (id1, Direction::North, self.make_wall()),
            (id1, Direction::East, door),
            (id1, Direction::South, self.make_wall()),
            (id1, Direction::West, self.make_wall()),
            (id2, Direction::North, self.make_wall()),
            (id2, Direction::East, self.make_wall()),
            (id2, Direction::South, self.make_wall()),
            (id2, Direction::West, door),
        ];
        for (room, direction, site) in sides {
            maze.set_side(room, direction, site)?;
        }

        maze.validate()?;
        Ok(Blueprint { maze, start: id1 })
    }
}

/// Uses every default step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCreator;

impl MazeCreator for StandardCreator {}

/// Overrides rooms and walls only; doors and the maze itself are standard.
#[derive(Debug, Clone, Copy, Default)]
pub struct DangerousCreator;

impl MazeCreator for DangerousCreator {
    fn make_room(&self, id: RoomId) -> Room {
        Room::themed(id, Theme::Dangerous)
    }

    fn make_wall(&self) -> MapSite {
        MapSite::Wall(Theme::Dangerous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_creator_matches_plain_layout() {
        let blueprint = StandardCreator.create_maze().unwrap();
        assert_eq!(blueprint.start, 1);
        let room = blueprint.maze.room(2).unwrap();
        assert_eq!(room.side(Direction::West), MapSite::Door(0));
        assert_eq!(room.side(Direction::East), MapSite::Wall(Theme::Standard));
    }

    #[test]
    fn test_partial_override_is_still_complete() {
        let blueprint = DangerousCreator.create_maze().unwrap();
        for room in blueprint.maze.rooms() {
            assert!(room.is_complete());
            assert_eq!(room.theme(), Theme::Dangerous);
        }
        assert!(blueprint.maze.door(0).is_some());
    }

    struct FancyWallsOnly;

    impl MazeCreator for FancyWallsOnly {
        fn make_wall(&self) -> MapSite {
            MapSite::Wall(Theme::Fancy)
        }
    }

    #[test]
    fn test_mixing_families_is_allowed() {
        let blueprint = FancyWallsOnly.create_maze().unwrap();
        let room = blueprint.maze.room(1).unwrap();
        assert_eq!(room.theme(), Theme::Standard);
        assert_eq!(room.side(Direction::North), MapSite::Wall(Theme::Fancy));
    }
}
