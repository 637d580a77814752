//! Family-factory construction.
//!
//! A [`MazeFactory`] hands out every piece of one variant family. The shared
//! assembly in [`create_maze`] only talks to the factory, so swapping the
//! factory swaps every room and wall at once.

use crate::{
    Direction, RoomId, Theme,
    game::Blueprint,
    maze::{Maze, MazeError},
    site::{Door, MapSite, Room},
};

/// Creates the pieces of one maze family.
///
/// None of the steps have defaults: a family supplies all four, so pieces
/// from different families never end up in the same maze.
pub trait MazeFactory {
    fn make_maze(&self) -> Maze;
    fn make_room(&self, id: RoomId) -> Room;
    fn make_wall(&self) -> MapSite;
    fn make_door(&self, room_a: RoomId, room_b: RoomId) -> Result<Door, MazeError>;
}

/// Plain rooms and walls.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFactory;

impl MazeFactory for StandardFactory {
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
}

/// Fancy rooms and fancy walls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FancyFactory;

impl MazeFactory for FancyFactory {
    fn make_maze(&self) -> Maze {
        Maze::new()
    }

    fn make_room(&self, id: RoomId) -> Room {
        Room::themed(id, Theme::Fancy)
    }

    fn make_wall(&self) -> MapSite {
        MapSite::Wall(Theme::Fancy)
    }

    fn make_door(&self, room_a: RoomId, room_b: RoomId) -> Result<Door, MazeError> {
        Door::new(room_a, room_b)
    }
}

/// Lays out the two-room maze using only the factory's operations.
///
/// Room 1's east side and room 2's west side share one closed door; every
/// other side is a wall. Traversal starts in room 1.
pub fn create_maze<F>(factory: &F) -> Result<Blueprint, MazeError>
where
    F: MazeFactory + ?Sized,
{
    let mut maze = factory.make_maze();
    let r1 = factory.make_room(1);
    let r2 = factory.make_room(2);
    let door = factory.make_door(r1.id(), r2.id())?;
    let (id1, id2) = (r1.id(), r2.id());

    maze.add_room(r1)?;
    maze.add_room(r2)?;
    let door = MapSite::Door(maze.add_door(door)?);

    maze.set_side(id1, Direction::North, factory.make_wall())?;
    maze.set_side(id1, Direction::East, door)?;
    maze.set_side(id1, Direction::South, factory.make_wall())?;
    maze.set_side(id1, Direction::West, factory.make_wall())?;

    maze.set_side(id2, Direction::North, factory.make_wall())?;
    maze.set_side(id2, Direction::East, factory.make_wall())?;
    maze.set_side(id2, Direction::South, factory.make_wall())?;
    maze.set_side(id2, Direction::West, door)?;

    maze.validate()?;
    Ok(Blueprint {
        maze,
        start: id1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_family_is_plain() {
        let blueprint = create_maze(&StandardFactory).unwrap();
        assert_eq!(blueprint.start, 1);
        assert_eq!(blueprint.maze.room_count(), 2);
        assert_eq!(blueprint.maze.door_count(), 1);
        for room in blueprint.maze.rooms() {
            assert_eq!(room.theme(), Theme::Standard);
        }
    }

    #[test]
    fn test_fancy_family_replaces_every_room_and_wall() {
        let blueprint = create_maze(&FancyFactory).unwrap();
        let mut walls = 0;
        for room in blueprint.maze.rooms() {
            assert_eq!(room.theme(), Theme::Fancy);
            for (_, site) in room.sides() {
                if let MapSite::Wall(theme) = site {
                    assert_eq!(theme, Theme::Fancy);
                    walls += 1;
                }
            }
        }
        assert_eq!(walls, 6);
    }

    #[test]
    fn test_factory_works_through_trait_object() {
        let factory: Box<dyn MazeFactory> = Box::new(FancyFactory);
        let blueprint = create_maze(factory.as_ref()).unwrap();
        assert!(blueprint.maze.validate().is_ok());
    }

    struct LoopingFactory;

    impl MazeFactory for LoopingFactory {
        fn make_maze(&self) -> Maze {
            Maze::new()
        }

        fn make_room(&self, _id: RoomId) -> Room {
            Room::new(1)
        }

        fn make_wall(&self) -> MapSite {
            MapSite::Wall(Theme::Standard)
        }

        fn make_door(&self, room_a: RoomId, room_b: RoomId) -> Result<Door, MazeError> {
            Door::new(room_a, room_b)
        }
    }

    #[test]
    fn test_factory_errors_abort_construction() {
        assert_eq!(
            create_maze(&LoopingFactory).map(|b| b.start),
            Err(MazeError::SelfLoopDoor(1))
        );
    }
}
