use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Direction, DoorId, RoomId,
    site::{Door, MapSite, Room},
};

/// Represents errors raised while building or walking a maze.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("Room id {0} is already in use")]
    DuplicateRoom(RoomId),
    #[error("Room ids must be positive, got {0}")]
    InvalidRoomId(RoomId),
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),
    #[error("Door {0} not found")]
    DoorNotFound(DoorId),
    #[error("A door cannot connect room {0} to itself")]
    SelfLoopDoor(RoomId),
    #[error("Room {room} has no map site bound on its {direction} side")]
    UnboundSide { room: RoomId, direction: Direction },
    #[error("Entered a map site with no concrete binding from room {from}")]
    InvalidCapability { from: RoomId },
    #[error("Room {room} holds door {door}, which does not connect it")]
    DetachedDoor { door: DoorId, room: RoomId },
    #[error("No maze in progress; call build_maze first")]
    BuilderNotStarted,
}

/// An arena of rooms and the doors shared between them.
///
/// Rooms are keyed by id. Doors live in a flat vector and rooms refer to
/// them by index, so both sides of a door observe the same open state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rooms: HashMap<RoomId, Room>,
    doors: Vec<Door>,
}

impl Maze {
    /// Creates a new, empty maze.
    pub fn new() -> Self {
        Maze::default()
    }

    /// Inserts a room. Fails if the id is zero or already taken.
    pub fn add_room(&mut self, room: Room) -> Result<(), MazeError> {
        let id = room.id();
        if id == 0 {
            return Err(MazeError::InvalidRoomId(id));
        }
        if self.rooms.contains_key(&id) {
            tracing::warn!(room = id, "rejecting duplicate room");
            return Err(MazeError::DuplicateRoom(id));
        }
        self.rooms.insert(id, room);
        Ok(())
    }

    /// Stores a door and returns its handle. Both rooms must already exist.
    pub fn add_door(&mut self, door: Door) -> Result<DoorId, MazeError> {
        let (a, b) = door.rooms();
        for id in [a, b] {
            if !self.rooms.contains_key(&id) {
                return Err(MazeError::RoomNotFound(id));
            }
        }
        self.doors.push(door);
        Ok(self.doors.len() - 1)
    }

    /// Looks up a room. Returns `None` for an unknown id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id)
    }

    pub fn door_mut(&mut self, id: DoorId) -> Option<&mut Door> {
        self.doors.get_mut(id)
    }

    /// Binds `site` to a side of the room with the given id.
    pub fn set_side(
        &mut self,
        room: RoomId,
        direction: Direction,
        site: MapSite,
    ) -> Result<(), MazeError> {
        self.room_mut(room)
            .ok_or(MazeError::RoomNotFound(room))?
            .set_side(direction, site);
        Ok(())
    }

    pub fn contains_room(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn door_count(&self) -> usize {
        self.doors.len()
    }

    /// Room ids in ascending order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns an iterator over all rooms, in no particular order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Returns an iterator that yields `(DoorId, &Door)` for each door.
    pub fn doors(&self) -> impl Iterator<Item = (DoorId, &Door)> {
        self.doors.iter().enumerate()
    }

    /// Checks that the maze is ready for traversal.
    ///
    /// Every side of every room must be bound, every door a room points at
    /// must exist and connect that room, and every door must join two rooms
    /// of this maze. Rooms are checked in id order so the reported error is
    /// deterministic.
    pub fn validate(&self) -> Result<(), MazeError> {
        for id in self.room_ids() {
            let Some(room) = self.room(id) else {
                continue;
            };
            for (direction, site) in room.sides() {
                match site {
                    MapSite::Unbound => {
                        return Err(MazeError::UnboundSide { room: id, direction });
                    }
                    MapSite::Door(door_id) => {
                        let door = self.door(door_id).ok_or(MazeError::DoorNotFound(door_id))?;
                        if !door.connects(id) {
                            return Err(MazeError::DetachedDoor { door: door_id, room: id });
                        }
                    }
                    MapSite::Room(other) => {
                        if !self.contains_room(other) {
                            return Err(MazeError::RoomNotFound(other));
                        }
                    }
                    MapSite::Wall(_) => {}
                }
            }
        }
        for (_, door) in self.doors() {
            let (a, b) = door.rooms();
            for id in [a, b] {
                if !self.contains_room(id) {
                    return Err(MazeError::RoomNotFound(id));
                }
            }
        }
        Ok(())
    }
}
