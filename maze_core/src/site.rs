use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

use crate::{
    Direction, RoomId, Theme,
    maze::{Maze, MazeError},
};

/// Anything that can occupy a side of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapSite {
    /// A slot nothing has been bound to yet. Only exists mid-construction.
    #[default]
    Unbound,
    Wall(Theme),
    Door(crate::DoorId),
    Room(RoomId),
}

impl MapSite {
    /// Enters this site from `from`.
    ///
    /// Walls and closed doors block and report it through the returned
    /// [`Event`]. An open door or a room yields [`Event::EnteredRoom`].
    /// Entering an [`MapSite::Unbound`] slot is a hard error.
    pub fn enter(&self, maze: &Maze, from: RoomId) -> Result<Event, MazeError> {
        match *self {
            MapSite::Unbound => Err(MazeError::InvalidCapability { from }),
            MapSite::Wall(theme) => Ok(Event::BumpedWall { theme }),
            MapSite::Door(door) => maze
                .door(door)
                .ok_or(MazeError::DoorNotFound(door))?
                .enter(maze, from),
            MapSite::Room(room) => Ok(maze
                .room(room)
                .ok_or(MazeError::RoomNotFound(room))?
                .enter()),
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !matches!(self, MapSite::Unbound)
    }
}

/// A room with four directional sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    theme: Theme,
    sides: [MapSite; 4],
}

impl Room {
    /// Creates a standard room with every side unbound.
    pub fn new(id: RoomId) -> Self {
        Room::themed(id, Theme::Standard)
    }

    pub fn themed(id: RoomId, theme: Theme) -> Self {
        Room {
            id,
            theme,
            sides: [MapSite::Unbound; 4],
        }
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[inline]
    pub fn side(&self, direction: Direction) -> MapSite {
        self.sides[direction.index()]
    }

    /// Binds a side. Construction strategies are the only callers.
    pub fn set_side(&mut self, direction: Direction, site: MapSite) {
        tracing::trace!(room = self.id, %direction, ?site, "binding side");
        self.sides[direction.index()] = site;
    }

    /// Returns `(direction, site)` for all four sides in slot order.
    pub fn sides(&self) -> impl Iterator<Item = (Direction, MapSite)> + '_ {
        Direction::ALL.into_iter().map(|d| (d, self.side(d)))
    }

    /// Directions that have not been bound yet.
    pub fn unbound_sides(&self) -> impl Iterator<Item = Direction> + '_ {
        self.sides()
            .filter(|(_, site)| !site.is_bound())
            .map(|(direction, _)| direction)
    }

    pub fn is_complete(&self) -> bool {
        self.sides.iter().all(MapSite::is_bound)
    }

    /// Entering a room always succeeds.
    pub fn enter(&self) -> Event {
        Event::EnteredRoom {
            room: self.id,
            theme: self.theme,
        }
    }
}

impl Index<Direction> for Room {
    type Output = MapSite;

    #[inline]
    fn index(&self, direction: Direction) -> &Self::Output {
        &self.sides[direction.index()]
    }
}

impl IndexMut<Direction> for Room {
    #[inline]
    fn index_mut(&mut self, direction: Direction) -> &mut Self::Output {
        &mut self.sides[direction.index()]
    }
}

/// A door shared by the two rooms it connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    room_a: RoomId,
    room_b: RoomId,
    open: bool,
}

impl Door {
    /// Creates a closed door between two distinct rooms.
    pub fn new(room_a: RoomId, room_b: RoomId) -> Result<Self, MazeError> {
        if room_a == room_b {
            return Err(MazeError::SelfLoopDoor(room_a));
        }
        Ok(Door {
            room_a,
            room_b,
            open: false,
        })
    }

    #[inline]
    pub fn rooms(&self) -> (RoomId, RoomId) {
        (self.room_a, self.room_b)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn connects(&self, room: RoomId) -> bool {
        self.room_a == room || self.room_b == room
    }

    /// The room on the far side when leaving `from`.
    ///
    /// Anything other than `room_a` is treated as `room_a`'s counterpart, so
    /// `room_b` and unrelated ids both resolve to `room_a`.
    pub fn other_side(&self, from: RoomId) -> RoomId {
        if from == self.room_a {
            self.room_b
        } else {
            self.room_a
        }
    }

    /// Opens the door. Opening an open door leaves it open.
    pub fn open(&mut self) -> Event {
        let already_open = self.open;
        self.open = true;
        Event::DoorOpened { already_open }
    }

    pub fn enter(&self, maze: &Maze, from: RoomId) -> Result<Event, MazeError> {
        if !self.open {
            return Ok(Event::BumpedClosedDoor);
        }
        let next = self.other_side(from);
        maze.room(next)
            .map(Room::enter)
            .ok_or(MazeError::RoomNotFound(next))
    }
}

/// Notification produced by a traversal command. Each variant is one
/// category of message; `Display` renders the text shown to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    EnteredRoom { room: RoomId, theme: Theme },
    BumpedWall { theme: Theme },
    BumpedClosedDoor,
    DoorOpened { already_open: bool },
    CannotOpen { direction: Direction },
}

impl Event {
    /// The room this event moved into, if any.
    pub fn entered_room(&self) -> Option<RoomId> {
        match self {
            Event::EnteredRoom { room, .. } => Some(*room),
            _ => None,
        }
    }

    /// True for wall and closed door bumps.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Event::BumpedWall { .. } | Event::BumpedClosedDoor)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::EnteredRoom { room, theme } => {
                write!(f, "You are in room number {room}")?;
                match theme {
                    Theme::Standard => Ok(()),
                    Theme::Fancy => write!(f, "\nTHIS is a FANCY room!"),
                    Theme::Dangerous => write!(f, "\nWATCH OUT! THIS is a DANGEROUS room!"),
                }
            }
            Event::BumpedWall { theme } => match theme {
                Theme::Standard => write!(f, "You bump into a wall"),
                Theme::Fancy => write!(f, "You run into a FANCY wall. It makes you feel FANCY"),
                Theme::Dangerous => write!(f, "OUCH THE WALL HURT YOU! THAT WAS DANGEROUS!"),
            },
            Event::BumpedClosedDoor => write!(f, "ouch, you bumped your nose on the door"),
            Event::DoorOpened { .. } => write!(f, "you open the door"),
            Event::CannotOpen { .. } => write!(f, "you can't open that"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_has_no_bound_sides() {
        let room = Room::new(7);
        assert_eq!(room.unbound_sides().count(), 4);
        assert!(!room.is_complete());
    }

    #[test]
    fn test_set_side_and_index() {
        let mut room = Room::themed(1, Theme::Fancy);
        room.set_side(Direction::North, MapSite::Wall(Theme::Fancy));
        room[Direction::South] = MapSite::Door(3);
        assert_eq!(room.side(Direction::North), MapSite::Wall(Theme::Fancy));
        assert_eq!(room[Direction::South], MapSite::Door(3));
        assert_eq!(
            room.unbound_sides().collect::<Vec<_>>(),
            vec![Direction::East, Direction::West]
        );
    }

    #[test]
    fn test_door_rejects_self_loop() {
        assert_eq!(Door::new(4, 4), Err(MazeError::SelfLoopDoor(4)));
    }

    #[test]
    fn test_other_side_resolution() {
        let door = Door::new(1, 2).unwrap();
        assert_eq!(door.other_side(1), 2);
        assert_eq!(door.other_side(2), 1);
        assert!(door.connects(1) && door.connects(2) && !door.connects(3));
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut door = Door::new(1, 2).unwrap();
        assert!(!door.is_open());
        assert_eq!(door.open(), Event::DoorOpened { already_open: false });
        assert_eq!(door.open(), Event::DoorOpened { already_open: true });
        assert!(door.is_open());
    }

    #[test]
    fn test_event_text() {
        let fancy = Event::EnteredRoom {
            room: 2,
            theme: Theme::Fancy,
        };
        assert_eq!(fancy.to_string(), "You are in room number 2\nTHIS is a FANCY room!");
        assert_eq!(fancy.entered_room(), Some(2));
        assert_eq!(
            Event::BumpedWall {
                theme: Theme::Standard
            }
            .to_string(),
            "You bump into a wall"
        );
        assert!(Event::BumpedClosedDoor.is_blocked());
        assert!(
            !Event::CannotOpen {
                direction: Direction::North
            }
            .is_blocked()
        );
    }
}
