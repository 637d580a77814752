use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod agent;
pub mod builder;
pub mod creator;
pub mod factory;
pub mod game;
pub mod layout;
pub mod maze;
pub mod site;

/// Identifier of a room within one maze. Always positive.
pub type RoomId = u32;

/// Index of a door in the maze's door arena.
pub type DoorId = usize;

/// One of the four compass sides of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in slot order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Slot index of this direction inside a room.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction or command cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
    #[error("Empty command")]
    Empty,
    #[error("Too many words in command '{0}'")]
    TooManyWords(String),
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }
}

/// Variant family a room or wall belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Standard,
    Fancy,
    Dangerous,
}

/// Optional action attached to a direction. No action means "move".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Open,
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Action::Open),
            other => Err(ParseError::UnknownAction(other.to_string())),
        }
    }
}

/// A single command issued to the traversal controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Look,
    Move(Direction),
    Open(Direction),
}

impl Command {
    /// Splits the command into the `(direction, action)` pair used by
    /// [`game::Game::command`]. `Look` has no direction.
    pub fn parts(self) -> Option<(Direction, Option<Action>)> {
        match self {
            Command::Look => None,
            Command::Move(direction) => Some((direction, None)),
            Command::Open(direction) => Some((direction, Some(Action::Open))),
        }
    }
}

/// Accepts `look`, `<direction>`, `<direction> open` and `open <direction>`.
impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(ParseError::Empty),
            [word] if word.eq_ignore_ascii_case("look") => Ok(Command::Look),
            [word] => Ok(Command::Move(word.parse()?)),
            [first, second] => {
                if let Ok(Action::Open) = first.parse::<Action>() {
                    Ok(Command::Open(second.parse()?))
                } else {
                    let direction = first.parse()?;
                    match second.parse::<Action>()? {
                        Action::Open => Ok(Command::Open(direction)),
                    }
                }
            }
            _ => Err(ParseError::TooManyWords(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!("EAST".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("w".parse::<Direction>(), Ok(Direction::West));
        assert!(matches!(
            "up".parse::<Direction>(),
            Err(ParseError::UnknownDirection(_))
        ));
    }

    #[test]
    fn test_opposite_round_trips() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_command_forms() {
        assert_eq!("look".parse::<Command>(), Ok(Command::Look));
        assert_eq!("north".parse::<Command>(), Ok(Command::Move(Direction::North)));
        assert_eq!(
            "east open".parse::<Command>(),
            Ok(Command::Open(Direction::East))
        );
        assert_eq!(
            "open south".parse::<Command>(),
            Ok(Command::Open(Direction::South))
        );
        assert_eq!("   ".parse::<Command>(), Err(ParseError::Empty));
        assert!(matches!(
            "east kick".parse::<Command>(),
            Err(ParseError::UnknownAction(_))
        ));
        assert!(matches!(
            "east open now".parse::<Command>(),
            Err(ParseError::TooManyWords(_))
        ));
    }

    #[test]
    fn test_command_parts() {
        assert_eq!(Command::Look.parts(), None);
        assert_eq!(
            Command::Open(Direction::West).parts(),
            Some((Direction::West, Some(Action::Open)))
        );
    }
}
