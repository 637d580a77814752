use std::{collections::HashSet, str::FromStr};

use crate::{
    Direction, ParseError, RoomId,
    builder::MazeBuilder,
    game::Blueprint,
    maze::MazeError,
};

/// Represents errors raised while reading a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Layout declares no rooms")]
    Empty,
    #[error("Unknown keyword '{keyword}' on line {line}")]
    UnknownKeyword { line: usize, keyword: String },
    #[error("'{keyword}' on line {line} takes {expected} arguments, found {found}")]
    Arity {
        line: usize,
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid room id '{token}' on line {line}")]
    BadNumber { line: usize, token: String },
    #[error("Invalid direction on line {line}")]
    BadDirection {
        line: usize,
        #[source]
        error: ParseError,
    },
    #[error("Multiple 'start' lines (second on line {line})")]
    DuplicateStart { line: usize },
    #[error("Door on line {line} references undeclared room {room}")]
    UndeclaredRoom { line: usize, room: RoomId },
    #[error("Start room {0} is never declared")]
    UnknownStart(RoomId),
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// A door line: two rooms and the side of each the door is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorSpec {
    pub room_a: RoomId,
    pub side_a: Direction,
    pub room_b: RoomId,
    pub side_b: Direction,
}

/// A parsed layout, ready to drive any [`MazeBuilder`].
///
/// ```text
/// # two rooms joined east to west
/// start 1
/// room 1
/// room 2
/// door 1 east 2 west
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rooms: Vec<RoomId>,
    doors: Vec<DoorSpec>,
    start: RoomId,
}

impl Layout {
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn doors(&self) -> &[DoorSpec] {
        &self.doors
    }

    pub fn start(&self) -> RoomId {
        self.start
    }

    /// Issues the builder calls for this layout: every room first, then
    /// every door, then finalizes.
    pub fn direct<B>(&self, builder: &mut B) -> Result<Blueprint, MazeError>
    where
        B: MazeBuilder + ?Sized,
    {
        builder.build_maze();
        for &id in &self.rooms {
            builder.build_room(id)?;
        }
        for door in &self.doors {
            builder.build_door(door.room_a, door.side_a, door.room_b, door.side_b)?;
        }
        Ok(Blueprint {
            maze: builder.get_maze()?,
            start: self.start,
        })
    }
}

fn parse_room(line: usize, token: &str) -> Result<RoomId, LayoutError> {
    token.parse().map_err(|_| LayoutError::BadNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_direction(line: usize, token: &str) -> Result<Direction, LayoutError> {
    token
        .parse()
        .map_err(|error| LayoutError::BadDirection { line, error })
}

fn expect_args(
    line: usize,
    keyword: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), LayoutError> {
    if args.len() != expected {
        return Err(LayoutError::Arity {
            line,
            keyword,
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rooms = Vec::new();
        let mut declared = HashSet::new();
        let mut doors = Vec::new();
        let mut start = None;

        // Doors are checked after all lines are read so they can name rooms
        // declared further down.
        let mut door_lines = Vec::new();

        for (index, raw) in s.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let Some((keyword, args)) = tokens.split_first() else {
                continue;
            };
            match keyword.to_ascii_lowercase().as_str() {
                "room" => {
                    expect_args(line, "room", args, 1)?;
                    let id = parse_room(line, args[0])?;
                    if declared.insert(id) {
                        rooms.push(id);
                    }
                }
                "door" => {
                    expect_args(line, "door", args, 4)?;
                    let spec = DoorSpec {
                        room_a: parse_room(line, args[0])?,
                        side_a: parse_direction(line, args[1])?,
                        room_b: parse_room(line, args[2])?,
                        side_b: parse_direction(line, args[3])?,
                    };
                    door_lines.push(line);
                    doors.push(spec);
                }
                "start" => {
                    expect_args(line, "start", args, 1)?;
                    if start.is_some() {
                        return Err(LayoutError::DuplicateStart { line });
                    }
                    start = Some(parse_room(line, args[0])?);
                }
                other => {
                    return Err(LayoutError::UnknownKeyword {
                        line,
                        keyword: other.to_string(),
                    });
                }
            }
        }

        let first = *rooms.first().ok_or(LayoutError::Empty)?;
        for (spec, line) in doors.iter().zip(door_lines) {
            for room in [spec.room_a, spec.room_b] {
                if !declared.contains(&room) {
                    return Err(LayoutError::UndeclaredRoom { line, room });
                }
            }
        }
        let start = start.unwrap_or(first);
        if !declared.contains(&start) {
            return Err(LayoutError::UnknownStart(start));
        }

        Ok(Layout {
            rooms,
            doors,
            start,
        })
    }
}

/// Parses a layout and builds it with `builder`.
pub fn load_layout<B>(source: &str, builder: &mut B) -> Result<Blueprint, LayoutError>
where
    B: MazeBuilder + ?Sized,
{
    let layout: Layout = source.parse()?;
    Ok(layout.direct(builder)?)
}
