use core::fmt;
use serde::{Deserialize, Serialize};

/// The two seats at the table. South is the conventional human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerPosition {
    South = 0,
    North = 1,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 2] = [PlayerPosition::South, PlayerPosition::North];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::South),
            1 => Some(PlayerPosition::North),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> PlayerPosition {
        match self {
            PlayerPosition::South => PlayerPosition::North,
            PlayerPosition::North => PlayerPosition::South,
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPosition::South => "South",
            PlayerPosition::North => "North",
        };
        f.write_str(label)
    }
}
