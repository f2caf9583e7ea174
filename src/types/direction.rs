//! Facing direction.

use std::fmt;

/// Direction a character faces or moves in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Down,
    Left,
    Up,
    Right,
    /// Value outside the four compass directions.
    Other(u8),
}

impl Direction {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Down,
            1 => Self::Left,
            2 => Self::Up,
            3 => Self::Right,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Down => 0,
            Self::Left => 1,
            Self::Up => 2,
            Self::Right => 3,
            Self::Other(byte) => byte,
        }
    }

    /// Tile offset of one step in this direction. `Other` does not move.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Other(_) => (0, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Up => f.write_str("up"),
            Self::Right => f.write_str("right"),
            Self::Other(byte) => write!(f, "direction({byte})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_bytes() {
        for byte in 0..=u8::MAX {
            assert_eq!(Direction::from_byte(byte).to_byte(), byte);
        }
        assert_eq!(Direction::from_byte(3), Direction::Right);
        assert_eq!(Direction::from_byte(9), Direction::Other(9));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Other(7).delta(), (0, 0));
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
