#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six axis-aligned neighbor directions.
///
/// `Up` points towards smaller y and `Down` towards the ground (larger y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// -x
    Left,
    /// +x
    Right,
    /// -y
    Up,
    /// +y
    Down,
    /// +z
    Forward,
    /// -z
    Backward,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 6;

    /// Every direction, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Forward,
        Self::Backward,
    ];

    /// The four directions of a single layer.
    pub const PLANAR: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Position of this direction in per-direction arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Unit step `(dx, dy, dz)` along this direction.
    pub const fn offset(self) -> (isize, isize, isize) {
        match self {
            Self::Left => (-1, 0, 0),
            Self::Right => (1, 0, 0),
            Self::Up => (0, -1, 0),
            Self::Down => (0, 1, 0),
            Self::Forward => (0, 0, 1),
            Self::Backward => (0, 0, -1),
        }
    }

    /// Axis string used in catalogue files, such as `+x`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    /// Parses a direction by name (`"left"`) or signed axis (`"-x"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "-x" => Some(Self::Left),
            "right" | "+x" => Some(Self::Right),
            "up" | "-y" => Some(Self::Up),
            "down" | "+y" => Some(Self::Down),
            "forward" | "+z" => Some(Self::Forward),
            "backward" | "-z" => Some(Self::Backward),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether patterns, grids and adjacency live in one layer or in a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimensionality {
    Two,
    Three,
}

impl Dimensionality {
    /// Directions along which neighbors exist.
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::Two => &Direction::PLANAR,
            Self::Three => &Direction::ALL,
        }
    }

    /// Extent of a pattern of the given size along z.
    pub const fn depth_extent(self, size: usize) -> usize {
        match self {
            Self::Two => 1,
            Self::Three => size,
        }
    }
}
