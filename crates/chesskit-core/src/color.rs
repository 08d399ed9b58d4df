//! The two sides of a chess game, with their relative geometry.

use std::fmt;
use std::ops::Not;

use crate::{Direction, Rank};

/// A side to move. Negating a color (`!color`) flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns 0 for White and 1 for Black, for table indexing.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the pawn-push direction for this side.
    #[inline]
    pub const fn forward(self) -> Direction {
        match self {
            Color::White => Direction::North,
            Color::Black => Direction::South,
        }
    }

    /// Returns the east-side pawn-attack direction for this side.
    #[inline]
    pub const fn forward_east(self) -> Direction {
        match self {
            Color::White => Direction::NorthEast,
            Color::Black => Direction::SouthEast,
        }
    }

    /// Returns the west-side pawn-attack direction for this side.
    #[inline]
    pub const fn forward_west(self) -> Direction {
        match self {
            Color::White => Direction::NorthWest,
            Color::Black => Direction::SouthWest,
        }
    }

    /// Returns the rank this side's pieces start on.
    #[inline]
    pub const fn back_rank(self) -> Rank {
        self.nth_rank(0)
    }

    /// Returns the relative third rank, where a pushed pawn may continue
    /// with a double step.
    #[inline]
    pub const fn third_rank(self) -> Rank {
        self.nth_rank(2)
    }

    /// Returns the relative seventh rank; pawns here promote on their next
    /// push.
    #[inline]
    pub const fn seventh_rank(self) -> Rank {
        self.nth_rank(6)
    }

    /// Returns the rank this side promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> Rank {
        self.nth_rank(7)
    }

    /// Returns the nth rank (0-based) counted from this side's back rank.
    #[inline]
    const fn nth_rank(self, n: u8) -> Rank {
        let index = match self {
            Color::White => n,
            Color::Black => 7 - n,
        };
        Rank::ALL[index as usize]
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}
