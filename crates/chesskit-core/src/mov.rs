//! Move representation.

use crate::{Piece, Square};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of special move properties.
///
/// Every real move carries at least one flag, so the all-zero [`Move`] value
/// stays reserved for the null move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveTypes(u8);

impl MoveTypes {
    pub const QUIET: MoveTypes = MoveTypes(0b00_0001);
    pub const CAPTURE: MoveTypes = MoveTypes(0b00_0010);
    pub const EN_PASSANT: MoveTypes = MoveTypes(0b00_0100);
    pub const DOUBLE_PUSH: MoveTypes = MoveTypes(0b00_1000);
    pub const PROMOTION: MoveTypes = MoveTypes(0b01_0000);
    pub const CASTLE: MoveTypes = MoveTypes(0b10_0000);

    /// Creates a set from raw bits (masked to the six known flags).
    #[inline]
    pub const fn from_raw(bits: u8) -> Self {
        MoveTypes(bits & 0b11_1111)
    }

    /// Returns the raw flag bits.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns true if every flag in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: MoveTypes) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: MoveTypes) -> Self {
        MoveTypes(self.0 | other.0)
    }
}

impl BitOr for MoveTypes {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for MoveTypes {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MoveTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (flag, name) in [
            (MoveTypes::QUIET, "Quiet"),
            (MoveTypes::CAPTURE, "Capture"),
            (MoveTypes::EN_PASSANT, "EnPassant"),
            (MoveTypes::DOUBLE_PUSH, "DoublePush"),
            (MoveTypes::PROMOTION, "Promotion"),
            (MoveTypes::CASTLE, "Castle"),
        ] {
            if self.contains(flag) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

/// A chess move.
///
/// Packed into 32 bits: 6 bits from, 6 bits to, 6 bits type flags, then
/// three 4-bit piece fields (moving, captured, promoted). Equal moves compare
/// equal by value.
///
/// Castling moves store the king's start square as `from` and the *rook's*
/// start square as `to`, which encodes Chess960 castling without extra state.
/// The notation layer translates this to the standard king destination for
/// display.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// The null move. Returned only by explicit null-move paths, never by
    /// move generation.
    pub const NULL: Move = Move(0);

    const fn encode(
        from: Square,
        to: Square,
        types: MoveTypes,
        moving: Piece,
        captured: Piece,
        promoted: Piece,
    ) -> Self {
        Move(
            from.index() as u32
                | (to.index() as u32) << 6
                | (types.raw() as u32) << 12
                | (moving.raw() as u32) << 18
                | (captured.raw() as u32) << 22
                | (promoted.raw() as u32) << 26,
        )
    }

    /// Creates a quiet (non-capturing) move.
    #[inline]
    pub const fn quiet(moving: Piece, from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveTypes::QUIET, moving, Piece::NONE, Piece::NONE)
    }

    /// Creates a capture.
    #[inline]
    pub const fn capture(moving: Piece, captured: Piece, from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveTypes::CAPTURE, moving, captured, Piece::NONE)
    }

    /// Creates a pawn double push.
    #[inline]
    pub const fn double_push(moving: Piece, from: Square, to: Square) -> Self {
        Self::encode(
            from,
            to,
            MoveTypes::QUIET.union(MoveTypes::DOUBLE_PUSH),
            moving,
            Piece::NONE,
            Piece::NONE,
        )
    }

    /// Creates a quiet promotion.
    #[inline]
    pub const fn promotion(moving: Piece, from: Square, to: Square, promoted: Piece) -> Self {
        Self::encode(
            from,
            to,
            MoveTypes::QUIET.union(MoveTypes::PROMOTION),
            moving,
            Piece::NONE,
            promoted,
        )
    }

    /// Creates a capturing promotion.
    #[inline]
    pub const fn capture_promotion(
        moving: Piece,
        captured: Piece,
        from: Square,
        to: Square,
        promoted: Piece,
    ) -> Self {
        Self::encode(
            from,
            to,
            MoveTypes::CAPTURE.union(MoveTypes::PROMOTION),
            moving,
            captured,
            promoted,
        )
    }

    /// Creates an en-passant capture. `to` is the en-passant target square;
    /// the captured pawn sits behind it.
    #[inline]
    pub const fn en_passant(moving: Piece, captured: Piece, from: Square, to: Square) -> Self {
        Self::encode(
            from,
            to,
            MoveTypes::CAPTURE.union(MoveTypes::EN_PASSANT),
            moving,
            captured,
            Piece::NONE,
        )
    }

    /// Creates a castling move. `king_from` is the king's start square,
    /// `rook_from` the rook's.
    #[inline]
    pub const fn castle(king: Piece, king_from: Square, rook_from: Square) -> Self {
        Self::encode(
            king_from,
            rook_from,
            MoveTypes::CASTLE,
            king,
            Piece::NONE,
            Piece::NONE,
        )
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index.
        unsafe { Square::from_index_unchecked((self.0 & 0x3F) as u8) }
    }

    /// Returns the destination square (the rook's start square for castling).
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index.
        unsafe { Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as u8) }
    }

    /// Returns the move-type flag set.
    #[inline]
    pub const fn move_types(self) -> MoveTypes {
        MoveTypes::from_raw(((self.0 >> 12) & 0x3F) as u8)
    }

    /// Returns the moving piece.
    #[inline]
    pub const fn moving(self) -> Piece {
        Piece::from_raw(((self.0 >> 18) & 0x0F) as u8)
    }

    /// Returns the captured piece, or [`Piece::NONE`] for non-captures.
    #[inline]
    pub const fn captured(self) -> Piece {
        Piece::from_raw(((self.0 >> 22) & 0x0F) as u8)
    }

    /// Returns the promotion piece, or [`Piece::NONE`] for non-promotions.
    #[inline]
    pub const fn promoted(self) -> Piece {
        Piece::from_raw(((self.0 >> 26) & 0x0F) as u8)
    }

    /// Returns true for the null move.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns true for non-capturing moves.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        self.move_types().contains(MoveTypes::QUIET)
    }

    /// Returns true for captures (including en passant).
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.move_types().contains(MoveTypes::CAPTURE)
    }

    /// Returns true for en-passant captures.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.move_types().contains(MoveTypes::EN_PASSANT)
    }

    /// Returns true for pawn double pushes.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.move_types().contains(MoveTypes::DOUBLE_PUSH)
    }

    /// Returns true for promotions (quiet or capturing).
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.move_types().contains(MoveTypes::PROMOTION)
    }

    /// Returns true for castling moves.
    #[inline]
    pub const fn is_castling(self) -> bool {
        self.move_types().contains(MoveTypes::CASTLE)
    }

    /// Returns the raw `<from><to>[promotion]` string for this move.
    ///
    /// Castling moves print the rook square as destination here; the
    /// notation layer owns the standard-chess king-destination translation.
    pub fn to_uci(self) -> String {
        let mut s = format!("{}{}", self.from(), self.to());
        if self.is_promotion() {
            if let Some(pt) = self.promoted().piece_type() {
                s.push(pt.to_pgn_char().to_ascii_lowercase());
            }
        }
        s
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Move(none)")
        } else {
            write!(f, "Move({})", self.to_uci())
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, File, PieceType, Rank};
    use proptest::prelude::*;

    const WHITE_PAWN: Piece = Piece::new(PieceType::Pawn, Color::White);
    const WHITE_KING: Piece = Piece::new(PieceType::King, Color::White);
    const BLACK_PAWN: Piece = Piece::new(PieceType::Pawn, Color::Black);
    const BLACK_KNIGHT: Piece = Piece::new(PieceType::Knight, Color::Black);

    #[test]
    fn move_types_flags() {
        let types = MoveTypes::CAPTURE | MoveTypes::EN_PASSANT;
        assert!(types.contains(MoveTypes::CAPTURE));
        assert!(types.contains(MoveTypes::EN_PASSANT));
        assert!(!types.contains(MoveTypes::QUIET));
        assert!(!types.contains(MoveTypes::CASTLE));
    }

    #[test]
    fn quiet_move_fields() {
        let e2 = Square::new(File::E, Rank::R2);
        let e3 = Square::new(File::E, Rank::R3);
        let m = Move::quiet(WHITE_PAWN, e2, e3);

        assert_eq!(m.from(), e2);
        assert_eq!(m.to(), e3);
        assert_eq!(m.moving(), WHITE_PAWN);
        assert_eq!(m.captured(), Piece::NONE);
        assert_eq!(m.promoted(), Piece::NONE);
        assert!(m.is_quiet());
        assert!(!m.is_capture());
        assert!(!m.is_null());
    }

    #[test]
    fn capture_move_fields() {
        let e4 = Square::new(File::E, Rank::R4);
        let d5 = Square::new(File::D, Rank::R5);
        let m = Move::capture(WHITE_PAWN, BLACK_KNIGHT, e4, d5);

        assert!(m.is_capture());
        assert!(!m.is_quiet());
        assert!(!m.is_en_passant());
        assert_eq!(m.captured(), BLACK_KNIGHT);
    }

    #[test]
    fn double_push_fields() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let m = Move::double_push(WHITE_PAWN, e2, e4);

        assert!(m.is_quiet());
        assert!(m.is_double_push());
        assert!(!m.is_capture());
    }

    #[test]
    fn promotion_fields() {
        let e7 = Square::new(File::E, Rank::R7);
        let e8 = Square::new(File::E, Rank::R8);
        let queen = Piece::new(PieceType::Queen, Color::White);
        let m = Move::promotion(WHITE_PAWN, e7, e8, queen);

        assert!(m.is_promotion());
        assert!(m.is_quiet());
        assert_eq!(m.promoted(), queen);
        assert_eq!(m.to_uci(), "e7e8q");
    }

    #[test]
    fn capture_promotion_fields() {
        let e7 = Square::new(File::E, Rank::R7);
        let d8 = Square::new(File::D, Rank::R8);
        let rook = Piece::new(PieceType::Rook, Color::White);
        let captured = Piece::new(PieceType::Bishop, Color::Black);
        let m = Move::capture_promotion(WHITE_PAWN, captured, e7, d8, rook);

        assert!(m.is_promotion());
        assert!(m.is_capture());
        assert_eq!(m.captured(), captured);
        assert_eq!(m.promoted(), rook);
        assert_eq!(m.to_uci(), "e7d8r");
    }

    #[test]
    fn en_passant_fields() {
        let e5 = Square::new(File::E, Rank::R5);
        let d6 = Square::new(File::D, Rank::R6);
        let m = Move::en_passant(WHITE_PAWN, BLACK_PAWN, e5, d6);

        assert!(m.is_capture());
        assert!(m.is_en_passant());
        assert_eq!(m.captured(), BLACK_PAWN);
    }

    #[test]
    fn castle_fields() {
        let m = Move::castle(WHITE_KING, Square::E1, Square::H1);

        assert!(m.is_castling());
        assert!(!m.is_capture());
        assert_eq!(m.from(), Square::E1);
        assert_eq!(m.to(), Square::H1);
        assert_eq!(m.moving(), WHITE_KING);
    }

    #[test]
    fn null_move() {
        assert!(Move::NULL.is_null());
        assert!(!Move::NULL.is_quiet());
        assert!(!Move::NULL.is_capture());
        // Real moves always carry a flag, so they never collide with NULL.
        let m = Move::quiet(WHITE_PAWN, Square::A1, Square::A1);
        assert!(!m.is_null());
    }

    #[test]
    fn uci_strings() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(Move::double_push(WHITE_PAWN, e2, e4).to_uci(), "e2e4");

        let g1 = Square::G1;
        let f3 = Square::new(File::F, Rank::R3);
        let knight = Piece::new(PieceType::Knight, Color::White);
        assert_eq!(Move::quiet(knight, g1, f3).to_uci(), "g1f3");
    }

    proptest! {
        #[test]
        fn packing_roundtrip(
            from in 0u8..64,
            to in 0u8..64,
            moving in 0u8..12,
            captured in 0u8..12,
            promoted in 0u8..12,
        ) {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let piece = |i: u8| {
                Piece::new(
                    PieceType::ALL[(i % 6) as usize],
                    if i < 6 { Color::White } else { Color::Black },
                )
            };
            let m = Move::encode(
                from,
                to,
                MoveTypes::CAPTURE.union(MoveTypes::PROMOTION),
                piece(moving),
                piece(captured),
                piece(promoted),
            );
            prop_assert_eq!(m.from(), from);
            prop_assert_eq!(m.to(), to);
            prop_assert_eq!(m.moving(), piece(moving));
            prop_assert_eq!(m.captured(), piece(captured));
            prop_assert_eq!(m.promoted(), piece(promoted));
            prop_assert!(m.is_capture() && m.is_promotion());
        }
    }
}
