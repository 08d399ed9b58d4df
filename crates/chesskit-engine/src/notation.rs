//! Move rendering in the algebraic notation family, plus UCI move parsing.
//!
//! Five styles are supported: SAN (standard algebraic), FAN (SAN with
//! Unicode figurines), LAN (long algebraic), RAN (reversible, which also
//! names the captured piece), and plain UCI move strings.

use thiserror::Error;

use chesskit_core::{Move, PieceType, Square};

use crate::movegen::{attacks, generate_moves};
use crate::position::{castle_targets, CastlingSide, Position};
use crate::Bitboard;

/// The supported output styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationStyle {
    /// Figurine algebraic notation.
    Fan,
    /// Standard algebraic notation.
    San,
    /// Long algebraic notation.
    Lan,
    /// Reversible algebraic notation.
    Ran,
    /// UCI move strings.
    Uci,
}

/// Error type for move strings supplied from outside.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    /// The string is not shaped like a move.
    #[error("malformed move string: {0}")]
    Malformed(String),
    /// The string is well-formed but no legal move matches it.
    #[error("move is not legal in this position: {0}")]
    Illegal(String),
}

/// Ambiguity flags collected while scanning rival movers.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
struct MoveAmbiguity(u8);

impl MoveAmbiguity {
    const NONE: MoveAmbiguity = MoveAmbiguity(0);
    /// Some rival piece of the same type also reaches the destination.
    const MOVE: MoveAmbiguity = MoveAmbiguity(0b001);
    /// A rival shares the mover's file.
    const FILE: MoveAmbiguity = MoveAmbiguity(0b010);
    /// A rival shares the mover's rank.
    const RANK: MoveAmbiguity = MoveAmbiguity(0b100);

    #[inline]
    fn add(&mut self, other: MoveAmbiguity) {
        self.0 |= other.0;
    }

    #[inline]
    const fn contains(self, other: MoveAmbiguity) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Renders a move in the given style.
///
/// The position must be the one the move is played from. The null move
/// renders as `(none)` in every style. All styles except UCI append `+`
/// when the move gives check and `#` when the opponent has no legal reply.
pub fn to_notation(position: &Position, m: Move, style: NotationStyle) -> String {
    if m.is_null() {
        return "(none)".to_string();
    }

    let mut s = match style {
        NotationStyle::Uci => return uci(position, m),
        NotationStyle::San => algebraic(position, m, false),
        NotationStyle::Fan => algebraic(position, m, true),
        NotationStyle::Lan => long_algebraic(m, false),
        NotationStyle::Ran => long_algebraic(m, true),
    };

    if let Some(suffix) = check_suffix(position, m) {
        s.push(suffix);
    }
    s
}

/// Matches a UCI move string against the legal move set.
///
/// Castling is accepted in both conventions: the standard king-destination
/// form (`e1g1`) and the king-takes-rook form (`e1h1`).
pub fn parse_uci_move(position: &Position, s: &str) -> Result<Move, ParseMoveError> {
    if !s.is_ascii()
        || !(4..=5).contains(&s.len())
        || Square::from_algebraic(&s[0..2]).is_none()
        || Square::from_algebraic(&s[2..4]).is_none()
        || (s.len() == 5 && !matches!(s.as_bytes()[4], b'q' | b'r' | b'b' | b'n'))
    {
        return Err(ParseMoveError::Malformed(s.to_string()));
    }

    for &m in &generate_moves(position) {
        if m.is_castling() {
            let (king_to, _) = castle_targets(position.side_to_move(), castle_side(m));
            let king_destination_form = format!("{}{}", m.from(), king_to);
            let king_takes_rook_form = format!("{}{}", m.from(), m.to());
            if s == king_destination_form || s == king_takes_rook_form {
                return Ok(m);
            }
        } else if m.to_uci() == s {
            return Ok(m);
        }
    }

    Err(ParseMoveError::Illegal(s.to_string()))
}

/// Castling direction from the king-from/rook-from encoding.
#[inline]
fn castle_side(m: Move) -> CastlingSide {
    if m.to().file().index() > m.from().file().index() {
        CastlingSide::King
    } else {
        CastlingSide::Queen
    }
}

fn castle_string(m: Move) -> &'static str {
    match castle_side(m) {
        CastlingSide::King => "O-O",
        CastlingSide::Queen => "O-O-O",
    }
}

/// SAN/FAN body (everything except the check suffix).
fn algebraic(position: &Position, m: Move, figurine: bool) -> String {
    if m.is_castling() {
        return castle_string(m).to_string();
    }

    let mut s = String::with_capacity(8);
    let moving = m.moving();
    let piece_type = moving.piece_type().expect("move carries its moving piece");

    if piece_type != PieceType::Pawn {
        if figurine {
            s.push(moving.to_figurine().expect("moving piece has a figurine"));
        } else {
            s.push(piece_type.to_pgn_char());
        }
        s.push_str(&disambiguation(position, m, piece_type));
    }

    if m.is_en_passant() {
        s.push_str("ep");
        s.push(m.from().file().to_char());
    } else if m.is_capture() {
        if piece_type == PieceType::Pawn {
            s.push(m.from().file().to_char());
        }
        s.push('x');
    }

    s.push_str(&m.to().to_algebraic());

    if m.is_promotion() {
        let promoted = m.promoted();
        s.push('=');
        if figurine {
            s.push(promoted.to_figurine().expect("promotion piece has a figurine"));
        } else {
            s.push(
                promoted
                    .piece_type()
                    .expect("promotion carries its piece")
                    .to_pgn_char(),
            );
        }
    }

    s
}

/// LAN/RAN body. RAN additionally names the captured piece after the `x`,
/// which makes the move string reversible.
fn long_algebraic(m: Move, reversible: bool) -> String {
    if m.is_castling() {
        return castle_string(m).to_string();
    }

    let mut s = String::with_capacity(8);
    let piece_type = m.moving().piece_type().expect("move carries its moving piece");

    if piece_type != PieceType::Pawn {
        s.push(piece_type.to_pgn_char());
    }
    s.push_str(&m.from().to_algebraic());

    if m.is_en_passant() {
        s.push_str("ep");
        s.push(m.from().file().to_char());
    } else if m.is_capture() {
        s.push('x');
        if reversible {
            s.push(
                m.captured()
                    .piece_type()
                    .expect("capture carries its victim")
                    .to_pgn_char(),
            );
        }
    } else {
        s.push('-');
    }

    s.push_str(&m.to().to_algebraic());

    if m.is_promotion() {
        s.push('=');
        s.push(
            m.promoted()
                .piece_type()
                .expect("promotion carries its piece")
                .to_pgn_char(),
        );
    }

    s
}

/// UCI body. Castling prints the standard king destination except in
/// Chess960, where the king-takes-rook form is the convention.
fn uci(position: &Position, m: Move) -> String {
    if m.is_castling() && !position.is_chess960() {
        let (king_to, _) = castle_targets(position.side_to_move(), castle_side(m));
        return format!("{}{}", m.from(), king_to);
    }
    m.to_uci()
}

/// Minimal SAN disambiguation, derived from the attack tables rather than a
/// full move list: find rival pieces of the same type attacking the
/// destination, drop the ones that are pinned off the line, and pick the
/// shortest qualifier that separates the mover from the survivors.
fn disambiguation(position: &Position, m: Move, piece_type: PieceType) -> String {
    // Pawns disambiguate by file in the capture syntax; there is only one
    // king.
    if matches!(piece_type, PieceType::Pawn | PieceType::King) {
        return String::new();
    }

    let us = position.side_to_move();
    let from = m.from();
    let to = m.to();
    let rivals = attacks::attacks(piece_type, us, to, position.occupied())
        & position.pieces_of(piece_type, us)
        & !Bitboard::from_square(from);

    let king_sq = position.king_square(us);
    let pinned = position.pinned();
    let moving = m.moving();

    let mut ambiguity = MoveAmbiguity::NONE;
    for rival in rivals {
        // A rival pinned off the destination line could not legally play
        // the same move, so it forces no qualifier.
        if pinned.contains(rival) && !attacks::line(king_sq, rival).contains(to) {
            continue;
        }
        if position.piece_at(rival) != moving {
            continue;
        }

        ambiguity.add(MoveAmbiguity::MOVE);
        if rival.file() == from.file() {
            ambiguity.add(MoveAmbiguity::FILE);
        }
        if rival.rank() == from.rank() {
            ambiguity.add(MoveAmbiguity::RANK);
        }
    }

    if !ambiguity.contains(MoveAmbiguity::MOVE) {
        String::new()
    } else if !ambiguity.contains(MoveAmbiguity::FILE) {
        from.file().to_char().to_string()
    } else if !ambiguity.contains(MoveAmbiguity::RANK) {
        from.rank().to_char().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Plays the move on a scratch copy and inspects the opponent's situation:
/// `#` for mate, `+` for a check with replies, nothing otherwise.
fn check_suffix(position: &Position, m: Move) -> Option<char> {
    let mut probe = position.clone();
    probe.do_move(m);
    if !probe.in_check() {
        return None;
    }
    if generate_moves(&probe).is_empty() {
        Some('#')
    } else {
        Some('+')
    }
}
