//! Chess position representation with incremental make/unmake.

use std::cell::Cell;

use chesskit_core::{Color, FenError, FenRecord, File, Move, Piece, PieceType, Square};

use crate::movegen::attacks;
use crate::zobrist::KEYS;
use crate::Bitboard;

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CastlingSide {
    King = 0,
    Queen = 1,
}

impl CastlingSide {
    /// Both sides, king side first.
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];

    /// Returns the index (0 for king side, 1 for queen side).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Castling rights flags, one bit per (color, side) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Returns the bit mask for one (color, side) pair.
    #[inline]
    pub const fn mask(color: Color, side: CastlingSide) -> u8 {
        1 << (color.index() * 2 + side.index())
    }

    /// Creates rights from raw flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side may still castle in the given
    /// direction.
    #[inline]
    pub const fn can_castle(self, color: Color, side: CastlingSide) -> bool {
        self.0 & Self::mask(color, side) != 0
    }

    /// Returns true if the given color holds any castling right.
    #[inline]
    pub const fn any_for(self, color: Color) -> bool {
        self.0 & (Self::mask(color, CastlingSide::King) | Self::mask(color, CastlingSide::Queen))
            != 0
    }

    /// Grants one right.
    #[inline]
    pub fn add(&mut self, color: Color, side: CastlingSide) {
        self.0 |= Self::mask(color, side);
    }

    /// Revokes one right.
    #[inline]
    pub fn discard(&mut self, color: Color, side: CastlingSide) {
        self.0 &= !Self::mask(color, side);
    }

    /// Revokes both rights of a color.
    #[inline]
    pub fn discard_color(&mut self, color: Color) {
        self.0 &=
            !(Self::mask(color, CastlingSide::King) | Self::mask(color, CastlingSide::Queen));
    }

    /// Returns true if no right remains.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Returns the standard destination squares `(king_to, rook_to)` for a
/// castling move. These are the same in Chess960; only the start squares
/// vary.
#[inline]
pub const fn castle_targets(color: Color, side: CastlingSide) -> (Square, Square) {
    let back = color.back_rank();
    match side {
        CastlingSide::King => (
            Square::new(File::G, back),
            Square::new(File::F, back),
        ),
        CastlingSide::Queen => (
            Square::new(File::C, back),
            Square::new(File::D, back),
        ),
    }
}

/// Per-ply state, kept in an arena owned by [`Position`]. Pushed by
/// [`Position::do_move`] and popped by [`Position::undo_move`]; the previous
/// entry is the state one move ago.
#[derive(Debug, Clone)]
struct State {
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    /// Piece removed by the move that produced this state (for unmake).
    captured: Piece,
    /// The move that produced this state.
    last_move: Move,
    /// Whether the side to move is in check. Derived from the board and
    /// recomputed on every move.
    in_check: bool,
    zobrist: u64,
    /// Pieces of the side to move pinned to their own king. Derived from the
    /// board; filled on first request and discarded with the state.
    pinned: Cell<Option<Bitboard>>,
}

impl State {
    fn new(
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        captured: Piece,
        last_move: Move,
        in_check: bool,
        zobrist: u64,
    ) -> Self {
        State {
            castling,
            en_passant,
            halfmove_clock,
            captured,
            last_move,
            in_check,
            zobrist,
            pinned: Cell::new(None),
        }
    }
}

/// Complete chess position.
///
/// Owns a 64-slot piece board, one bitboard per piece type and per color,
/// and the chain of per-ply [`State`]s that makes [`undo_move`] exact.
/// A position is cheap to query and mutate but holds interior mutability
/// (the lazy pinned cache), so share it across threads only behind external
/// synchronization; independent clones may be searched in parallel freely.
///
/// [`undo_move`]: Position::undo_move
#[derive(Debug, Clone)]
pub struct Position {
    board: [Piece; 64],
    piece_bbs: [Bitboard; 6],
    color_bbs: [Bitboard; 2],
    side_to_move: Color,
    fullmove_number: u32,
    chess960: bool,
    /// Initial rook square per (color, castling side); `None` once the
    /// matching right is unavailable from the start.
    castling_rooks: [[Option<Square>; 2]; 2],
    states: Vec<State>,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenRecord::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling rights may be given as `KQkq` or as Chess960 file letters;
    /// the position is flagged as Chess960 when the letters or the inferred
    /// king/rook placement are non-standard.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenRecord::parse(fen)?;
        let mut position = Position {
            board: [Piece::NONE; 64],
            piece_bbs: [Bitboard::EMPTY; 6],
            color_bbs: [Bitboard::EMPTY; 2],
            side_to_move: parsed.side_to_move,
            fullmove_number: parsed.fullmove_number,
            chess960: false,
            castling_rooks: [[None; 2]; 2],
            states: Vec::new(),
        };

        for (sq, piece) in parsed.pieces() {
            position.put(piece, sq);
        }

        for color in [Color::White, Color::Black] {
            let kings = position.pieces_of(PieceType::King, color);
            if kings.count() != 1 {
                return Err(FenError::Unplayable(format!(
                    "{} must have exactly one king",
                    color
                )));
            }
        }

        let castling = position.parse_castling(&parsed.castling)?;
        let en_passant = parsed.en_passant;

        let us = position.side_to_move;
        let in_check = position.is_square_attacked(position.king_square(us), us.opposite());
        let zobrist = position.compute_zobrist(castling, en_passant);
        position.states.push(State::new(
            castling,
            en_passant,
            parsed.halfmove_clock,
            Piece::NONE,
            Move::NULL,
            in_check,
            zobrist,
        ));

        Ok(position)
    }

    /// Resolves the castling-rights field against the board, recording each
    /// right's rook start square.
    fn parse_castling(&mut self, field: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        if field == "-" {
            return Ok(rights);
        }

        for c in field.chars() {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let king_file = self.king_square(color).file();
            let back_rank = color.back_rank();
            let rooks = self.pieces_of(PieceType::Rook, color) & Bitboard::rank(back_rank);

            let (side, rook_sq) = match c.to_ascii_lowercase() {
                'k' => {
                    // Outermost rook on the king's east side.
                    let mut found = None;
                    for sq in rooks {
                        if sq.file().index() > king_file.index() {
                            found = Some(sq);
                        }
                    }
                    (CastlingSide::King, found)
                }
                'q' => {
                    // Outermost rook on the king's west side.
                    let mut found = None;
                    for sq in rooks {
                        if sq.file().index() < king_file.index() {
                            found = Some(sq);
                            break;
                        }
                    }
                    (CastlingSide::Queen, found)
                }
                file_char => {
                    self.chess960 = true;
                    let file = match File::from_char(file_char) {
                        Some(f) => f,
                        None => {
                            return Err(FenError::Castling(format!(
                                "unexpected character '{}'",
                                c
                            )))
                        }
                    };
                    let sq = Square::new(file, back_rank);
                    let side = if file.index() > king_file.index() {
                        CastlingSide::King
                    } else {
                        CastlingSide::Queen
                    };
                    (side, rooks.contains(sq).then_some(sq))
                }
            };

            let rook_sq = rook_sq.ok_or_else(|| {
                FenError::Unplayable(format!("no rook for castling right '{}'", c))
            })?;
            rights.add(color, side);
            self.castling_rooks[color.index()][side.index()] = Some(rook_sq);
        }

        // Non-standard king or rook start squares mean Chess960 even when
        // the rights were spelled KQkq.
        for color in [Color::White, Color::Black] {
            if !rights.any_for(color) {
                continue;
            }
            let standard_king = Square::new(File::E, color.back_rank());
            if self.king_square(color) != standard_king {
                self.chess960 = true;
            }
            for side in CastlingSide::BOTH {
                let corner = match side {
                    CastlingSide::King => Square::new(File::H, color.back_rank()),
                    CastlingSide::Queen => Square::new(File::A, color.back_rank()),
                };
                if let Some(rook) = self.castling_rooks[color.index()][side.index()] {
                    if rook != corner {
                        self.chess960 = true;
                    }
                }
            }
        }

        Ok(rights)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some(c) = self.piece_at(sq).to_fen_char() {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(c);
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let castling = self.castling_rights();
        if castling.is_empty() {
            fen.push('-');
        } else {
            for (color, side, standard) in [
                (Color::White, CastlingSide::King, 'K'),
                (Color::White, CastlingSide::Queen, 'Q'),
                (Color::Black, CastlingSide::King, 'k'),
                (Color::Black, CastlingSide::Queen, 'q'),
            ] {
                if !castling.can_castle(color, side) {
                    continue;
                }
                if self.chess960 {
                    let rook = self.castling_rooks[color.index()][side.index()]
                        .expect("held castling right always has a rook square");
                    let c = rook.file().to_char();
                    fen.push(match color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    });
                } else {
                    fen.push(standard);
                }
            }
        }

        fen.push(' ');
        match self.en_passant() {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock().to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    #[inline]
    fn state(&self) -> &State {
        self.states.last().expect("position always has a state")
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns true if this position uses Chess960 castling.
    #[inline]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.color_bbs[0] | self.color_bbs[1]
    }

    /// Returns a bitboard of all pieces of one color.
    #[inline]
    pub fn by_color(&self, color: Color) -> Bitboard {
        self.color_bbs[color.index()]
    }

    /// Returns a bitboard of all pieces of one type, both colors.
    #[inline]
    pub fn by_type(&self, piece_type: PieceType) -> Bitboard {
        self.piece_bbs[piece_type.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.piece_bbs[piece_type.index()] & self.color_bbs[color.index()]
    }

    /// Returns the piece on a square, or [`Piece::NONE`].
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board[sq.index() as usize]
    }

    /// Returns the king square of the given color.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(PieceType::King, color)
            .lsb_square()
            .expect("every position has both kings")
    }

    /// Returns the en-passant target square, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.state().en_passant
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state().castling
    }

    /// Returns the halfmove clock (plies since the last capture or pawn
    /// move).
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.state().halfmove_clock
    }

    /// Returns the fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the zobrist key of the current position.
    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.state().zobrist
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.state().in_check
    }

    /// Returns the move that produced the current state, or the null move at
    /// the root.
    #[inline]
    pub fn last_move(&self) -> Move {
        self.state().last_move
    }

    /// Returns all pieces of either color that attack the given square under
    /// the given occupancy.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let rooks_queens =
            self.piece_bbs[PieceType::Rook.index()] | self.piece_bbs[PieceType::Queen.index()];
        let bishops_queens =
            self.piece_bbs[PieceType::Bishop.index()] | self.piece_bbs[PieceType::Queen.index()];

        (attacks::pawn_attacks(sq, Color::White) & self.pieces_of(PieceType::Pawn, Color::Black))
            | (attacks::pawn_attacks(sq, Color::Black)
                & self.pieces_of(PieceType::Pawn, Color::White))
            | (attacks::knight_attacks(sq) & self.piece_bbs[PieceType::Knight.index()])
            | (attacks::king_attacks(sq) & self.piece_bbs[PieceType::King.index()])
            | (attacks::bishop_attacks(sq, occupied) & bishops_queens)
            | (attacks::rook_attacks(sq, occupied) & rooks_queens)
    }

    /// Returns true if the given square is attacked by the given color.
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.is_square_attacked_with(sq, by, self.occupied())
    }

    /// Like [`is_square_attacked`](Self::is_square_attacked), but under an
    /// arbitrary occupancy (used for king-move legality, where the king must
    /// be lifted off its origin square first).
    #[inline]
    pub fn is_square_attacked_with(&self, sq: Square, by: Color, occupied: Bitboard) -> bool {
        (self.attackers_to(sq, occupied) & self.by_color(by)).is_not_empty()
    }

    /// Returns the enemy pieces currently giving check.
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_to(self.king_square(us), self.occupied()) & self.by_color(us.opposite())
    }

    /// Returns the pieces of the side to move that are pinned to their own
    /// king. Cached on the current state after the first request.
    pub fn pinned(&self) -> Bitboard {
        let state = self.state();
        if let Some(pinned) = state.pinned.get() {
            return pinned;
        }
        let us = self.side_to_move;
        let pinned = self.pinned_pieces(self.king_square(us), us);
        state.pinned.set(Some(pinned));
        pinned
    }

    /// Computes the pieces of `side` whose removal would expose `king_sq` to
    /// an enemy slider: for every slider that would attack the king over an
    /// empty board, a single friendly blocker on the connecting ray is
    /// pinned.
    pub fn pinned_pieces(&self, king_sq: Square, side: Color) -> Bitboard {
        let them = side.opposite();
        let occupied = self.occupied();
        let rooks_queens =
            self.pieces_of(PieceType::Rook, them) | self.pieces_of(PieceType::Queen, them);
        let bishops_queens =
            self.pieces_of(PieceType::Bishop, them) | self.pieces_of(PieceType::Queen, them);

        let snipers = (attacks::rook_attacks(king_sq, Bitboard::EMPTY) & rooks_queens)
            | (attacks::bishop_attacks(king_sq, Bitboard::EMPTY) & bishops_queens);

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = attacks::between(king_sq, sniper) & occupied;
            if !blockers.more_than_one() && (blockers & self.by_color(side)).is_not_empty() {
                pinned |= blockers;
            }
        }
        pinned
    }

    /// Returns true if the given side still holds the given castling right.
    #[inline]
    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.castling_rights().can_castle(color, side)
    }

    /// Returns the initial rook square for a castling right, if the right
    /// existed when the position was set up.
    #[inline]
    pub fn castling_rook(&self, color: Color, side: CastlingSide) -> Option<Square> {
        self.castling_rooks[color.index()][side.index()]
    }

    /// Returns true if any piece other than the castling king and rook
    /// stands on a square either of them must cross or land on.
    pub fn castling_impeded(&self, color: Color, side: CastlingSide) -> bool {
        let Some(rook_from) = self.castling_rook(color, side) else {
            return true;
        };
        let king_from = self.king_square(color);
        let (king_to, rook_to) = castle_targets(color, side);

        let path = (attacks::between(king_from, king_to)
            | attacks::between(rook_from, rook_to)
            | Bitboard::from_square(king_to)
            | Bitboard::from_square(rook_to))
            & !(Bitboard::from_square(king_from) | Bitboard::from_square(rook_from));

        (path & self.occupied()).is_not_empty()
    }

    /// Returns true if the move is legal in this position.
    pub fn is_legal(&self, m: Move) -> bool {
        crate::movegen::generate_moves(self).contains(m)
    }

    /// Returns true if the move would leave the opponent in check.
    pub fn gives_check(&self, m: Move) -> bool {
        let mut probe = self.clone();
        probe.do_move(m);
        probe.in_check()
    }

    /// Makes a move, pushing a new state onto the history.
    ///
    /// The move must come from this position's legal move set; feeding an
    /// arbitrary move is a programming error and may corrupt the position in
    /// release builds.
    pub fn do_move(&mut self, m: Move) {
        debug_assert!(!m.is_null());

        let us = self.side_to_move;
        let them = us.opposite();
        let from = m.from();
        let to = m.to();

        let (prev_castling, prev_en_passant, prev_halfmove, prev_zobrist) = {
            let prev = self.state();
            (
                prev.castling,
                prev.en_passant,
                prev.halfmove_clock,
                prev.zobrist,
            )
        };

        let mut castling = prev_castling;
        let mut zobrist = prev_zobrist ^ KEYS.side();
        if let Some(ep) = prev_en_passant {
            zobrist ^= KEYS.en_passant(ep.file().index());
        }
        let mut halfmove_clock = prev_halfmove + 1;
        let mut en_passant = None;
        let mut captured = Piece::NONE;

        if m.is_castling() {
            // `from` is the king's start square, `to` the rook's. Clear both
            // before placing either so overlapping Chess960 start and target
            // squares cannot collide.
            let side = if to.file().index() > from.file().index() {
                CastlingSide::King
            } else {
                CastlingSide::Queen
            };
            let (king_to, rook_to) = castle_targets(us, side);
            let king = m.moving();
            let rook = Piece::new(PieceType::Rook, us);

            self.take(from);
            self.take(to);
            self.put(king, king_to);
            self.put(rook, rook_to);

            zobrist ^= KEYS.piece(king, from)
                ^ KEYS.piece(king, king_to)
                ^ KEYS.piece(rook, to)
                ^ KEYS.piece(rook, rook_to);
            castling.discard_color(us);
        } else {
            let piece = self.piece_at(from);
            debug_assert_eq!(piece, m.moving());

            if m.is_en_passant() {
                let victim_sq = behind(to, us);
                captured = self.take(victim_sq);
                zobrist ^= KEYS.piece(captured, victim_sq);
            } else if m.is_capture() {
                captured = self.take(to);
                zobrist ^= KEYS.piece(captured, to);
            }

            self.take(from);
            let placed = if m.is_promotion() { m.promoted() } else { piece };
            self.put(placed, to);
            zobrist ^= KEYS.piece(piece, from) ^ KEYS.piece(placed, to);

            match piece.piece_type() {
                Some(PieceType::Pawn) => {
                    halfmove_clock = 0;
                    if m.is_double_push() {
                        let ep = behind(to, us);
                        en_passant = Some(ep);
                        zobrist ^= KEYS.en_passant(ep.file().index());
                    }
                }
                Some(PieceType::King) => castling.discard_color(us),
                Some(PieceType::Rook) => {
                    for side in CastlingSide::BOTH {
                        if self.castling_rooks[us.index()][side.index()] == Some(from) {
                            castling.discard(us, side);
                        }
                    }
                }
                _ => {}
            }

            if m.is_capture() {
                halfmove_clock = 0;
            }
            if captured.piece_type() == Some(PieceType::Rook) {
                for side in CastlingSide::BOTH {
                    if self.castling_rooks[them.index()][side.index()] == Some(to) {
                        castling.discard(them, side);
                    }
                }
            }
        }

        if castling != prev_castling {
            zobrist ^= KEYS.castling(prev_castling.raw()) ^ KEYS.castling(castling.raw());
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;

        let in_check = self.is_square_attacked(self.king_square(them), us);
        self.states.push(State::new(
            castling,
            en_passant,
            halfmove_clock,
            captured,
            m,
            in_check,
            zobrist,
        ));
    }

    /// Unmakes the last move, restoring the previous state exactly.
    pub fn undo_move(&mut self) {
        debug_assert!(self.states.len() > 1, "no move to unmake");
        let state = self.states.pop().expect("position always has a state");
        let m = state.last_move;
        let us = self.side_to_move.opposite();
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = m.from();
        let to = m.to();

        if m.is_castling() {
            let side = if to.file().index() > from.file().index() {
                CastlingSide::King
            } else {
                CastlingSide::Queen
            };
            let (king_to, rook_to) = castle_targets(us, side);

            self.take(king_to);
            self.take(rook_to);
            self.put(m.moving(), from);
            self.put(Piece::new(PieceType::Rook, us), to);
        } else {
            self.take(to);
            self.put(m.moving(), from);

            if m.is_en_passant() {
                self.put(state.captured, behind(to, us));
            } else if m.is_capture() {
                self.put(state.captured, to);
            }
        }
    }

    fn put(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.piece_at(sq).is_none());
        self.board[sq.index() as usize] = piece;
        if let (Some(pt), Some(color)) = (piece.piece_type(), piece.color()) {
            self.piece_bbs[pt.index()].set(sq);
            self.color_bbs[color.index()].set(sq);
        }
    }

    fn take(&mut self, sq: Square) -> Piece {
        let piece = self.piece_at(sq);
        self.board[sq.index() as usize] = Piece::NONE;
        if let (Some(pt), Some(color)) = (piece.piece_type(), piece.color()) {
            self.piece_bbs[pt.index()].clear(sq);
            self.color_bbs[color.index()].clear(sq);
        }
        piece
    }

    fn compute_zobrist(&self, castling: CastlingRights, en_passant: Option<Square>) -> u64 {
        let mut key = 0u64;
        for sq in self.occupied() {
            key ^= KEYS.piece(self.piece_at(sq), sq);
        }
        if self.side_to_move == Color::Black {
            key ^= KEYS.side();
        }
        key ^= KEYS.castling(castling.raw());
        if let Some(ep) = en_passant {
            key ^= KEYS.en_passant(ep.file().index());
        }
        key
    }
}

/// Returns the square one pawn-step behind `sq` from `color`'s point of
/// view (toward `color`'s own side).
#[inline]
fn behind(sq: Square, color: Color) -> Square {
    // SAFETY: only called for squares a pawn just passed over, never on the
    // back rank.
    unsafe { Square::from_index_unchecked((sq.index() as i8 - color.forward().offset()) as u8) }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Position {
    /// Observable-position equality: board, side to move, castling rights,
    /// en passant, clocks, and hash. History depth and lazy caches are
    /// ignored.
    fn eq(&self, other: &Self) -> bool {
        let a = self.state();
        let b = other.state();
        self.board == other.board
            && self.piece_bbs == other.piece_bbs
            && self.color_bbs == other.color_bbs
            && self.side_to_move == other.side_to_move
            && self.fullmove_number == other.fullmove_number
            && self.chess960 == other.chess960
            && a.castling == b.castling
            && a.en_passant == b.en_passant
            && a.halfmove_clock == b.halfmove_clock
            && a.zobrist == b.zobrist
    }
}

impl Eq for Position {}
