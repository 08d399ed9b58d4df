//! Move generation.
//!
//! Legal moves are generated in two deterministic buckets: captures and
//! promotions first, then quiet moves. Within each bucket pieces are visited
//! in pawn, knight, bishop, rook, queen, king order with sources and
//! destinations in ascending square order, so the output is reproducible for
//! perft and notation purposes.

pub mod attacks;
mod magics;
pub mod perft;

use crate::position::{castle_targets, CastlingSide, Position};
use crate::Bitboard;
use chesskit_core::{Color, Direction, Move, Piece, PieceType, Square};

pub use attacks::{
    attacks as piece_attacks, between, bishop_attacks, king_attacks, knight_attacks, line,
    pawn_attacks, queen_attacks, rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity bound, above the practical maximum of legal moves in any
    /// chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns true if the list contains the given move.
    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Move-generation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenFlags(u8);

impl GenFlags {
    /// Emit only moves that leave the mover's own king safe.
    pub const LEGAL: GenFlags = GenFlags(0b01);
    /// Emit promotions as queen promotions only, skipping underpromotions.
    pub const QUEEN_PROMOTION_ONLY: GenFlags = GenFlags(0b10);

    /// Returns true if every flag in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: GenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: GenFlags) -> Self {
        GenFlags(self.0 | other.0)
    }
}

impl Default for GenFlags {
    fn default() -> Self {
        Self::LEGAL
    }
}

impl std::ops::BitOr for GenFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Generates all legal moves for the given position.
pub fn generate_moves(position: &Position) -> MoveList {
    generate_moves_with(position, GenFlags::LEGAL)
}

/// Generates moves under the given flags.
///
/// Generation itself never fails: an empty list is a legitimate terminal
/// (checkmate when the side to move is in check, stalemate otherwise).
pub fn generate_moves_with(position: &Position, flags: GenFlags) -> MoveList {
    let mut list = MoveList::new();
    let ctx = GenContext::new(position, flags);

    // Captures and promotions first.
    generate_pawn_captures(&ctx, &mut list);
    for pt in [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ] {
        generate_piece_moves(&ctx, pt, Bucket::Captures, &mut list);
    }
    generate_king_moves(&ctx, Bucket::Captures, &mut list);

    // Then quiets.
    generate_pawn_quiets(&ctx, &mut list);
    for pt in [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ] {
        generate_piece_moves(&ctx, pt, Bucket::Quiets, &mut list);
    }
    generate_king_moves(&ctx, Bucket::Quiets, &mut list);
    generate_castling(&ctx, &mut list);

    list
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Captures,
    Quiets,
}

/// Everything the per-piece generators need, computed once per call.
struct GenContext<'a> {
    pos: &'a Position,
    us: Color,
    them: Color,
    occupied: Bitboard,
    ours: Bitboard,
    theirs: Bitboard,
    empty: Bitboard,
    king_sq: Square,
    /// Destination filter for non-king captures. With a single checker this
    /// shrinks to the checker itself; with two checkers it is empty.
    capture_mask: Bitboard,
    /// Destination filter for non-king quiet moves. With a single sliding
    /// checker this shrinks to the blocking squares.
    push_mask: Bitboard,
    pinned: Bitboard,
    legal: bool,
    queen_promotions_only: bool,
}

impl<'a> GenContext<'a> {
    fn new(pos: &'a Position, flags: GenFlags) -> Self {
        let us = pos.side_to_move();
        let them = us.opposite();
        let occupied = pos.occupied();
        let ours = pos.by_color(us);
        let theirs = pos.by_color(them);
        let king_sq = pos.king_square(us);
        let legal = flags.contains(GenFlags::LEGAL);

        let checkers = if legal { pos.checkers() } else { Bitboard::EMPTY };
        let (capture_mask, push_mask) = if checkers.is_empty() {
            (Bitboard::FULL, Bitboard::FULL)
        } else if checkers.more_than_one() {
            (Bitboard::EMPTY, Bitboard::EMPTY)
        } else {
            let checker = checkers.lsb_square().expect("single checker");
            (checkers, attacks::between(king_sq, checker))
        };

        GenContext {
            pos,
            us,
            them,
            occupied,
            ours,
            theirs,
            empty: !occupied,
            king_sq,
            capture_mask,
            push_mask,
            pinned: if legal { pos.pinned() } else { Bitboard::EMPTY },
            legal,
            queen_promotions_only: flags.contains(GenFlags::QUEEN_PROMOTION_ONLY),
        }
    }

    /// A non-king move is king-safe when the mover is not pinned or stays on
    /// its pin ray. Check evasion is already handled by the masks.
    #[inline]
    fn non_king_move_safe(&self, from: Square, to: Square) -> bool {
        !self.legal
            || !self.pinned.contains(from)
            || attacks::line(self.king_sq, from).contains(to)
    }

    /// A king move is safe when the destination is unattacked once the king
    /// has left its origin square.
    #[inline]
    fn king_move_safe(&self, to: Square) -> bool {
        !self.legal
            || !self.pos.is_square_attacked_with(
                to,
                self.them,
                self.occupied ^ Bitboard::from_square(self.king_sq),
            )
    }

    /// En passant removes two pawns from the capture rank at once, so the
    /// pin test is done from scratch: lift both pawns, drop the capturer on
    /// the target square, and look for sliders reaching the king.
    fn en_passant_safe(&self, from: Square, to: Square, victim: Square) -> bool {
        if !self.legal {
            return true;
        }
        let occupied = (self.occupied
            ^ Bitboard::from_square(from)
            ^ Bitboard::from_square(victim))
            | Bitboard::from_square(to);
        let rooks_queens = self.pos.pieces_of(PieceType::Rook, self.them)
            | self.pos.pieces_of(PieceType::Queen, self.them);
        let bishops_queens = self.pos.pieces_of(PieceType::Bishop, self.them)
            | self.pos.pieces_of(PieceType::Queen, self.them);

        (attacks::rook_attacks(self.king_sq, occupied) & rooks_queens).is_empty()
            && (attacks::bishop_attacks(self.king_sq, occupied) & bishops_queens).is_empty()
    }
}

/// Steps a destination square back against the shift direction to recover
/// the source square.
#[inline]
fn shift_origin(to: Square, dir: Direction) -> Square {
    // SAFETY: `to` was produced by shifting a bitboard in `dir`, so the
    // origin is on the board.
    unsafe { Square::from_index_unchecked((to.index() as i8 - dir.offset()) as u8) }
}

fn push_promotions(
    ctx: &GenContext,
    list: &mut MoveList,
    from: Square,
    to: Square,
    captured: Piece,
) {
    let pawn = Piece::new(PieceType::Pawn, ctx.us);
    let choices: &[PieceType] = if ctx.queen_promotions_only {
        &[PieceType::Queen]
    } else {
        &PieceType::PROMOTIONS
    };

    for &pt in choices {
        let promoted = Piece::new(pt, ctx.us);
        if captured.is_some() {
            list.push(Move::capture_promotion(pawn, captured, from, to, promoted));
        } else {
            list.push(Move::promotion(pawn, from, to, promoted));
        }
    }
}

/// Pawn captures, promotions, and en passant (the capture bucket).
fn generate_pawn_captures(ctx: &GenContext, list: &mut MoveList) {
    let pawn = Piece::new(PieceType::Pawn, ctx.us);
    let pawns = ctx.pos.pieces_of(PieceType::Pawn, ctx.us);
    let seventh = Bitboard::rank(ctx.us.seventh_rank());
    let promoting = pawns & seventh;
    let rest = pawns & !seventh;
    let up = ctx.us.forward();

    // Ordinary captures, east side then west side.
    for dir in [ctx.us.forward_east(), ctx.us.forward_west()] {
        let targets = rest.shift(dir) & ctx.theirs & ctx.capture_mask;
        for to in targets {
            let from = shift_origin(to, dir);
            if ctx.non_king_move_safe(from, to) {
                list.push(Move::capture(pawn, ctx.pos.piece_at(to), from, to));
            }
        }
    }

    // Promotion pushes.
    let targets = promoting.shift(up) & ctx.empty & ctx.push_mask;
    for to in targets {
        let from = shift_origin(to, up);
        if ctx.non_king_move_safe(from, to) {
            push_promotions(ctx, list, from, to, Piece::NONE);
        }
    }

    // Promotion captures.
    for dir in [ctx.us.forward_east(), ctx.us.forward_west()] {
        let targets = promoting.shift(dir) & ctx.theirs & ctx.capture_mask;
        for to in targets {
            let from = shift_origin(to, dir);
            if ctx.non_king_move_safe(from, to) {
                push_promotions(ctx, list, from, to, ctx.pos.piece_at(to));
            }
        }
    }

    // En passant. The capture must address the current check, either by
    // taking the checking pawn or by landing on the blocking square.
    if let Some(ep) = ctx.pos.en_passant() {
        let victim = shift_origin(ep, up);
        if ctx.capture_mask.contains(victim) || ctx.push_mask.contains(ep) {
            let ep_bb = Bitboard::from_square(ep);
            let enemy_pawn = Piece::new(PieceType::Pawn, ctx.them);
            for dir in [ctx.us.forward_east(), ctx.us.forward_west()] {
                if (pawns.shift(dir) & ep_bb).is_not_empty() {
                    let from = shift_origin(ep, dir);
                    if ctx.en_passant_safe(from, ep, victim) {
                        list.push(Move::en_passant(pawn, enemy_pawn, from, ep));
                    }
                }
            }
        }
    }
}

/// Pawn single and double pushes that do not promote (the quiet bucket).
fn generate_pawn_quiets(ctx: &GenContext, list: &mut MoveList) {
    let pawn = Piece::new(PieceType::Pawn, ctx.us);
    let pawns =
        ctx.pos.pieces_of(PieceType::Pawn, ctx.us) & !Bitboard::rank(ctx.us.seventh_rank());
    let up = ctx.us.forward();

    let single = pawns.shift(up) & ctx.empty;
    let double = (single & Bitboard::rank(ctx.us.third_rank())).shift(up) & ctx.empty
        & ctx.push_mask;
    let single = single & ctx.push_mask;

    for to in single {
        let from = shift_origin(to, up);
        if ctx.non_king_move_safe(from, to) {
            list.push(Move::quiet(pawn, from, to));
        }
    }

    for to in double {
        let from = shift_origin(shift_origin(to, up), up);
        if ctx.non_king_move_safe(from, to) {
            list.push(Move::double_push(pawn, from, to));
        }
    }
}

/// Knight, bishop, rook, and queen moves for one bucket.
fn generate_piece_moves(ctx: &GenContext, piece_type: PieceType, bucket: Bucket, list: &mut MoveList) {
    let piece = Piece::new(piece_type, ctx.us);

    for from in ctx.pos.pieces_of(piece_type, ctx.us) {
        let reachable = attacks::attacks(piece_type, ctx.us, from, ctx.occupied) & !ctx.ours;
        let targets = match bucket {
            Bucket::Captures => reachable & ctx.theirs & ctx.capture_mask,
            Bucket::Quiets => reachable & ctx.empty & ctx.push_mask,
        };

        for to in targets {
            if !ctx.non_king_move_safe(from, to) {
                continue;
            }
            match bucket {
                Bucket::Captures => list.push(Move::capture(piece, ctx.pos.piece_at(to), from, to)),
                Bucket::Quiets => list.push(Move::quiet(piece, from, to)),
            }
        }
    }
}

/// Non-castling king moves for one bucket. The king ignores the evasion
/// masks; its destinations are tested directly.
fn generate_king_moves(ctx: &GenContext, bucket: Bucket, list: &mut MoveList) {
    let king = Piece::new(PieceType::King, ctx.us);
    let from = ctx.king_sq;
    let reachable = attacks::king_attacks(from) & !ctx.ours;
    let targets = match bucket {
        Bucket::Captures => reachable & ctx.theirs,
        Bucket::Quiets => reachable & ctx.empty,
    };

    for to in targets {
        if !ctx.king_move_safe(to) {
            continue;
        }
        match bucket {
            Bucket::Captures => list.push(Move::capture(king, ctx.pos.piece_at(to), from, to)),
            Bucket::Quiets => list.push(Move::quiet(king, from, to)),
        }
    }
}

/// Castling moves. Requirements: the right is held, no piece blocks either
/// the king's or the rook's path, the king is not in check, and no traversed
/// or final square is attacked. Every legal castling move is emitted whether
/// or not it gives check.
fn generate_castling(ctx: &GenContext, list: &mut MoveList) {
    if ctx.pos.in_check() {
        return;
    }

    let king = Piece::new(PieceType::King, ctx.us);
    let king_from = ctx.king_sq;

    for side in CastlingSide::BOTH {
        if !ctx.pos.can_castle(ctx.us, side) || ctx.pos.castling_impeded(ctx.us, side) {
            continue;
        }
        let rook_from = ctx
            .pos
            .castling_rook(ctx.us, side)
            .expect("held castling right always has a rook square");
        let (king_to, rook_to) = castle_targets(ctx.us, side);

        // Every square the king crosses, destination included, must be
        // unattacked. The king is lifted off its origin so sliders see
        // through it.
        let crossing = attacks::between(king_from, king_to) | Bitboard::from_square(king_to);
        let without_king = ctx.occupied ^ Bitboard::from_square(king_from);
        let crossing_safe = crossing
            .into_iter()
            .all(|sq| !ctx.pos.is_square_attacked_with(sq, ctx.them, without_king));
        if !crossing_safe {
            continue;
        }

        // Rebuild the post-castle occupancy and re-test the king square: in
        // Chess960 the rook leaving its file can uncover a slider on the
        // back rank.
        let after = (ctx.occupied
            ^ Bitboard::from_square(king_from)
            ^ Bitboard::from_square(rook_from))
            | Bitboard::from_square(king_to)
            | Bitboard::from_square(rook_to);
        if ctx.pos.is_square_attacked_with(king_to, ctx.them, after) {
            continue;
        }

        list.push(Move::castle(king, king_from, rook_from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chesskit_core::{File, Rank};
    use proptest::prelude::*;

    fn sq(file: File, rank: Rank) -> Square {
        Square::new(file, rank)
    }

    fn uci_moves(position: &Position) -> Vec<String> {
        generate_moves(position)
            .into_iter()
            .map(|m| m.to_uci())
            .collect()
    }

    #[test]
    fn movelist_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let pawn = Piece::new(PieceType::Pawn, Color::White);
        let m1 = Move::quiet(pawn, sq(File::E, Rank::R2), sq(File::E, Rank::R3));
        let m2 = Move::quiet(pawn, sq(File::D, Rank::R2), sq(File::D, Rank::R3));

        list.push(m1);
        list.push(m2);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);
        assert!(list.contains(m1));

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let position = Position::startpos();
        let moves = generate_moves(&position);
        assert_eq!(moves.len(), 20);

        let uci = uci_moves(&position);
        assert!(uci.contains(&"e2e4".to_string()));
        assert!(uci.contains(&"g1f3".to_string()));
        assert!(moves.into_iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn captures_come_first() {
        // White can capture on d5 and also has quiet moves.
        let position = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
        )
        .unwrap();
        let moves = generate_moves(&position);
        let first_quiet = moves
            .into_iter()
            .position(|m| !m.is_capture())
            .expect("quiet moves exist");
        for (i, m) in moves.into_iter().enumerate() {
            if m.is_capture() {
                assert!(i < first_quiet, "capture {} after quiet moves", m);
            }
        }
    }

    #[test]
    fn every_generated_move_is_legal() {
        let fens = [
            chesskit_core::FenRecord::STARTPOS,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
        ];
        for fen in fens {
            let mut position = Position::from_fen(fen).unwrap();
            let us = position.side_to_move();
            for m in &generate_moves(&position) {
                position.do_move(*m);
                let king_sq = position.king_square(us);
                assert!(
                    !position.is_square_attacked(king_sq, us.opposite()),
                    "{} leaves the king hanging in {}",
                    m,
                    fen
                );
                position.undo_move();
            }
        }
    }

    #[test]
    fn pinned_piece_stays_on_ray() {
        // The e4 rook shields the white king from the e8 rook: it may slide
        // along the e-file but never leave it.
        let position = Position::from_fen("4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1").unwrap();
        let uci = uci_moves(&position);
        assert!(uci.contains(&"e4e5".to_string()));
        assert!(uci.contains(&"e4e8".to_string()));
        assert!(!uci.contains(&"e4d4".to_string()));
        assert!(!uci.contains(&"e4a4".to_string()));
    }

    #[test]
    fn check_requires_evasion() {
        // Rook gives check along the e-file; blocking, capturing, and king
        // moves are the only replies.
        let position = Position::from_fen("4k3/8/8/8/4r3/8/3N4/4K3 w - - 0 1").unwrap();
        assert!(position.in_check());
        let uci = uci_moves(&position);
        // Capturing the checker and stepping aside are in; knight moves that
        // leave the check standing are out.
        assert!(uci.contains(&"d2e4".to_string()));
        assert!(uci.contains(&"e1d1".to_string()));
        assert!(!uci.contains(&"d2f3".to_string()));
        assert!(!uci.contains(&"d2b3".to_string()));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let position =
            Position::from_fen("4k3/8/8/8/7b/8/4r3/R3K3 w - - 0 1").unwrap();
        assert_eq!(position.checkers().count(), 2);
        for m in &generate_moves(&position) {
            assert_eq!(m.moving().piece_type(), Some(PieceType::King));
        }
    }

    #[test]
    fn checkmate_has_no_moves() {
        // Back-rank mate.
        let position = Position::from_fen("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(position.in_check());
        assert!(generate_moves(&position).is_empty());
    }

    #[test]
    fn stalemate_has_no_moves() {
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!position.in_check());
        assert!(generate_moves(&position).is_empty());
    }

    #[test]
    fn castling_both_sides() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&position);
        let castles: Vec<Move> = moves.into_iter().filter(|m| m.is_castling()).copied().collect();
        assert_eq!(castles.len(), 2);
        // King-from / rook-from encoding.
        assert!(castles.iter().any(|m| m.from() == Square::E1 && m.to() == Square::H1));
        assert!(castles.iter().any(|m| m.from() == Square::E1 && m.to() == Square::A1));
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // The f5 rook holds f1 on an otherwise open f-file; the queenside
        // path stays safe.
        let position =
            Position::from_fen("r3k2r/pppp1ppp/8/5r2/8/8/PPPP2PP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&position);
        let kingside = moves
            .into_iter()
            .any(|m| m.is_castling() && m.to() == Square::H1);
        assert!(!kingside, "f1 is attacked, kingside castling is illegal");
        let queenside = moves
            .into_iter()
            .any(|m| m.is_castling() && m.to() == Square::A1);
        assert!(queenside, "queenside path is safe");
    }

    #[test]
    fn no_castling_while_in_check() {
        let position =
            Position::from_fen("r3k2r/pppp1ppp/8/4r3/8/8/PPPP1PPP/R3K2R w KQkq - 0 1").unwrap();
        assert!(position.in_check());
        assert!(generate_moves(&position).into_iter().all(|m| !m.is_castling()));
    }

    #[test]
    fn castling_gives_check_is_still_generated() {
        // Kingside castling delivers a rook check on f1 against the f8 king
        // and must still be offered.
        let position =
            Position::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let moves = generate_moves(&position);
        let castle = moves.into_iter().find(|m| m.is_castling());
        assert!(castle.is_some());
        assert!(position.gives_check(*castle.unwrap()));
    }

    #[test]
    fn chess960_castling_generated() {
        // King on b1, rook on a1: queenside castling walks the king east to
        // c1.
        let position =
            Position::from_fen("rk5r/pppppppp/8/8/8/8/PPPPPPPP/RK5R w KQkq - 0 1").unwrap();
        assert!(position.is_chess960());
        let moves = generate_moves(&position);
        let castles: Vec<Move> = moves.into_iter().filter(|m| m.is_castling()).copied().collect();
        assert!(castles.iter().any(|m| m.from() == Square::B1 && m.to() == Square::A1));
    }

    #[test]
    fn en_passant_generated_and_pin_checked() {
        let position = Position::from_fen(
            "rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3",
        )
        .unwrap();
        assert!(uci_moves(&position).contains(&"f5e6".to_string()));

        // Horizontal discovered pin: capturing en passant would expose the
        // king on h5 to the a5 rook once both pawns leave the fifth rank.
        let pinned = Position::from_fen("8/8/8/r2pP2K/8/8/8/7k w - d6 0 1").unwrap();
        assert!(!uci_moves(&pinned).contains(&"e5d6".to_string()));
    }

    #[test]
    fn promotions_fan_out() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let moves = generate_moves(&position);
        let promos = moves.into_iter().filter(|m| m.is_promotion()).count();
        assert_eq!(promos, 4);

        let queen_only =
            generate_moves_with(&position, GenFlags::LEGAL | GenFlags::QUEEN_PROMOTION_ONLY);
        let promos: Vec<&Move> = queen_only.into_iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), 1);
        assert_eq!(promos[0].promoted().piece_type(), Some(PieceType::Queen));
    }

    #[test]
    fn is_legal_matches_generation() {
        let position = Position::startpos();
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        assert!(position.is_legal(Move::double_push(
            pawn,
            sq(File::E, Rank::R2),
            sq(File::E, Rank::R4)
        )));
        assert!(!position.is_legal(Move::quiet(
            pawn,
            sq(File::E, Rank::R2),
            sq(File::E, Rank::R5)
        )));
    }

    proptest! {
        /// Random legal walks restore the position exactly on unwind.
        #[test]
        fn do_undo_restores_position(choices in proptest::collection::vec(0usize..128, 1..40)) {
            let mut position = Position::startpos();
            let mut stack = Vec::new();

            for choice in choices {
                let moves = generate_moves(&position);
                if moves.is_empty() {
                    break;
                }
                let m = moves[choice % moves.len()];
                stack.push((position.clone(), m));
                position.do_move(m);
            }

            while let Some((snapshot, _)) = stack.pop() {
                position.undo_move();
                prop_assert_eq!(&position, &snapshot);
                prop_assert_eq!(position.zobrist(), snapshot.zobrist());
            }
        }
    }
}
