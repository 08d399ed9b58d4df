//! Bitboard chess engine core: legal move generation and move notation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with shifts and iteration
//! - [`Position`] - full game state with incremental make/unmake, pins,
//!   check detection, and Chess960 castling
//! - Legal move generation into a fixed-capacity [`MoveList`]
//! - [`to_notation`] - FAN/SAN/LAN/RAN/UCI rendering with minimal
//!   disambiguation and check/mate suffixes
//! - Perft drivers with bundled known-answer positions
//!
//! # Architecture
//!
//! Each piece type/color pair lives in a 64-bit bitboard, so move generation
//! is a handful of bitwise operations per piece: precomputed tables for the
//! leapers, magic bitboard lookups for the sliders. A position owns a chain
//! of per-ply states, which makes unmake exact and keeps derived facts
//! (check, pins, hash) alongside the move that produced them.
//!
//! # Example
//!
//! ```
//! use chesskit_engine::{generate_moves, to_notation, NotationStyle, Position};
//!
//! let mut position = Position::startpos();
//! let moves = generate_moves(&position);
//! assert_eq!(moves.len(), 20);
//!
//! // Play 1.e4 and read it back in standard algebraic notation.
//! let e4 = chesskit_engine::parse_uci_move(&position, "e2e4").unwrap();
//! assert_eq!(to_notation(&position, e4, NotationStyle::San), "e4");
//! position.do_move(e4);
//! assert_eq!(position.side_to_move(), chesskit_core::Color::Black);
//! ```

mod bitboard;
pub mod movegen;
mod notation;
mod position;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIter};
pub use movegen::{
    between, bishop_attacks, generate_moves, generate_moves_with, king_attacks, knight_attacks,
    line, pawn_attacks, piece_attacks, queen_attacks, rook_attacks, GenFlags, MoveList,
};
pub use movegen::perft::{perft, perft_divide, perft_divide_with, PerftRecord, PERFT_RECORDS};
pub use notation::{parse_uci_move, to_notation, NotationStyle, ParseMoveError};
pub use position::{castle_targets, CastlingRights, CastlingSide, Position};
