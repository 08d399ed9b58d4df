//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal game tree at a given depth.
//! The totals are bitwise reproducible, so comparing them against
//! known-correct values exercises every part of move generation: pins,
//! en passant, promotions, castling, and check evasion.

use std::sync::atomic::{AtomicBool, Ordering};

use super::generate_moves;
use crate::Position;
use chesskit_core::Move;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        position.do_move(*m);
        nodes += perft(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Divided perft: walks the root moves one at a time, reporting each
/// subtree count through `on_root` as soon as it completes. Returns the
/// total over the roots that were searched.
///
/// The `cancel` flag is checked between root moves; setting it stops the
/// walk before the next root without interrupting the subtree in flight.
pub fn perft_divide_with<F>(
    position: &mut Position,
    depth: u32,
    cancel: &AtomicBool,
    mut on_root: F,
) -> u64
where
    F: FnMut(Move, u64),
{
    let moves = generate_moves(position);
    let mut total = 0u64;

    for m in &moves {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        position.do_move(*m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.undo_move();

        total += nodes;
        on_root(*m, nodes);
    }

    total
}

/// Divided perft collected into `(move, nodes)` pairs sorted by move
/// string. Useful for diffing against another generator's output.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();
    let cancel = AtomicBool::new(false);
    perft_divide_with(position, depth, &cancel, |m, nodes| {
        results.push((m.to_uci(), nodes));
    });
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// A known-answer perft record: a position and its node counts by depth.
#[derive(Debug, Clone, Copy)]
pub struct PerftRecord {
    pub name: &'static str,
    pub fen: &'static str,
    pub counts: &'static [(u32, u64)],
}

/// Canonical validation positions. The counts are the community-verified
/// values; any disagreement is a move generator bug.
pub const PERFT_RECORDS: &[PerftRecord] = &[
    PerftRecord {
        name: "startpos",
        fen: chesskit_core::FenRecord::STARTPOS,
        counts: &[
            (1, 20),
            (2, 400),
            (3, 8_902),
            (4, 197_281),
            (5, 4_865_609),
            (6, 119_060_324),
        ],
    },
    PerftRecord {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        counts: &[(1, 48), (2, 2_039), (3, 97_862), (4, 4_085_603)],
    },
    PerftRecord {
        name: "rook endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        counts: &[(1, 14), (2, 191), (3, 2_812), (4, 43_238), (5, 674_624)],
    },
    PerftRecord {
        name: "promotion storm",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        counts: &[(1, 6), (2, 264), (3, 9_467), (4, 422_333)],
    },
    PerftRecord {
        name: "talkchess",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
        counts: &[(1, 44), (2, 1_486), (3, 62_379), (4, 2_103_487)],
    },
];
