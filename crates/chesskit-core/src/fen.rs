//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! A [`FenRecord`] holds the six fields of a FEN string in validated,
//! typed form. Board population stays with the engine; the record exposes
//! the placement field as an iterator of `(Square, Piece)` pairs instead.

use thiserror::Error;

use crate::{Color, File, Piece, Rank, Square};

/// Errors reported while validating a FEN string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, found {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: {0}")]
    SideToMove(String),

    #[error("bad castling field: {0}")]
    Castling(String),

    #[error("bad en passant field: {0}")]
    EnPassant(String),

    #[error("bad clock field: {0}")]
    Clock(String),

    #[error("position not playable: {0}")]
    Unplayable(String),
}

/// A validated FEN record.
///
/// The placement and castling fields stay textual because their
/// interpretation (bitboard population, Chess960 rook resolution) belongs
/// to the position layer; everything else is parsed into core types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Piece placement, rank 8 first, as validated text.
    pub placement: String,
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability: `KQkq` letters, Chess960 file letters, or `-`.
    pub castling: String,
    /// En passant target square, if one is given.
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Fullmove counter, starting at 1.
    pub fullmove_number: u32,
}

impl FenRecord {
    /// The standard starting position.
    pub const STARTPOS: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Validates a FEN string and splits it into its six fields.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let (Some(placement), Some(side), Some(castling), Some(en_passant), Some(halfmove), Some(fullmove), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(FenError::FieldCount(fen.split_whitespace().count()));
        };

        validate_placement(placement)?;

        let side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        validate_castling(castling)?;

        let en_passant = parse_en_passant(en_passant)?;

        let parse_clock = |text: &str| {
            text.parse::<u32>()
                .map_err(|_| FenError::Clock(text.to_string()))
        };

        Ok(FenRecord {
            placement: placement.to_string(),
            side_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock: parse_clock(halfmove)?,
            fullmove_number: parse_clock(fullmove)?,
        })
    }

    /// Walks the placement field, yielding every occupied square with its
    /// piece. Squares come out rank by rank from rank 1 upward.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.placement
            .split('/')
            .rev()
            .enumerate()
            .flat_map(|(rank, row)| {
                let mut file = 0u8;
                row.chars().filter_map(move |c| {
                    if let Some(run) = c.to_digit(10) {
                        file += run as u8;
                        return None;
                    }
                    let piece = Piece::from_fen_char(c)?;
                    let square = File::from_index(file)
                        .zip(Rank::from_index(rank as u8))
                        .map(|(f, r)| Square::new(f, r))?;
                    file += 1;
                    Some((square, piece))
                })
            })
    }

    /// Reassembles the six fields into a FEN string.
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            side,
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

/// Checks that the placement field has eight ranks of eight squares built
/// from piece letters and empty-run digits.
fn validate_placement(placement: &str) -> Result<(), FenError> {
    let mut ranks = 0usize;

    for row in placement.split('/') {
        ranks += 1;
        let mut width = 0u32;

        for c in row.chars() {
            width += match c.to_digit(10) {
                Some(run) => run,
                None if Piece::from_fen_char(c).is_some() => 1,
                None => {
                    return Err(FenError::Placement(format!(
                        "unexpected character '{}'",
                        c
                    )))
                }
            };
        }

        if width != 8 {
            return Err(FenError::Placement(format!(
                "rank {} covers {} squares",
                9 - ranks,
                width
            )));
        }
    }

    if ranks != 8 {
        return Err(FenError::Placement(format!("{} ranks", ranks)));
    }
    Ok(())
}

/// Accepts `-`, the standard `KQkq` letters, and Chess960 file letters
/// (`A`-`H` for White, `a`-`h` for Black).
fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    if castling.is_empty() || castling.len() > 4 {
        return Err(FenError::Castling(castling.to_string()));
    }

    let allowed =
        |c: char| matches!(c, 'K' | 'Q' | 'k' | 'q') || matches!(c.to_ascii_lowercase(), 'a'..='h');
    match castling.chars().find(|&c| !allowed(c)) {
        Some(c) => Err(FenError::Castling(format!("unexpected character '{}'", c))),
        None => Ok(()),
    }
}

/// Accepts `-` or a square on the third or sixth rank.
fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(field) {
        Some(sq) if matches!(sq.rank(), Rank::R3 | Rank::R6) => Ok(Some(sq)),
        _ => Err(FenError::EnPassant(field.to_string())),
    }
}
