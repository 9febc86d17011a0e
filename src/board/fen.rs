use super::Board;
use crate::types::{Color, Square};

#[derive(Debug)]
pub enum ParseFenError {
    /// The FEN string is missing piece placement data.
    MissingPlacementData,
    /// The FEN string contains an invalid piece character.
    InvalidPiece,
    /// The FEN string contains an invalid active color.
    InvalidActiveColor,
}

impl std::fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let message = match self {
            Self::MissingPlacementData => "missing piece placement data",
            Self::InvalidPiece => "invalid piece character",
            Self::InvalidActiveColor => "invalid active color",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ParseFenError {}

impl Board {
    /// Parses a [Forsyth-Edwards Notation][fen] string.
    ///
    /// The parser is lenient about the trailing clock fields; it is the
    /// GUI's responsibility to supply a sensible position.
    ///
    /// [fen]: https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation
    pub fn from_fen(fen: &str) -> Result<Self, ParseFenError> {
        let mut board = Self::default();
        let mut parts = fen.split_whitespace();

        let rows = parts.next().ok_or(ParseFenError::MissingPlacementData)?.split('/');

        for (rank, row) in rows.rev().enumerate() {
            let mut file = 0;

            for symbol in row.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    file += skip as u8;
                    continue;
                }

                let piece = symbol.try_into().map_err(|()| ParseFenError::InvalidPiece)?;
                board.add_piece(piece, Square::from_rank_file(rank as u8, file));
                file += 1;
            }
        }

        board.side_to_move = match parts.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            _ => return Err(ParseFenError::InvalidActiveColor),
        };

        board.state.castling = parts.next().unwrap_or_default().into();
        board.state.en_passant = parts.next().and_then(|sq| sq.try_into().ok()).unwrap_or(Square::None);
        board.state.halfmove_clock = parts.next().and_then(|clock| clock.parse().ok()).unwrap_or_default();

        board.state.hash = board.generate_hash();
        Ok(board)
    }
}
