pub use self::fen::ParseFenError;

use self::castling::Castling;
use self::zobrist::ZOBRIST;
use crate::lookup::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::types::{Bitboard, Color, Move, Piece, PieceType, Square};

#[cfg(test)]
mod tests;

mod castling;
mod fen;
mod makemove;
mod movegen;
mod zobrist;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Weights of the non-pawn material that drive the game phase.
const PHASE_WEIGHTS: [i32; PieceType::NUM] = [0, 3, 3, 5, 9, 0];

/// The per-move state that cannot be recomputed when a move is unmade. It is
/// pushed onto a stack before every make and popped on unmake.
#[derive(Copy, Clone)]
struct State {
    hash: u64,
    castling: Castling,
    en_passant: Square,
    halfmove_clock: u8,
    captured: Piece,
    mv: Move,
}

impl Default for State {
    fn default() -> Self {
        Self {
            hash: 0,
            castling: Castling::default(),
            en_passant: Square::None,
            halfmove_clock: 0,
            captured: Piece::None,
            mv: Move::NULL,
        }
    }
}

/// A full position: twelve piece bitboards, color occupancies, a mailbox for
/// square lookups, and the stack of irreversible state for unmake and
/// repetition detection.
#[derive(Clone)]
pub struct Board {
    side_to_move: Color,
    pieces: [Bitboard; Piece::NUM],
    colors: [Bitboard; Color::NUM],
    mailbox: [Piece; Square::NUM],
    state: State,
    state_stack: Vec<State>,
}

impl Board {
    /// Parses the board from Forsyth-Edwards notation.
    pub fn new(fen: &str) -> Result<Self, ParseFenError> {
        Self::from_fen(fen)
    }

    pub fn starting_position() -> Self {
        Self::new(STARTPOS_FEN).expect("the starting position is valid")
    }

    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The Zobrist hash of the current position.
    pub const fn hash(&self) -> u64 {
        self.state.hash
    }

    pub fn colors(&self, color: Color) -> Bitboard {
        self.colors[color]
    }

    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece]
    }

    /// All pieces of the given type, both colors combined.
    pub fn pieces_of(&self, piece_type: PieceType) -> Bitboard {
        self.of(piece_type, Color::White) | self.of(piece_type, Color::Black)
    }

    pub fn of(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.pieces[Piece::new(color, piece_type)]
    }

    pub fn occupancies(&self) -> Bitboard {
        self.colors[Color::White] | self.colors[Color::Black]
    }

    pub fn us(&self) -> Bitboard {
        self.colors[self.side_to_move]
    }

    pub fn them(&self) -> Bitboard {
        self.colors[!self.side_to_move]
    }

    pub fn our(&self, piece_type: PieceType) -> Bitboard {
        self.of(piece_type, self.side_to_move)
    }

    pub fn their(&self, piece_type: PieceType) -> Bitboard {
        self.of(piece_type, !self.side_to_move)
    }

    pub fn piece_on(&self, square: Square) -> Piece {
        self.mailbox[square]
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.of(PieceType::King, color).lsb()
    }

    /// Diagonal sliders (bishops and queens) of both colors.
    pub fn diagonal_sliders(&self) -> Bitboard {
        self.pieces_of(PieceType::Bishop) | self.pieces_of(PieceType::Queen)
    }

    /// Orthogonal sliders (rooks and queens) of both colors.
    pub fn orthogonal_sliders(&self) -> Bitboard {
        self.pieces_of(PieceType::Rook) | self.pieces_of(PieceType::Queen)
    }

    /// Whether the side to move still has pieces other than pawns and the
    /// king. Null-move pruning is unsound in pawn endgames due to zugzwang.
    pub fn has_non_pawn_material(&self) -> bool {
        self.our(PieceType::Pawn) | self.our(PieceType::King) != self.us()
    }

    /// The remaining material phase of one side, from `0` (full army)
    /// up to `32` (a bare king).
    pub fn phase(&self, color: Color) -> i32 {
        let material: i32 = [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen]
            .iter()
            .map(|&piece_type| self.of(piece_type, color).count() as i32 * PHASE_WEIGHTS[piece_type])
            .sum();

        32 - material.min(32)
    }

    /// All pieces of either color attacking `square` through the given
    /// occupancy. Used by exchange evaluation and check detection.
    pub fn attackers_to(&self, square: Square, occupied: Bitboard) -> Bitboard {
        king_attacks(square) & self.pieces_of(PieceType::King)
            | knight_attacks(square) & self.pieces_of(PieceType::Knight)
            | pawn_attacks(square, Color::White) & self.of(PieceType::Pawn, Color::Black)
            | pawn_attacks(square, Color::Black) & self.of(PieceType::Pawn, Color::White)
            | rook_attacks(square, occupied) & self.orthogonal_sliders()
            | bishop_attacks(square, occupied) & self.diagonal_sliders()
    }

    pub fn is_square_attacked_by(&self, square: Square, color: Color) -> bool {
        !(self.attackers_to(square, self.occupancies()) & self.colors(color)).is_empty()
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.is_square_attacked_by(self.king_square(self.side_to_move), !self.side_to_move)
    }

    /// Whether the position is drawn by repetition, the fifty-move rule, or
    /// insufficient material.
    pub fn is_draw(&self) -> bool {
        self.draw_by_repetition() || self.draw_by_fifty_move_rule() || self.draw_by_insufficient_material()
    }

    /// Whether the current position occurred before in the game or search
    /// line. A single prior occurrence counts: a repetition the opponent can
    /// force is already worth no more than a draw to the search.
    fn draw_by_repetition(&self) -> bool {
        self.state_stack
            .iter()
            .rev()
            .skip(1)
            .step_by(2)
            .take(self.state.halfmove_clock as usize / 2 + 1)
            .any(|state| state.hash == self.state.hash)
    }

    const fn draw_by_fifty_move_rule(&self) -> bool {
        self.state.halfmove_clock >= 100
    }

    /// Bare kings, or king versus king and a single minor piece.
    fn draw_by_insufficient_material(&self) -> bool {
        match self.occupancies().count() {
            2 => true,
            3 => !(self.pieces_of(PieceType::Knight) | self.pieces_of(PieceType::Bishop)).is_empty(),
            _ => false,
        }
    }

    /// Estimates the hash of the position after `mv`, for prefetching the
    /// transposition table entry before the move is made.
    pub fn key_after(&self, mv: Move) -> u64 {
        let piece = self.piece_on(mv.from());
        let mut key = self.state.hash ^ ZOBRIST.side;

        key ^= ZOBRIST.pieces[piece][mv.from()];
        key ^= ZOBRIST.pieces[piece][mv.to()];

        if mv.is_capture() && !mv.is_en_passant() {
            key ^= ZOBRIST.pieces[self.piece_on(mv.to())][mv.to()];
        }

        key
    }

    /// Computes the Zobrist hash from scratch. Only used when setting up a
    /// position; make/unmake keep the key updated incrementally.
    pub fn generate_hash(&self) -> u64 {
        let mut hash = 0;

        for index in 0..Piece::NUM {
            let piece = Piece::from_index(index);
            for square in self.pieces[piece] {
                hash ^= ZOBRIST.pieces[piece][square];
            }
        }

        if self.state.en_passant != Square::None {
            hash ^= ZOBRIST.en_passant[self.state.en_passant];
        }
        if self.side_to_move == Color::White {
            hash ^= ZOBRIST.side;
        }

        hash ^ ZOBRIST.castling[self.state.castling]
    }

    fn add_piece(&mut self, piece: Piece, square: Square) {
        self.mailbox[square] = piece;
        self.pieces[piece].set(square);
        self.colors[piece.color()].set(square);
        self.state.hash ^= ZOBRIST.pieces[piece][square];
    }

    fn remove_piece(&mut self, piece: Piece, square: Square) {
        self.mailbox[square] = Piece::None;
        self.pieces[piece].clear(square);
        self.colors[piece.color()].clear(square);
        self.state.hash ^= ZOBRIST.pieces[piece][square];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            side_to_move: Color::White,
            pieces: [Bitboard::EMPTY; Piece::NUM],
            colors: [Bitboard::EMPTY; Color::NUM],
            mailbox: [Piece::None; Square::NUM],
            state: State::default(),
            state_stack: Vec::with_capacity(256),
        }
    }
}
