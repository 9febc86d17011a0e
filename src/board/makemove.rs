use super::{zobrist::ZOBRIST, Board};
use crate::types::{Move, MoveKind, Piece, PieceType, Square};

impl Board {
    /// Makes the pseudo-legal `Move`, returning `false` and restoring the
    /// previous position if it leaves the mover's king in check.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let piece = self.mailbox[from];

        self.state_stack.push(self.state);
        self.state.mv = mv;

        self.state.hash ^= ZOBRIST.side;
        self.state.hash ^= ZOBRIST.castling[self.state.castling];

        if self.state.en_passant != Square::None {
            self.state.hash ^= ZOBRIST.en_passant[self.state.en_passant];
            self.state.en_passant = Square::None;
        }

        if mv.is_capture() || piece.piece_type() == PieceType::Pawn {
            self.state.halfmove_clock = 0;
        } else {
            self.state.halfmove_clock = self.state.halfmove_clock.saturating_add(1);
        }

        self.state.captured = if mv.is_en_passant() {
            Piece::new(!us, PieceType::Pawn)
        } else if mv.is_capture() {
            self.mailbox[to]
        } else {
            Piece::None
        };

        if mv.is_capture() && !mv.is_en_passant() {
            self.remove_piece(self.state.captured, to);
        }

        self.remove_piece(piece, from);
        match mv.promotion_type() {
            Some(promotion) => self.add_piece(Piece::new(us, promotion), to),
            None => self.add_piece(piece, to),
        }

        match mv.kind() {
            MoveKind::DoublePush => {
                self.state.en_passant = from.shift(us.forward());
                self.state.hash ^= ZOBRIST.en_passant[self.state.en_passant];
            }
            MoveKind::EnPassant => {
                self.remove_piece(self.state.captured, to.ep_victim());
            }
            MoveKind::CastleShort | MoveKind::CastleLong => {
                let (rook_from, rook_to) = rook_castling_squares(to);
                let rook = Piece::new(us, PieceType::Rook);
                self.remove_piece(rook, rook_from);
                self.add_piece(rook, rook_to);
            }
            _ => (),
        }

        self.state.castling.update_for_square(from);
        self.state.castling.update_for_square(to);
        self.state.hash ^= ZOBRIST.castling[self.state.castling];

        self.side_to_move = !us;

        // Pseudo-legal generation leaves king safety to be validated here
        if self.is_square_attacked_by(self.king_square(us), !us) {
            self.undo_move();
            return false;
        }

        true
    }

    /// Restores the position to the state before the last made move.
    pub fn undo_move(&mut self) {
        let us = !self.side_to_move;
        let mv = self.state.mv;
        let captured = self.state.captured;

        let to = mv.to();
        let piece = self.mailbox[to];

        self.remove_piece(piece, to);
        match mv.promotion_type() {
            Some(_) => self.add_piece(Piece::new(us, PieceType::Pawn), mv.from()),
            None => self.add_piece(piece, mv.from()),
        }

        match mv.kind() {
            MoveKind::EnPassant => self.add_piece(captured, to.ep_victim()),
            MoveKind::CastleShort | MoveKind::CastleLong => {
                let (rook_from, rook_to) = rook_castling_squares(to);
                let rook = Piece::new(us, PieceType::Rook);
                self.remove_piece(rook, rook_to);
                self.add_piece(rook, rook_from);
            }
            _ if captured != Piece::None => self.add_piece(captured, to),
            _ => (),
        }

        self.side_to_move = us;
        self.state = self.state_stack.pop().expect("unmake without a prior make");
    }

    /// Passes the turn without moving, for null-move pruning.
    pub fn make_null_move(&mut self) {
        self.state_stack.push(self.state);
        self.state.mv = Move::NULL;
        self.state.captured = Piece::None;

        self.state.hash ^= ZOBRIST.side;

        if self.state.en_passant != Square::None {
            self.state.hash ^= ZOBRIST.en_passant[self.state.en_passant];
            self.state.en_passant = Square::None;
        }

        self.side_to_move = !self.side_to_move;
    }

    pub fn undo_null_move(&mut self) {
        self.side_to_move = !self.side_to_move;
        self.state = self.state_stack.pop().expect("unmake without a prior make");
    }
}

const fn rook_castling_squares(king_target: Square) -> (Square, Square) {
    match king_target {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        Square::C8 => (Square::A8, Square::D8),
        _ => unreachable!(),
    }
}
