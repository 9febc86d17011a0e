use super::{castling::CastlingKind, Board};
use crate::lookup::{between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::types::{Bitboard, Color, MoveKind, MoveList, PieceType, Square};

const QUIET: u8 = 0;
const NOISY: u8 = 1;

impl Board {
    /// Generates all pseudo-legal moves for the side to move. King safety is
    /// validated by `make_move`.
    pub fn generate_all_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.collect_moves::<NOISY>(&mut list);
        self.collect_moves::<QUIET>(&mut list);
        list
    }

    /// Generates pseudo-legal captures, en-passant, and queen promotions.
    pub fn generate_capture_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.collect_moves::<NOISY>(&mut list);
        list
    }

    /// Returns `true` if the side to move has at least one legal move.
    pub fn has_legal_moves(&mut self) -> bool {
        let list = self.generate_all_moves();

        for &mv in list.iter() {
            if self.make_move(mv) {
                self.undo_move();
                return true;
            }
        }

        false
    }

    fn collect_moves<const KIND: u8>(&self, list: &mut MoveList) {
        let occupied = self.occupancies();

        self.collect_pawn_moves::<KIND>(list);
        self.collect_piece_moves::<KIND, _>(list, PieceType::Knight, knight_attacks);
        self.collect_piece_moves::<KIND, _>(list, PieceType::Bishop, |from| bishop_attacks(from, occupied));
        self.collect_piece_moves::<KIND, _>(list, PieceType::Rook, |from| rook_attacks(from, occupied));
        self.collect_piece_moves::<KIND, _>(list, PieceType::Queen, |from| queen_attacks(from, occupied));
        self.collect_piece_moves::<KIND, _>(list, PieceType::King, king_attacks);

        if KIND == QUIET {
            self.collect_castling(list);
        }
    }

    fn collect_piece_moves<const KIND: u8, F>(&self, list: &mut MoveList, piece_type: PieceType, attacks: F)
    where
        F: Fn(Square) -> Bitboard,
    {
        for from in self.our(piece_type) {
            let targets = attacks(from) & !self.us();

            if KIND == NOISY {
                for to in targets & self.them() {
                    list.add(from, to, MoveKind::Capture);
                }
            } else {
                for to in targets & !self.them() {
                    list.add(from, to, MoveKind::Quiet);
                }
            }
        }
    }

    fn collect_pawn_moves<const KIND: u8>(&self, list: &mut MoveList) {
        let pawns = self.our(PieceType::Pawn);
        let (up, promotion_rank, double_push_rank) = match self.side_to_move {
            Color::White => (8i8, Bitboard::rank(6), Bitboard::rank(2)),
            Color::Black => (-8i8, Bitboard::rank(1), Bitboard::rank(5)),
        };

        let empty = !self.occupancies();

        if KIND == QUIET {
            let single_pushes = (pawns & !promotion_rank).shift(up) & empty;
            let double_pushes = (single_pushes & double_push_rank).shift(up) & empty;

            for to in single_pushes {
                list.add(to.shift(-up), to, MoveKind::Quiet);
            }
            for to in double_pushes {
                list.add(to.shift(-up * 2), to, MoveKind::DoublePush);
            }
        }

        // Queen promotions count as noisy, underpromotions as quiet
        for to in (pawns & promotion_rank).shift(up) & empty {
            let from = to.shift(-up);
            if KIND == NOISY {
                list.add(from, to, MoveKind::PromotionQ);
            } else {
                list.add(from, to, MoveKind::PromotionR);
                list.add(from, to, MoveKind::PromotionB);
                list.add(from, to, MoveKind::PromotionN);
            }
        }

        if KIND == NOISY {
            for from in pawns & promotion_rank {
                for to in pawn_attacks(from, self.side_to_move) & self.them() {
                    list.add(from, to, MoveKind::PromotionCaptureQ);
                    list.add(from, to, MoveKind::PromotionCaptureR);
                    list.add(from, to, MoveKind::PromotionCaptureB);
                    list.add(from, to, MoveKind::PromotionCaptureN);
                }
            }

            for from in pawns & !promotion_rank {
                for to in pawn_attacks(from, self.side_to_move) & self.them() {
                    list.add(from, to, MoveKind::Capture);
                }
            }

            if self.state.en_passant != Square::None {
                let attackers = pawns & pawn_attacks(self.state.en_passant, !self.side_to_move);
                for from in attackers {
                    list.add(from, self.state.en_passant, MoveKind::EnPassant);
                }
            }
        }
    }

    fn collect_castling(&self, list: &mut MoveList) {
        let us = self.side_to_move;
        self.collect_castling_kind(list, CastlingKind::short(us), MoveKind::CastleShort);
        self.collect_castling_kind(list, CastlingKind::long(us), MoveKind::CastleLong);
    }

    /// Adds the castling move if the rights are intact, the path is empty,
    /// and neither the king square nor its transit square is attacked. The
    /// landing square is covered by make-time legality validation.
    fn collect_castling_kind(&self, list: &mut MoveList, kind: CastlingKind, move_kind: MoveKind) {
        if !self.state.castling.is_allowed(kind) {
            return;
        }

        if !(kind.path() & self.occupancies()).is_empty() {
            return;
        }

        let king = self.king_square(self.side_to_move);
        let transit = king.to_bb() | between(king, kind.king_target());

        for square in transit {
            if self.is_square_attacked_by(square, !self.side_to_move) {
                return;
            }
        }

        list.add(king, kind.king_target(), move_kind);
    }
}
