//! Static exchange evaluation: the material outcome of a capture sequence on
//! a single square, both sides always recapturing with their least valuable
//! attacker.
//!
//! See [Static Exchange Evaluation](https://www.chessprogramming.org/Static_Exchange_Evaluation)
//! for more information.

use crate::board::Board;
use crate::lookup::{bishop_attacks, rook_attacks};
use crate::types::{Bitboard, Color, Move, PieceType, Square, PIECE_VALUES};

impl Board {
    /// Returns `true` if the exchange starting with `mv` is worth at least
    /// `threshold` for the side to move. Promotions pass unconditionally;
    /// the move scorer ranks them separately.
    pub fn see(&self, mv: Move, threshold: i32) -> bool {
        if mv.is_promotion() {
            return true;
        }

        // The best case is keeping the captured piece
        let mut value = self.capture_value(mv) - threshold;
        if value < 0 {
            return false;
        }

        // The worst case is also losing the capturing piece
        value -= self.piece_on(mv.from()).value();
        if value >= 0 {
            return true;
        }

        let mut occupied = self.occupancies();
        occupied.clear(mv.from());
        occupied.clear(mv.to());
        if mv.is_en_passant() {
            occupied.clear(mv.to().ep_victim());
        }

        let diagonal = self.diagonal_sliders();
        let orthogonal = self.orthogonal_sliders();

        let mut attackers = self.attackers_to(mv.to(), occupied) & occupied;
        let mut stm = !self.side_to_move();

        loop {
            let our_attackers = attackers & self.colors(stm);

            // The side to move has run out of attackers and loses the square
            if our_attackers.is_empty() {
                break;
            }

            let (attacker, square) = self.least_valuable(our_attackers, stm);

            // Capturing with the king is illegal while the square is defended
            if attacker == PieceType::King && !(attackers & self.colors(!stm)).is_empty() {
                break;
            }

            occupied.clear(square);
            stm = !stm;

            value = -value - 1 - PIECE_VALUES[attacker];
            if value >= 0 {
                break;
            }

            // Removing the attacker may expose a slider behind it
            if matches!(attacker, PieceType::Pawn | PieceType::Bishop | PieceType::Queen) {
                attackers |= bishop_attacks(mv.to(), occupied) & diagonal;
            }
            if matches!(attacker, PieceType::Rook | PieceType::Queen) {
                attackers |= rook_attacks(mv.to(), occupied) & orthogonal;
            }
            attackers &= occupied;
        }

        stm != self.side_to_move()
    }

    /// Computes the exact swap-off value of `mv` with a gain stack, assuming
    /// optimal stand-pat decisions on both sides. `prune_positive` stops the
    /// swap early once the outcome can no longer become negative, which is
    /// enough for pruning decisions.
    pub fn see_value(&self, mv: Move, prune_positive: bool) -> i32 {
        const PROMOTION_GAIN: i32 = PIECE_VALUES[PieceType::Queen as usize] - PIECE_VALUES[PieceType::Pawn as usize];

        let to = mv.to();
        let mut gain = [0i32; 32];
        let mut depth = 0;

        let mut occupied = self.occupancies();
        occupied.clear(mv.from());

        gain[0] = if mv.is_en_passant() {
            occupied.clear(to.ep_victim());
            PIECE_VALUES[PieceType::Pawn]
        } else if mv.is_capture() {
            self.piece_on(to).value()
        } else {
            0
        };

        // The first capturing piece; a promotion push swaps in a queen
        let mut attacker_value = self.piece_on(mv.from()).value();
        if mv.is_promotion() {
            attacker_value += PROMOTION_GAIN;
            gain[0] += PROMOTION_GAIN;
        }

        let diagonal = self.diagonal_sliders();
        let orthogonal = self.orthogonal_sliders();

        let mut attackers = self.attackers_to(to, occupied) & occupied;
        let mut stm = !self.side_to_move();

        loop {
            let our_attackers = attackers & self.colors(stm);
            if our_attackers.is_empty() || depth == 31 {
                break;
            }

            depth += 1;
            gain[depth] = attacker_value - gain[depth - 1];

            if prune_positive && gain[depth].max(-gain[depth - 1]) < 0 {
                break;
            }

            let (attacker, square) = self.least_valuable(our_attackers, stm);

            attacker_value = PIECE_VALUES[attacker];
            // A pawn recapturing on the promotion rank promotes as well
            if attacker == PieceType::Pawn && matches!(to.rank(), 0 | 7) {
                attacker_value += PROMOTION_GAIN;
                gain[depth] += PROMOTION_GAIN;
            }

            occupied.clear(square);
            if matches!(attacker, PieceType::Pawn | PieceType::Bishop | PieceType::Queen) {
                attackers |= bishop_attacks(to, occupied) & diagonal;
            }
            if matches!(attacker, PieceType::Rook | PieceType::Queen) {
                attackers |= rook_attacks(to, occupied) & orthogonal;
            }
            attackers &= occupied;

            stm = !stm;
        }

        // Negamax the gain stack: each side may stand pat instead of
        // continuing a losing recapture
        while depth > 0 {
            gain[depth - 1] = gain[depth - 1].min(-gain[depth]);
            depth -= 1;
        }

        gain[0]
    }

    fn capture_value(&self, mv: Move) -> i32 {
        if mv.is_en_passant() {
            return PIECE_VALUES[PieceType::Pawn];
        }
        if !mv.is_capture() {
            return 0;
        }
        self.piece_on(mv.to()).value()
    }

    /// The least valuable attacker among `our_attackers`, scanning piece
    /// types from pawn to king.
    fn least_valuable(&self, our_attackers: Bitboard, color: Color) -> (PieceType, Square) {
        for index in 0..PieceType::NUM {
            let piece_type = PieceType::new(index);
            let candidates = self.of(piece_type, color) & our_attackers;
            if !candidates.is_empty() {
                return (piece_type, candidates.lsb());
            }
        }
        unreachable!("attacker set was checked to be non-empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::new(fen).unwrap()
    }

    fn find_move(board: &Board, uci: &str) -> Move {
        *board.generate_all_moves().iter().find(|mv| mv.to_string() == uci).unwrap()
    }

    #[test]
    fn free_pawn_capture() {
        let board = board("4k3/8/8/4p3/3P4/8/8/4K3 w - - 0 1");
        let mv = find_move(&board, "d4e5");

        assert!(board.see(mv, 0));
        assert_eq!(board.see_value(mv, false), 100);
    }

    #[test]
    fn defended_pawn_costs_a_knight() {
        let board = board("4k3/8/3p4/4p3/8/5N2/8/4K3 w - - 0 1");
        let mv = find_move(&board, "f3e5");

        assert!(!board.see(mv, 0));
        assert_eq!(board.see_value(mv, false), 100 - 300);
    }

    #[test]
    fn recapture_restores_the_balance() {
        // PxP, pxP: a pawn for a pawn
        let board = board("4k3/8/3p4/4p3/3P4/8/8/4K3 w - - 0 1");
        let mv = find_move(&board, "d4e5");

        assert!(board.see(mv, 0));
        assert!(!board.see(mv, 1));
        assert_eq!(board.see_value(mv, false), 0);
    }

    #[test]
    fn xray_rook_battery_wins_the_exchange() {
        // Rook takes defended pawn, backed up by a second rook on the file
        let board = board("4k3/4r3/8/8/8/4p3/4R3/4R1K1 w - - 0 1");
        let mv = find_move(&board, "e2e3");

        assert!(board.see(mv, 0));
        assert_eq!(board.see_value(mv, false), 100 - 500 + 500);
    }

    #[test]
    fn see_agrees_with_see_value() {
        let board = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");

        for &mv in board.generate_capture_moves().iter() {
            if !mv.is_capture() || mv.is_promotion() {
                continue;
            }
            for threshold in [-200, 0, 1, 150] {
                assert_eq!(
                    board.see(mv, threshold),
                    board.see_value(mv, false) >= threshold,
                    "{mv} at threshold {threshold}"
                );
            }
        }
    }
}
