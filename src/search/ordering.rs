use super::Searcher;
use crate::types::{Move, MoveList, PieceType, MAX_MOVES, PIECE_VALUES};

/// Captures keep their sort tier as long as they do not lose more than
/// a minor exchange's worth of margin.
const SEE_ORDERING_THRESHOLD: i32 = -98;

impl Searcher<'_> {
    const HASH_MOVE: i32 = 9_000_000;

    const QUEEN_PROMOTION_CAPTURE: i32 = 1_500_000;
    const KNIGHT_PROMOTION_CAPTURE: i32 = 1_400_000;
    const WINNING_CAPTURE: i32 = 1_200_000;
    const QUEEN_PROMOTION: i32 = 1_100_000;
    const KNIGHT_PROMOTION: i32 = 1_000_000;

    const KILLER_FIRST: i32 = 900_000;
    const KILLER_SECOND: i32 = 800_000;
    const COUNTER_MOVE: i32 = 700_000;

    const LOSING_CAPTURE: i32 = -900_000;
    const UNDERPROMOTION: i32 = -1_500_000;

    /// Assigns every generated move its sort key. Extraction happens lazily
    /// through `MoveList::next_best`, so only the searched prefix of the
    /// list ever pays for ordering.
    pub(super) fn build_ordering(&self, moves: &MoveList, tt_move: Move) -> [i32; MAX_MOVES] {
        let mut ordering = [0; MAX_MOVES];
        for index in 0..moves.len() {
            ordering[index] = self.score_move(moves[index], tt_move);
        }
        ordering
    }

    fn score_move(&self, mv: Move, tt_move: Move) -> i32 {
        if mv == tt_move && !mv.is_empty() {
            return Self::HASH_MOVE;
        }

        if let Some(promotion) = mv.promotion_type() {
            return match (promotion, mv.is_capture()) {
                (PieceType::Queen, true) => Self::QUEEN_PROMOTION_CAPTURE,
                (PieceType::Knight, true) => Self::KNIGHT_PROMOTION_CAPTURE,
                (PieceType::Queen, false) => Self::QUEEN_PROMOTION,
                (PieceType::Knight, false) => Self::KNIGHT_PROMOTION,
                _ => Self::UNDERPROMOTION,
            };
        }

        if mv.is_capture() {
            // En passant victims sit beside the target square
            let victim = match mv.is_en_passant() {
                true => PieceType::Pawn,
                false => self.board.piece_on(mv.to()).piece_type(),
            };
            let exchange = 10 * PIECE_VALUES[victim] - self.board.piece_on(mv.from()).value();

            return match self.board.see(mv, SEE_ORDERING_THRESHOLD) {
                true => Self::WINNING_CAPTURE + exchange,
                false => Self::LOSING_CAPTURE + exchange,
            };
        }

        if mv == self.killers.first(self.ply) {
            return Self::KILLER_FIRST;
        }
        if mv == self.killers.second(self.ply) {
            return Self::KILLER_SECOND;
        }

        if self.ply >= 1 {
            let parent = self.ns[self.ply - 1];
            if !parent.mv.is_empty() && self.counters.get(parent.piece, parent.mv.to()) == mv {
                return Self::COUNTER_MOVE;
            }
        }

        // Remaining quiets: exchange safety plus the three history signals
        let piece = self.board.piece_on(mv.from());
        let mut score = self.board.see_value(mv, false) + self.history.quiet(self.board.side_to_move(), mv);

        if self.ply >= 1 {
            let parent = self.ns[self.ply - 1];
            if !parent.mv.is_empty() {
                score += self.history.counter(parent.piece, parent.mv.to(), piece, mv.to());
            }
        }

        if self.ply >= 2 {
            let grandparent = self.ns[self.ply - 2];
            if !grandparent.mv.is_empty() {
                score += self.history.followup(grandparent.piece, grandparent.mv.to(), piece, mv.to());
            }
        }

        score
    }
}
