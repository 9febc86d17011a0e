use super::{NodeState, Searcher};
use crate::evaluate::evaluate;
use crate::tables::Bound;
use crate::types::{mate_in, mated_in, Move, Score, MAX_PLY};

impl Searcher<'_> {
    /// Resolves tactical noise at the horizon by searching captures only
    /// (or every evasion while in check) until the position is quiet enough
    /// for the static evaluation to stand.
    ///
    /// See [Quiescence Search](https://www.chessprogramming.org/Quiescence_Search)
    /// for more information.
    pub(super) fn quiescence(&mut self, mut alpha: i32, mut beta: i32) -> i32 {
        self.pv.clear(self.ply);

        if self.should_interrupt() {
            return Score::ZERO;
        }

        // No line from here can be better than mating or worse than being
        // mated at the current ply
        alpha = alpha.max(mated_in(self.ply));
        beta = beta.min(mate_in(self.ply + 1));
        if alpha >= beta {
            return alpha;
        }

        if self.ply >= MAX_PLY {
            return evaluate(self.board);
        }

        self.nodes += 1;
        self.sel_depth = self.sel_depth.max(self.ply);

        // Any stored bound cuts here; quiescence entries are depth 0
        let entry = self.tt.read(self.board.hash(), self.ply);
        if let Some(hit) = entry {
            let cutoff = match hit.bound {
                Bound::Exact => true,
                Bound::Lower => hit.score >= beta,
                Bound::Upper => hit.score <= alpha,
            };
            if cutoff {
                return hit.score;
            }
        }

        let in_check = self.board.in_check();
        let original_alpha = alpha;

        let mut best_score;
        let mut best_move = Move::NULL;

        // In check there is no stand pat: every evasion is searched and
        // finding none means mate at this ply
        let mut moves = if in_check {
            best_score = mated_in(self.ply);
            self.board.generate_all_moves()
        } else {
            best_score = evaluate(self.board);
            if best_score >= beta {
                return best_score;
            }
            alpha = alpha.max(best_score);
            self.board.generate_capture_moves()
        };

        let mut ordering = self.build_ordering(&moves, Move::NULL);

        while let Some(mv) = moves.next_best(&mut ordering) {
            if !in_check {
                if !mv.is_capture() {
                    continue;
                }
                // Only exchanges that win material can beat the stand pat
                if !self.board.see(mv, 1) {
                    continue;
                }
            }

            self.tt.prefetch(self.board.key_after(mv));

            self.ns[self.ply] = NodeState {
                eval: best_score,
                mv,
                piece: self.board.piece_on(mv.from()),
                is_null: false,
                is_tactical: !mv.is_quiet(),
            };

            if !self.board.make_move(mv) {
                continue;
            }

            self.ply += 1;
            let score = -self.quiescence(-beta, -alpha);
            self.ply -= 1;
            self.board.undo_move();

            if self.stopped {
                return Score::ZERO;
            }

            if score > best_score {
                best_score = score;

                if score > alpha {
                    alpha = score;
                    best_move = mv;
                    self.pv.update(self.ply, mv);
                }
            }

            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };

        self.tt.write(self.board.hash(), 0, best_score, bound, best_move, self.ply);
        best_score
    }
}
