use super::Searcher;
use crate::types::{Color, Move, Score};

/// The half-width of the first aspiration window, once the previous
/// iteration's score is stable enough to anchor one.
const ASPIRATION_DELTA: i32 = 25;
const ASPIRATION_MIN_DEPTH: i32 = 7;

impl Searcher<'_> {
    /// Repeats depth-limited searches with increasing depth until a limit
    /// fires. Each completed iteration reports an `info` line and promotes
    /// its principal variation; an aborted iteration never does.
    pub(super) fn iterative_deepening(&mut self) -> Move {
        let mut best_move = Move::NULL;
        let mut last_score = 0;

        for depth in 1..=self.time_manager.max_depth() {
            let score = self.aspiration_window(last_score, depth);

            if self.stopped {
                break;
            }

            last_score = score;
            best_move = self.pv.best_move();
            self.finished_depth = depth;
            self.score = score;

            if !self.silent {
                self.report(depth, score);
            }

            // Pawn endgames burn the soft budget slower: iterations there
            // are cheap and rarely change the move
            let endgame = self.board.phase(Color::White) + self.board.phase(Color::Black) == 64;
            if self.time_manager.is_soft_bound_reached(endgame) {
                break;
            }

            self.sel_depth = 0;
        }

        best_move
    }

    /// Searches with a window centered on the previous score, widening
    /// exponentially on failure. A fail-high retries one ply shallower; the
    /// re-search is cheaper and almost always confirms the cutoff.
    fn aspiration_window(&mut self, mut score: i32, mut depth: i32) -> i32 {
        let mut delta = if depth >= ASPIRATION_MIN_DEPTH { ASPIRATION_DELTA } else { Score::INFINITY };

        let mut alpha = (-Score::INFINITY).max(score.saturating_sub(delta));
        let mut beta = Score::INFINITY.min(score.saturating_add(delta));

        loop {
            score = self.alpha_beta::<true, true>(alpha, beta, depth, false);

            if self.stopped {
                return Score::ZERO;
            }

            if score <= alpha {
                beta = (alpha + beta) / 2;
                alpha = (-Score::INFINITY).max(alpha - delta);
            } else if score >= beta {
                beta = Score::INFINITY.min(beta + delta);
                depth = (depth - 1).max(1);
            } else {
                return score;
            }

            delta = delta.saturating_mul(2);
        }
    }

    /// One `info` line per completed iteration, in the format GUIs expect.
    fn report(&self, depth: i32, score: i32) {
        let elapsed = self.time_manager.elapsed();
        let nps = self.nodes as f64 / elapsed.as_secs_f64();
        let ms = elapsed.as_millis();

        print!(
            "info depth {depth} seldepth {} score {} nodes {} nps {nps:.0} time {ms} hashfull {} pv",
            self.sel_depth,
            format_score(score),
            self.nodes,
            self.tt.hashfull(),
        );
        for mv in self.pv.line() {
            print!(" {mv}");
        }
        println!();
    }
}

/// Formats a score as `cp <n>`, or `mate <n>` in moves (not plies) once it
/// is inside the mate window.
fn format_score(score: i32) -> String {
    if score >= Score::MATE_BOUND {
        return format!("mate {}", (Score::MATE - score + 1) / 2);
    }
    if score <= -Score::MATE_BOUND {
        return format!("mate {}", (-Score::MATE - score) / 2);
    }
    format!("cp {score}")
}

#[cfg(test)]
mod tests {
    use super::format_score;
    use crate::types::Score;

    #[test]
    fn formats_centipawns_and_mates() {
        assert_eq!(format_score(64), "cp 64");
        assert_eq!(format_score(-210), "cp -210");

        // Mate in 2 moves is 3 plies from the root
        assert_eq!(format_score(Score::MATE - 3), "mate 2");
        assert_eq!(format_score(-Score::MATE + 4), "mate -2");
    }
}
