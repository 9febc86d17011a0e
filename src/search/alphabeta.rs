use super::{NodeState, Searcher};
use crate::evaluate::evaluate;
use crate::tables::{history_bonus, Bound, Hit};
use crate::types::{mated_in, Move, MoveList, Piece, Score, MAX_PLY};

/// How many quiet moves may be tried before late move pruning shuts the
/// rest out, by depth, for the non-improving and improving cases.
const LMP_THRESHOLDS: [[i32; 11]; 2] = [
    [0, 2, 3, 5, 9, 13, 18, 25, 34, 45, 55],
    [0, 5, 6, 9, 14, 21, 30, 41, 55, 69, 84],
];

impl Searcher<'_> {
    /// The principal variation search: a fail-soft alpha-beta with the
    /// window-restriction, pruning and reduction heuristics layered on top.
    pub(super) fn alpha_beta<const PV: bool, const ROOT: bool>(
        &mut self,
        mut alpha: i32,
        mut beta: i32,
        mut depth: i32,
        cutnode: bool,
    ) -> i32 {
        self.pv.clear(self.ply);

        if self.should_interrupt() {
            return Score::ZERO;
        }

        let in_check = self.board.in_check();

        // The horizon belongs to quiescence, except that an unresolved check
        // extends the node by force
        if depth <= 0 && !in_check {
            return self.quiescence(alpha, beta);
        }
        depth = depth.max(1);

        self.nodes += 1;
        self.sel_depth = self.sel_depth.max(self.ply);

        if !ROOT {
            // A draw score with two centipawns of noise, so repeated
            // positions do not echo through the principal variation
            if self.board.is_draw() {
                return 1 - (self.nodes as i32 & 2);
            }

            if self.ply >= MAX_PLY {
                return if in_check { Score::ZERO } else { evaluate(self.board) };
            }

            // Mate distance pruning: a shorter mate elsewhere bounds both
            // ends of the window
            alpha = alpha.max(mated_in(self.ply));
            beta = beta.min(Score::MATE - self.ply as i32 + 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let entry = self.tt.read(self.board.hash(), self.ply);
        let mut tt_move = Move::NULL;

        if let Some(hit) = entry {
            tt_move = hit.mv;

            if !PV && hit.depth >= depth && (cutnode || hit.score <= alpha) {
                let cutoff = match hit.bound {
                    Bound::Exact => true,
                    Bound::Lower => hit.score >= beta,
                    Bound::Upper => hit.score <= alpha,
                };

                if cutoff {
                    // The hash move keeps cutting; feed that back into the
                    // quiet ordering
                    if hit.score >= beta && !hit.mv.is_empty() && hit.mv.is_quiet() {
                        let bonus = history_bonus(depth);
                        self.history.update_quiet(self.board.side_to_move(), hit.mv, bonus);
                    }
                    return hit.score;
                }
            }

            // A barely shallower upper bound far below alpha settles the
            // node without a search
            if !PV
                && hit.depth >= depth - 1
                && hit.bound == Bound::Upper
                && hit.score + 140 <= alpha
                && (cutnode || hit.score <= alpha)
            {
                return alpha;
            }
        }

        // Internal iterative reductions: with no hash move the ordering is
        // blind, so the depth budget buys less here than elsewhere
        if !ROOT && depth >= 4 && entry.is_none() {
            depth -= 1;
        }

        let static_eval = if in_check { -Score::INFINITY } else { evaluate(self.board) };
        self.ns[self.ply].eval = static_eval;

        // The hash score is a tighter estimate than the static eval whenever
        // its bound points past it
        let mut eval = static_eval;
        if let Some(hit) = entry {
            let refines = match hit.bound {
                Bound::Exact => true,
                Bound::Lower => hit.score > eval,
                Bound::Upper => hit.score < eval,
            };
            if !in_check && refines {
                eval = hit.score;
            }
        }

        let improving = self.ply >= 2 && !in_check && static_eval > self.ns[self.ply - 2].eval;

        if !ROOT && !PV && !in_check {
            // Razoring: when even an optimistic margin cannot reach alpha,
            // ask quiescence whether tactics change the verdict
            if depth <= 2 && static_eval + 150 + 75 * i32::from(improving) <= alpha {
                let score = self.quiescence(alpha, beta);
                if score <= alpha {
                    return score;
                }
            }

            // Reverse futility: an eval this far above beta rarely comes
            // back down within a few plies
            if depth <= 8 && eval - 85 * (depth - i32::from(improving)) >= beta {
                return eval;
            }

            if let Some(score) = self.null_move_pruning(depth, beta, eval, cutnode, entry) {
                return score;
            }
        }

        self.killers.reset(self.ply + 1);

        let original_alpha = alpha;
        let mut best_score = -Score::INFINITY;
        let mut best_move = Move::NULL;

        let mut moves_played = 0;
        let mut skip_quiets = false;
        let mut quiets_tried = MoveList::new();

        let mut moves = self.board.generate_all_moves();
        let mut ordering = self.build_ordering(&moves, tt_move);

        while let Some(mv) = moves.next_best(&mut ordering) {
            let is_quiet = mv.is_quiet();

            if is_quiet && skip_quiets {
                continue;
            }

            let quiet_history = self.history.quiet(self.board.side_to_move(), mv);

            if !ROOT && is_quiet && !in_check && best_score > -Score::MATE_BOUND {
                let idx = usize::from(improving);

                // History pruning: quiets with a bad track record are not
                // worth trying at the lowest depths
                if depth <= [3, 2][idx] && quiet_history < [-1000, -2000][idx] * depth {
                    continue;
                }

                // Futility pruning: far below alpha, only tactics can save
                // the node, so the remaining quiets are dropped
                if depth <= 8 && static_eval + 90 * depth <= alpha && quiet_history < [-500, -1000][idx] {
                    skip_quiets = true;
                    continue;
                }

                // Late move pruning: enough quiets have failed already
                if depth <= 8 && quiets_tried.len() as i32 >= LMP_THRESHOLDS[idx][depth.min(10) as usize] {
                    skip_quiets = true;
                    continue;
                }
            }

            // Resolved before the move is made: the killer and history
            // signals belong to this ply, not the child's
            let reduction = if moves_played > 0 && depth > 2 && is_quiet {
                self.reduction::<PV>(depth, moves_played, improving, quiet_history, mv)
            } else {
                1
            };

            self.tt.prefetch(self.board.key_after(mv));

            self.ns[self.ply] = NodeState {
                eval: static_eval,
                mv,
                piece: self.board.piece_on(mv.from()),
                is_null: false,
                is_tactical: !is_quiet,
            };

            if !self.board.make_move(mv) {
                continue;
            }
            self.ply += 1;

            let gives_check = self.board.in_check();
            let new_depth = depth - 1 + i32::from(gives_check);

            let mut score;
            if PV && moves_played == 0 {
                score = -self.alpha_beta::<true, false>(-beta, -alpha, new_depth, false);
            } else {
                let reduced = if reduction > 1 { new_depth - reduction } else { new_depth };
                score = -self.alpha_beta::<false, false>(-alpha - 1, -alpha, reduced, !cutnode);

                if score > alpha && reduced < new_depth {
                    score = -self.alpha_beta::<false, false>(-alpha - 1, -alpha, new_depth, !cutnode);
                }
                if PV && score > alpha {
                    score = -self.alpha_beta::<true, false>(-beta, -alpha, new_depth, false);
                }
            }

            self.ply -= 1;
            self.board.undo_move();
            moves_played += 1;

            // A stopped search leaves partial scores behind; discard them
            if self.stopped {
                return Score::ZERO;
            }

            if score > best_score {
                best_score = score;

                if score > alpha {
                    best_move = mv;
                    alpha = score;
                    self.pv.update(self.ply, mv);
                }
            }

            if alpha >= beta {
                if is_quiet {
                    self.update_quiet_heuristics(depth, mv, quiets_tried.as_slice());
                }
                break;
            }

            if is_quiet {
                quiets_tried.push(mv);
            }
        }

        if moves_played == 0 {
            return if in_check { mated_in(self.ply) } else { Score::DRAW };
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };

        self.tt.write(self.board.hash(), depth, best_score, bound, best_move, self.ply);
        best_score
    }

    /// If handing the opponent a free move still fails high, a real move
    /// will too. Unsound in zugzwang, hence the material condition.
    fn null_move_pruning(&mut self, depth: i32, beta: i32, eval: i32, cutnode: bool, entry: Option<Hit>) -> Option<i32> {
        let parent = self.ns[self.ply - 1];
        let tt_refutes = entry.is_some_and(|hit| hit.bound == Bound::Upper && hit.score < beta);

        if eval < beta || depth < 2 || parent.is_null || tt_refutes || !self.board.has_non_pawn_material() {
            return None;
        }

        let reduction = 4 + depth / 5 + ((eval - beta) / 191).min(3) + i32::from(parent.is_tactical);

        self.ns[self.ply].mv = Move::NULL;
        self.ns[self.ply].piece = Piece::None;
        self.ns[self.ply].is_null = true;
        self.ns[self.ply].is_tactical = false;

        self.board.make_null_move();
        self.ply += 1;
        let score = -self.alpha_beta::<false, false>(-beta, -beta + 1, depth - reduction, !cutnode);
        self.ply -= 1;
        self.board.undo_null_move();

        if self.stopped {
            return Some(Score::ZERO);
        }

        if score >= beta {
            // A mate found with a move in hand is not proven
            return Some(if score >= Score::MATE_BOUND { beta } else { score });
        }

        None
    }

    /// The late move reduction for a quiet move, clamped so the reduced
    /// search neither extends nor collapses entirely.
    fn reduction<const PV: bool>(&self, depth: i32, moves_played: i32, improving: bool, quiet_history: i32, mv: Move) -> i32 {
        let mut reduction = self.lmr.get(depth, moves_played as usize + 1);

        reduction += i32::from(!improving);
        reduction -= i32::from(PV);
        reduction -= i32::from(self.killers.contains(mv, self.ply));
        reduction -= (quiet_history / 7000).clamp(-2, 2);

        reduction.clamp(1, depth - 1)
    }

    /// The bookkeeping after a quiet move refuted the node: reward it in
    /// every history table, punish the quiets tried before it, and register
    /// it as a killer and counter move.
    fn update_quiet_heuristics(&mut self, depth: i32, best_move: Move, quiets: &[Move]) {
        let bonus = history_bonus(depth);
        let side = self.board.side_to_move();
        let piece = self.board.piece_on(best_move.from());

        self.history.update_quiet(side, best_move, bonus);
        for &quiet in quiets {
            self.history.update_quiet(side, quiet, -bonus);
        }

        self.killers.add(best_move, self.ply);

        if self.ply >= 1 {
            let parent = self.ns[self.ply - 1];
            if !parent.mv.is_empty() {
                let prev_to = parent.mv.to();

                self.history.update_counter(parent.piece, prev_to, piece, best_move.to(), bonus);
                for &quiet in quiets {
                    let quiet_piece = self.board.piece_on(quiet.from());
                    self.history.update_counter(parent.piece, prev_to, quiet_piece, quiet.to(), -bonus);
                }

                self.counters.set(parent.piece, prev_to, best_move);
            }
        }

        if self.ply >= 2 {
            let grandparent = self.ns[self.ply - 2];
            if !grandparent.mv.is_empty() {
                let prev_to = grandparent.mv.to();

                self.history.update_followup(grandparent.piece, prev_to, piece, best_move.to(), bonus);
                for &quiet in quiets {
                    let quiet_piece = self.board.piece_on(quiet.from());
                    self.history.update_followup(grandparent.piece, prev_to, quiet_piece, quiet.to(), -bonus);
                }
            }
        }
    }
}
