use crate::types::{Color, Move, Piece, Square};

/// The cap on history magnitudes. The gravity update keeps every entry
/// strictly inside `[-MAX_HISTORY, MAX_HISTORY]`.
pub const MAX_HISTORY: i32 = 16_384;

/// A `[piece][to][piece][to]` continuation table: the first pair describes a
/// move made one or two plies ago, the second the quiet reply being scored.
type ContinuationTable = [[[[i32; Square::NUM]; Piece::NUM]; Square::NUM]; Piece::NUM];

/// The bonus (or, negated, the malus) for a cutoff at the given depth.
pub fn history_bonus(depth: i32) -> i32 {
    (16 * depth * depth).min(MAX_HISTORY)
}

/// Applies `entry += bonus - entry * |bonus| / MAX_HISTORY`, pulling the
/// entry toward the bonus at a rate proportional to its own magnitude so
/// values converge instead of overflowing.
fn gravity(entry: &mut i32, bonus: i32) {
    *entry += bonus - *entry * bonus.abs() / MAX_HISTORY;
}

/// Quiet-move ordering history. The butterfly table is indexed by side and
/// from/to squares; the two continuation tables by the moves made one and
/// two plies earlier. All three persist across searches of the same game and
/// are halved when a new game starts.
pub struct History {
    butterfly: Box<[[[i32; Square::NUM]; Square::NUM]; Color::NUM]>,
    counter: Box<ContinuationTable>,
    followup: Box<ContinuationTable>,
}

impl History {
    /// The butterfly score of a quiet move.
    pub fn quiet(&self, side: Color, mv: Move) -> i32 {
        self.butterfly[side][mv.from()][mv.to()]
    }

    /// The 1-ply continuation score: how well `(piece, to)` has answered the
    /// parent move `(prev_piece, prev_to)`.
    pub fn counter(&self, prev_piece: Piece, prev_to: Square, piece: Piece, to: Square) -> i32 {
        self.counter[prev_piece][prev_to][piece][to]
    }

    /// The 2-ply continuation (follow-up) score.
    pub fn followup(&self, prev_piece: Piece, prev_to: Square, piece: Piece, to: Square) -> i32 {
        self.followup[prev_piece][prev_to][piece][to]
    }

    pub fn update_quiet(&mut self, side: Color, mv: Move, bonus: i32) {
        gravity(&mut self.butterfly[side][mv.from()][mv.to()], bonus);
    }

    pub fn update_counter(&mut self, prev_piece: Piece, prev_to: Square, piece: Piece, to: Square, bonus: i32) {
        gravity(&mut self.counter[prev_piece][prev_to][piece][to], bonus);
    }

    pub fn update_followup(&mut self, prev_piece: Piece, prev_to: Square, piece: Piece, to: Square, bonus: i32) {
        gravity(&mut self.followup[prev_piece][prev_to][piece][to], bonus);
    }

    /// Ages every table between games so stale statistics fade instead of
    /// steering the next game.
    pub fn halve(&mut self) {
        for side in self.butterfly.iter_mut() {
            for from in side.iter_mut() {
                for entry in from.iter_mut() {
                    *entry /= 2;
                }
            }
        }

        for table in [&mut self.counter, &mut self.followup] {
            for prev_piece in table.iter_mut() {
                for prev_to in prev_piece.iter_mut() {
                    for piece in prev_to.iter_mut() {
                        for entry in piece.iter_mut() {
                            *entry /= 2;
                        }
                    }
                }
            }
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self {
            butterfly: zeroed_box(),
            counter: zeroed_box(),
            followup: zeroed_box(),
        }
    }
}

/// Counter moves: the quiet refutation most recently seen for each
/// `(piece, to)` of the opponent's previous move. Per-search scratch.
pub struct CounterMoves {
    table: [[Move; Square::NUM]; Piece::NUM],
}

impl CounterMoves {
    pub fn get(&self, prev_piece: Piece, prev_to: Square) -> Move {
        self.table[prev_piece][prev_to]
    }

    pub fn set(&mut self, prev_piece: Piece, prev_to: Square, mv: Move) {
        self.table[prev_piece][prev_to] = mv;
    }
}

impl Default for CounterMoves {
    fn default() -> Self {
        Self { table: [[Move::NULL; Square::NUM]; Piece::NUM] }
    }
}

fn zeroed_box<T>() -> Box<T> {
    unsafe {
        let layout = std::alloc::Layout::new::<T>();
        let ptr = std::alloc::alloc_zeroed(layout);
        if ptr.is_null() {
            std::alloc::handle_alloc_error(layout);
        }
        Box::from_raw(ptr.cast())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveKind;

    #[test]
    fn gravity_stays_bounded() {
        let mut history = History::default();
        let mv = Move::new(Square::G1, Square::F3, MoveKind::Quiet);

        for _ in 0..500 {
            history.update_quiet(Color::White, mv, history_bonus(12));
        }
        let score = history.quiet(Color::White, mv);
        assert!(score > 0 && score <= MAX_HISTORY);

        for _ in 0..1000 {
            history.update_quiet(Color::White, mv, -history_bonus(12));
        }
        let score = history.quiet(Color::White, mv);
        assert!(score < 0 && score >= -MAX_HISTORY);
    }

    #[test]
    fn bonus_is_capped() {
        assert_eq!(history_bonus(2), 64);
        assert_eq!(history_bonus(40), MAX_HISTORY);
    }

    #[test]
    fn halving_decays_entries() {
        let mut history = History::default();
        let mv = Move::new(Square::G1, Square::F3, MoveKind::Quiet);

        history.update_quiet(Color::White, mv, 1000);
        let before = history.quiet(Color::White, mv);

        history.halve();
        assert_eq!(history.quiet(Color::White, mv), before / 2);
    }
}
