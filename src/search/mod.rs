use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::Board;
use crate::tables::{CounterMoves, History, Killers, PrincipalVariationTable, TranspositionTable};
use crate::timeman::{Limits, TimeManager};
use crate::types::{Move, Piece, MAX_DEPTH, MAX_MOVES, MAX_PLY};

mod alphabeta;
mod deepening;
mod ordering;
mod quiescence;
mod see;

/// Late move reduction lookup, `1 + ln(depth) * ln(move_index) / 2`, built
/// once per engine instance and lent to every search.
pub struct LmrTable {
    table: Box<[[i32; MAX_MOVES]; MAX_DEPTH as usize]>,
}

impl LmrTable {
    pub fn new() -> Self {
        let mut table = Box::new([[0; MAX_MOVES]; MAX_DEPTH as usize]);

        for (depth, row) in table.iter_mut().enumerate() {
            for (index, reduction) in row.iter_mut().enumerate() {
                let d = if depth == 0 { 0.0 } else { (depth as f64).ln() };
                let n = if index == 0 { 0.0 } else { (index as f64).ln() };
                *reduction = (1.0 + d * n * 0.5) as i32;
            }
        }

        Self { table }
    }

    pub fn get(&self, depth: i32, move_index: usize) -> i32 {
        self.table[depth.clamp(0, MAX_DEPTH - 1) as usize][move_index.min(MAX_MOVES - 1)]
    }
}

impl Default for LmrTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-ply bookkeeping the continuation heuristics read back from ancestor
/// plies.
#[derive(Copy, Clone)]
pub struct NodeState {
    /// Static evaluation at this node, for the improving heuristic.
    pub eval: i32,
    /// The move played at this ply and the piece that made it.
    pub mv: Move,
    pub piece: Piece,
    /// Whether the move leading to the child was a null move.
    pub is_null: bool,
    /// Whether the move leading to the child was a capture or promotion.
    pub is_tactical: bool,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            eval: 0,
            mv: Move::NULL,
            piece: Piece::None,
            is_null: false,
            is_tactical: false,
        }
    }
}

/// One search task: owns the per-search scratch tables and borrows the
/// engine-lived state (board, transposition table, history, reductions).
pub struct Searcher<'a> {
    pub(crate) board: &'a mut Board,
    tt: &'a mut TranspositionTable,
    history: &'a mut History,
    lmr: &'a LmrTable,
    time_manager: TimeManager,
    abort: &'a AtomicBool,

    killers: Killers,
    counters: CounterMoves,
    pv: PrincipalVariationTable,
    ns: [NodeState; MAX_PLY + 4],

    ply: usize,
    nodes: u64,
    sel_depth: usize,
    finished_depth: i32,
    score: i32,
    stopped: bool,
    silent: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        board: &'a mut Board,
        limits: Limits,
        tt: &'a mut TranspositionTable,
        history: &'a mut History,
        lmr: &'a LmrTable,
        abort: &'a AtomicBool,
    ) -> Self {
        Self {
            board,
            tt,
            history,
            lmr,
            time_manager: TimeManager::new(limits),
            abort,
            killers: Killers::default(),
            counters: CounterMoves::default(),
            pv: PrincipalVariationTable::default(),
            ns: [NodeState::default(); MAX_PLY + 4],
            ply: 0,
            nodes: 0,
            sel_depth: 0,
            finished_depth: 0,
            score: 0,
            stopped: false,
            silent: false,
        }
    }

    /// Runs the search to completion and returns the best move found.
    /// Unless silenced, emits `info` lines per iteration and a final
    /// `bestmove`, which is `0000` when the root has no legal move.
    pub fn run(&mut self) -> Move {
        self.tt.new_search();
        let best_move = self.iterative_deepening();

        if !self.silent {
            println!("bestmove {best_move}");
        }

        best_move
    }

    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// The score of the last completed iteration, from the side to move's
    /// point of view.
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// The principal variation of the last completed iteration.
    pub fn principal_variation(&self) -> &[Move] {
        self.pv.line()
    }

    /// Suppresses all output; used by `bench` and tests.
    pub fn silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Cooperative stop check, evaluated cheaply on every node and fully
    /// once per 1024 nodes. The first iteration is always allowed to finish
    /// so a best move exists.
    fn should_interrupt(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        if self.finished_depth < 1 {
            return false;
        }

        if self.nodes & 1023 == 0
            && (self.abort.load(Ordering::Relaxed)
                || self.time_manager.is_hard_bound_reached()
                || self.nodes >= self.time_manager.max_nodes())
        {
            self.stopped = true;
        }

        self.stopped
    }
}
