//! Non-UCI commands: `bench` for regression-checking the search and `perft`
//! for validating the move generator.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use crate::board::Board;
use crate::search::{LmrTable, Searcher};
use crate::tables::{History, TranspositionTable};
use crate::timeman::Limits;

pub const DEFAULT_BENCH_DEPTH: i32 = 10;

/// A spread of openings, middlegames and endgames; the total node count is a
/// functional fingerprint of the search.
const BENCH_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "r1b1kbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 0 1",
    "6k1/p4p1p/1p2p3/5p1q/5P2/P3P3/1Q3PBP/R2r2K1 w - - 1 28",
    "8/1p6/p1pR4/4P1k1/6bp/8/4r1P1/4R1K1 w - - 4 67",
    "5r1k/1R4bp/8/3pp3/1P6/3rB2P/5PP1/4R1K1 w - - 0 33",
    "2r5/pp2pk2/2n1bppp/8/4PP2/1PN2BP1/PK1R3P/8 b - - 1 24",
    "8/4n3/1p2kn2/4pp1p/1Pr1P2P/4PKN1/R4N2/8 w - - 4 56",
    "1b1r4/p5k1/2QqB2p/4N1p1/3r4/P7/5N1P/1R4K1 w - - 0 34",
    "8/1p1B1p2/p2b1kpp/3P4/8/5P1P/PP3PK1/8 b - - 2 33",
    "4k3/8/2P1Kp1p/p2B4/P4PP1/b7/8/8 w - - 29 66",
    "1k6/ppp2p2/4p1bp/2P1P1p1/1n1B2P1/1B3P2/PP5P/6K1 b - - 0 30",
];

/// Runs a fixed-depth search over the benchmark suite and prints the total
/// node count and speed in the conventional single-line format.
pub fn bench(depth: i32) {
    let started = Instant::now();
    let mut nodes = 0;

    let lmr = LmrTable::new();

    for fen in BENCH_POSITIONS {
        let mut board = Board::new(fen).expect("bench position is valid");
        let mut tt = TranspositionTable::default();
        let mut history = History::default();
        let abort = AtomicBool::new(false);

        let mut searcher = Searcher::new(&mut board, Limits::FixedDepth(depth), &mut tt, &mut history, &lmr, &abort);
        searcher.silent(true);
        searcher.run();

        nodes += searcher.nodes();
    }

    let nps = nodes as f64 / started.elapsed().as_secs_f64();
    println!("Bench: {nodes} nodes {nps:.0} nps");
}

/// Prints the per-move node breakdown for the position at the given depth.
pub fn perft(depth: usize, board: &mut Board) {
    let started = Instant::now();
    let mut total = 0;

    for &mv in board.generate_all_moves().iter() {
        if !board.make_move(mv) {
            continue;
        }

        let nodes = if depth > 1 { count_nodes(board, depth - 1) } else { 1 };
        board.undo_move();

        total += nodes;
        println!("{mv}: {nodes}");
    }

    let seconds = started.elapsed().as_secs_f64();
    println!();
    println!("Nodes: {total}");
    println!("Elapsed: {seconds:.3}s ({:.0} knps)", total as f64 / seconds / 1000.0);
}

fn count_nodes(board: &mut Board, depth: usize) -> u64 {
    let mut nodes = 0;

    for &mv in board.generate_all_moves().iter() {
        if !board.make_move(mv) {
            continue;
        }

        nodes += if depth > 1 { count_nodes(board, depth - 1) } else { 1 };
        board.undo_move();
    }

    nodes
}
