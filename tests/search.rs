//! Full-search integration tests: mates, determinism, PV soundness, and the
//! degenerate no-legal-move case.

use std::sync::atomic::AtomicBool;

use ardent::board::Board;
use ardent::search::{LmrTable, Searcher};
use ardent::tables::{History, TranspositionTable};
use ardent::timeman::Limits;
use ardent::types::{Move, Score};

struct SearchResult {
    best_move: Move,
    score: i32,
    nodes: u64,
    pv: Vec<Move>,
}

fn search(fen: &str, depth: i32) -> SearchResult {
    let mut board = Board::new(fen).unwrap();
    let mut tt = TranspositionTable::default();
    let mut history = History::default();
    let lmr = LmrTable::new();
    let abort = AtomicBool::new(false);

    let mut searcher = Searcher::new(&mut board, Limits::FixedDepth(depth), &mut tt, &mut history, &lmr, &abort);
    searcher.silent(true);

    let best_move = searcher.run();
    SearchResult {
        best_move,
        score: searcher.score(),
        nodes: searcher.nodes(),
        pv: searcher.principal_variation().to_vec(),
    }
}

#[test]
fn finds_mate_in_one() {
    // Scholar's mate: Qf3xf7 supported by the c4 bishop
    let result = search("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 0 1", 4);

    assert_eq!(result.best_move.to_string(), "f3f7");
    assert_eq!(result.score, Score::MATE - 1);
}

#[test]
fn finds_rook_ladder_mate_in_two() {
    let result = search("8/3k4/R7/1R6/8/8/8/6K1 w - - 0 1", 5);

    assert_eq!(result.best_move.to_string(), "b5b7");
    assert_eq!(result.score, Score::MATE - 3);
}

#[test]
fn detects_being_mated() {
    // Black's only move walks into Qa8 mate
    let result = search("7k/8/6K1/8/8/8/8/Q7 b - - 0 1", 4);

    assert_eq!(result.best_move.to_string(), "h8g8");
    assert_eq!(result.score, -Score::MATE + 2);
}

#[test]
fn reports_null_move_when_stalemated() {
    // Black to move has no legal moves and is not in check
    let result = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);

    assert!(result.best_move.is_empty());
}

#[test]
fn reports_null_move_when_checkmated() {
    let result = search("6kQ/6P1/6K1/8/8/8/8/8 b - - 0 1", 3);

    assert!(result.best_move.is_empty());
}

#[test]
fn search_is_deterministic() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    let first = search(fen, 6);
    let second = search(fen, 6);

    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.nodes, second.nodes);
}

#[test]
fn principal_variation_is_a_legal_line() {
    let result = search("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10", 6);

    assert!(!result.pv.is_empty());
    assert_eq!(result.pv[0], result.best_move);

    let mut board = Board::new("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10").unwrap();
    for &mv in &result.pv {
        let generated = board.generate_all_moves();
        assert!(generated.iter().any(|&m| m == mv), "{mv} was not generated");
        assert!(board.make_move(mv), "{mv} was not legal");
    }
}

#[test]
fn returns_a_legal_move_with_castling_rights_in_hand() {
    let fen = "8/8/8/8/8/8/6k1/4K2R w K - 0 1";
    let result = search(fen, 5);

    let mut board = Board::new(fen).unwrap();
    assert!(board.generate_all_moves().iter().any(|&m| m == result.best_move));
    assert!(board.make_move(result.best_move));
}

#[test]
fn rook_endgame_search_completes() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    let result = search(fen, 10);

    let mut board = Board::new(fen).unwrap();
    assert!(board.generate_all_moves().iter().any(|&m| m == result.best_move));
    assert!(board.make_move(result.best_move));
}

#[test]
fn node_limit_stops_the_search() {
    let mut board = Board::new("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let mut tt = TranspositionTable::default();
    let mut history = History::default();
    let lmr = LmrTable::new();
    let abort = AtomicBool::new(false);

    let mut searcher =
        Searcher::new(&mut board, Limits::FixedNodes(20_000), &mut tt, &mut history, &lmr, &abort);
    searcher.silent(true);
    let best_move = searcher.run();

    // The poll runs every 1024 nodes, so the overshoot is bounded
    assert!(searcher.nodes() < 40_000, "searched {} nodes", searcher.nodes());
    assert!(!best_move.is_empty());
}
