//! The UCI message loop. Engine replies (`info`, `bestmove`, `readyok`) are
//! protocol output and go straight to stdout; diagnostics go through `log`.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Context, Result};

use crate::board::Board;
use crate::search::{LmrTable, Searcher};
use crate::tables::{History, TranspositionTable, DEFAULT_TT_SIZE, MAX_TT_SIZE, MIN_TT_SIZE};
use crate::timeman::Limits;
use crate::tools;
use crate::types::Color;

/// The engine-lived state: the game board plus every table that outlives a
/// single search. Each `go` borrows these into a fresh `Searcher`.
pub struct Engine {
    board: Board,
    tt: TranspositionTable,
    history: History,
    lmr: LmrTable,
    abort: AtomicBool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            tt: TranspositionTable::default(),
            history: History::default(),
            lmr: LmrTable::new(),
            abort: AtomicBool::new(false),
        }
    }

    /// Forgets the previous game: fresh board, empty hash table, and the
    /// history statistics aged out rather than dropped.
    fn new_game(&mut self) {
        self.board = Board::starting_position();
        self.tt.clear();
        self.history.halve();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub fn message_loop() -> Result<()> {
    let mut engine = Engine::new();

    loop {
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).context("reading stdin")? == 0 {
            return Ok(());
        }

        match execute(&mut engine, &line) {
            Ok(true) => (),
            Ok(false) => return Ok(()),
            Err(error) => log::warn!("{error:#}: '{}'", line.trim_end()),
        }
    }
}

/// Executes a single command line, returning `false` on `quit`.
pub fn execute(engine: &mut Engine, line: &str) -> Result<bool> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();

    match tokens.as_slice() {
        ["uci"] => {
            println!("id name ardent {}", env!("CARGO_PKG_VERSION"));
            println!("option name Hash type spin default {DEFAULT_TT_SIZE} min {MIN_TT_SIZE} max {MAX_TT_SIZE}");
            println!("option name Clear Hash type button");
            println!("uciok");
        }
        ["isready"] => println!("readyok"),
        ["ucinewgame"] => engine.new_game(),

        ["position", rest @ ..] => position(engine, rest)?,
        ["go", rest @ ..] => go(engine, rest),
        ["setoption", rest @ ..] => set_option(engine, rest)?,

        // The search runs synchronously, so by the time `stop` is read the
        // search has already returned; the flag only matters for front ends
        // driving the engine through the library interface
        ["stop"] => engine.abort.store(true, Ordering::Relaxed),
        ["quit"] => return Ok(false),

        // Non-UCI conveniences
        ["bench"] => tools::bench(tools::DEFAULT_BENCH_DEPTH),
        ["bench", depth] => tools::bench(depth.parse().context("parsing bench depth")?),
        ["perft", depth] => tools::perft(depth.parse().context("parsing perft depth")?, &mut engine.board),

        [] => (),
        _ => bail!("unknown command"),
    }

    Ok(true)
}

fn position(engine: &mut Engine, mut tokens: &[&str]) -> Result<()> {
    loop {
        match tokens {
            ["startpos", rest @ ..] => {
                engine.board = Board::starting_position();
                tokens = rest;
            }
            ["fen", rest @ ..] => {
                let fen = rest.get(..6).context("truncated fen")?.join(" ");
                engine.board = Board::new(&fen).map_err(|e| anyhow::anyhow!("invalid fen: {e}"))?;
                tokens = &rest[6..];
            }
            ["moves", rest @ ..] => {
                for uci_move in rest {
                    make_uci_move(&mut engine.board, uci_move)?;
                }
                return Ok(());
            }
            _ => return Ok(()),
        }
    }
}

fn make_uci_move(board: &mut Board, uci_move: &str) -> Result<()> {
    let moves = board.generate_all_moves();
    let mv = moves
        .iter()
        .find(|mv| mv.to_string() == uci_move)
        .with_context(|| format!("unknown move '{uci_move}'"))?;

    if !board.make_move(*mv) {
        bail!("illegal move '{uci_move}'");
    }
    Ok(())
}

fn go(engine: &mut Engine, tokens: &[&str]) {
    let limits = parse_limits(engine.board.side_to_move(), tokens);
    log::debug!("starting search with {limits:?}");

    engine.abort.store(false, Ordering::Relaxed);
    Searcher::new(
        &mut engine.board,
        limits,
        &mut engine.tt,
        &mut engine.history,
        &engine.lmr,
        &engine.abort,
    )
    .run();
}

fn set_option(engine: &mut Engine, tokens: &[&str]) -> Result<()> {
    match tokens {
        ["name", "Hash", "value", megabytes] => {
            let megabytes: usize = megabytes.parse().context("parsing hash size")?;
            engine.tt = TranspositionTable::new(megabytes.clamp(MIN_TT_SIZE, MAX_TT_SIZE));
        }
        ["name", "Clear", "Hash"] => engine.tt.clear(),
        _ => bail!("unknown option"),
    }
    Ok(())
}

fn parse_limits(color: Color, tokens: &[&str]) -> Limits {
    let mut time = 0;
    let mut increment = 0;
    let mut moves_to_go = None;

    for chunk in tokens.chunks(2) {
        match *chunk {
            ["infinite", ..] => return Limits::Infinite,
            [name, value] => {
                let Ok(value) = value.parse::<u64>() else {
                    continue;
                };

                match name {
                    "depth" => return Limits::FixedDepth(value as i32),
                    "nodes" => return Limits::FixedNodes(value),
                    "movetime" => return Limits::FixedTime(value),

                    "wtime" if color == Color::White => time = value,
                    "btime" if color == Color::Black => time = value,
                    "winc" if color == Color::White => increment = value,
                    "binc" if color == Color::Black => increment = value,
                    "movestogo" => moves_to_go = Some(value),

                    _ => continue,
                }
            }
            _ => continue,
        }
    }

    if time == 0 && increment == 0 {
        Limits::Infinite
    } else {
        Limits::Clock { time, increment, moves_to_go }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_limits {
        ($($name:ident: $input:expr, $expected:expr,)*) => {$(
            #[test]
            fn $name() {
                let tokens = $input.split_whitespace().collect::<Vec<_>>();
                assert_eq!(parse_limits(Color::White, &tokens), $expected);
            }
        )*};
    }

    assert_limits!(
        tc_infinite: "infinite", Limits::Infinite,
        tc_depth: "depth 10", Limits::FixedDepth(10),
        tc_nodes: "nodes 40000", Limits::FixedNodes(40000),
        tc_movetime: "movetime 5000", Limits::FixedTime(5000),
        tc_sudden_death: "wtime 60000 btime 55000 winc 1000 binc 1000",
            Limits::Clock { time: 60000, increment: 1000, moves_to_go: None },
        tc_repeating: "wtime 300000 winc 0 movestogo 40",
            Limits::Clock { time: 300000, increment: 0, moves_to_go: Some(40) },
        tc_opponent_clock_ignored: "btime 1000 binc 100", Limits::Infinite,
        tc_garbage: "bananas 12", Limits::Infinite,
    );

    #[test]
    fn position_startpos_with_moves() {
        let mut engine = Engine::new();
        execute(&mut engine, "position startpos moves e2e4 e7e5 g1f3").unwrap();
        assert_eq!(engine.board.side_to_move(), Color::Black);
    }

    #[test]
    fn position_rejects_illegal_moves() {
        let mut engine = Engine::new();
        assert!(execute(&mut engine, "position startpos moves e2e5").is_err());
    }
}
