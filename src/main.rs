use anyhow::Result;
use clap::{Parser, Subcommand};

use ardent::{board::Board, tools, uci};

#[derive(Parser)]
#[command(version, about = "UCI chess engine")]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a fixed-depth search over the built-in benchmark suite
    Bench {
        #[arg(default_value_t = tools::DEFAULT_BENCH_DEPTH)]
        depth: i32,
    },
    /// Count move generator leaf nodes for a position
    Perft {
        depth: usize,
        #[arg(default_value = ardent::board::STARTPOS_FEN)]
        fen: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, filter));

    match args.command {
        Some(Command::Bench { depth }) => tools::bench(depth),
        Some(Command::Perft { depth, fen }) => {
            let mut board = Board::new(&fen).map_err(|e| anyhow::anyhow!("invalid fen: {e}"))?;
            tools::perft(depth, &mut board);
        }
        None => uci::message_loop()?,
    }

    Ok(())
}
