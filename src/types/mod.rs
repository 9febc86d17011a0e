mod bitboard;
mod color;
mod movelist;
mod moves;
mod piece;
mod score;
mod square;

pub use bitboard::*;
pub use color::*;
pub use movelist::*;
pub use moves::*;
pub use piece::*;
pub use score::*;
pub use square::*;

/// The maximum number of plies the search can reach, including extensions
/// and the quiescence tail.
pub const MAX_PLY: usize = 128;

/// The maximum nominal depth of an iterative deepening iteration.
pub const MAX_DEPTH: i32 = 64;

/// According to [Chess Programming Wiki](https://www.chessprogramming.org/Encoding_Moves#MoveIndex),
/// the maximum number of moves in a reachable position appears to be 218.
pub const MAX_MOVES: usize = 256;
