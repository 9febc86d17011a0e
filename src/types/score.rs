use super::MAX_PLY;

pub struct Score;

#[rustfmt::skip]
impl Score {
    pub const ZERO: i32 = 0;
    pub const DRAW: i32 = 0;

    pub const INFINITY: i32 = 32001;
    pub const MATE:     i32 = 32000;

    /// Scores at or beyond this magnitude encode a forced mate and carry the
    /// distance to it in their exact value.
    pub const MATE_BOUND: i32 = 32000 - MAX_PLY as i32;
}

/// The score of being mated in `ply` half-moves from the root.
pub const fn mated_in(ply: usize) -> i32 {
    -Score::MATE + ply as i32
}

/// The score of delivering mate in `ply` half-moves from the root.
pub const fn mate_in(ply: usize) -> i32 {
    Score::MATE - ply as i32
}
