//! Attack lookups backed by tables the build script generates into `OUT_DIR`:
//! leaper maps, fixed-shift magic tables for the sliders, and the
//! between-squares map.

use crate::types::{Bitboard, Color, Square};

include!(concat!(env!("OUT_DIR"), "/lookup.rs"));

pub fn pawn_attacks(square: Square, color: Color) -> Bitboard {
    unsafe {
        match color {
            Color::White => Bitboard(*WHITE_PAWN_MAP.get_unchecked(square as usize)),
            Color::Black => Bitboard(*BLACK_PAWN_MAP.get_unchecked(square as usize)),
        }
    }
}

pub fn knight_attacks(square: Square) -> Bitboard {
    unsafe { Bitboard(*KNIGHT_MAP.get_unchecked(square as usize)) }
}

pub fn king_attacks(square: Square) -> Bitboard {
    unsafe { Bitboard(*KING_MAP.get_unchecked(square as usize)) }
}

pub fn bishop_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    unsafe {
        let entry = BISHOP_MAGICS.get_unchecked(square as usize);
        Bitboard(*BISHOP_MAP.get_unchecked(magic_index(occupied, entry)))
    }
}

pub fn rook_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    unsafe {
        let entry = ROOK_MAGICS.get_unchecked(square as usize);
        Bitboard(*ROOK_MAP.get_unchecked(magic_index(occupied, entry)))
    }
}

pub fn queen_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(square, occupied) | rook_attacks(square, occupied)
}

/// The squares strictly between two aligned squares; empty otherwise.
pub fn between(a: Square, b: Square) -> Bitboard {
    unsafe { Bitboard(*BETWEEN_MAP.get_unchecked(a as usize * 64 + b as usize)) }
}

const fn magic_index(occupied: Bitboard, entry: &MagicEntry) -> usize {
    let hash = (occupied.0 & entry.mask).wrapping_mul(entry.magic);
    (hash >> entry.shift) as usize + entry.offset as usize
}
