use std::{
    env,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

mod magics;
mod rays;

use magics::MagicTables;
use rays::{BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

fn main() {
    let dir = env::var("OUT_DIR").unwrap();
    let path = Path::new(&dir).join("lookup.rs");
    let out = File::create(path).unwrap();

    write_tables(BufWriter::new(out)).unwrap();

    println!("cargo:rerun-if-changed=build/main.rs");
    println!("cargo:rerun-if-changed=build/magics.rs");
    println!("cargo:rerun-if-changed=build/rays.rs");
}

fn write_tables(mut buf: BufWriter<File>) -> std::io::Result<()> {
    macro_rules! write_map {
        ($name:tt, $type:tt, $items:expr) => {
            writeln!(buf, "static {}: [{}; {}] = {:?};", $name, $type, $items.len(), $items)?;
        };
    }

    write_map!("KING_MAP", "u64", (0u8..64).map(rays::king_attacks).collect::<Vec<_>>());
    write_map!("KNIGHT_MAP", "u64", (0u8..64).map(rays::knight_attacks).collect::<Vec<_>>());

    write_map!("WHITE_PAWN_MAP", "u64", (0u8..64).map(rays::white_pawn_attacks).collect::<Vec<_>>());
    write_map!("BLACK_PAWN_MAP", "u64", (0u8..64).map(rays::black_pawn_attacks).collect::<Vec<_>>());

    let rooks = magics::find_magics(&ROOK_DIRECTIONS);
    let bishops = magics::find_magics(&BISHOP_DIRECTIONS);

    write_map!("ROOK_MAP", "u64", rooks.attacks);
    write_map!("BISHOP_MAP", "u64", bishops.attacks);

    write_map!("ROOK_MAGICS", "MagicEntry", rooks.entries);
    write_map!("BISHOP_MAGICS", "MagicEntry", bishops.entries);

    write_between(&mut buf, &rooks, &bishops)?;

    writeln!(buf, "struct MagicEntry {{ pub mask: u64, pub magic: u64, pub shift: u32, pub offset: u32 }}")
}

/// The squares strictly between two aligned squares, used for castling paths
/// and pin-free legality checks. Zero for unaligned pairs.
fn write_between(buf: &mut BufWriter<File>, rooks: &MagicTables, bishops: &MagicTables) -> std::io::Result<()> {
    let lookup = |tables: &MagicTables, square: usize, occupied: u64| {
        let entry = &tables.entries[square];
        let index = (occupied & entry.mask).wrapping_mul(entry.magic) >> entry.shift;
        tables.attacks[entry.offset as usize + index as usize]
    };

    let mut between = vec![0u64; 64 * 64];

    for a in 0..64usize {
        for b in 0..64usize {
            if lookup(rooks, a, 0) & (1 << b) != 0 {
                between[a * 64 + b] = lookup(rooks, a, 1 << b) & lookup(rooks, b, 1 << a);
            }
            if lookup(bishops, a, 0) & (1 << b) != 0 {
                between[a * 64 + b] = lookup(bishops, a, 1 << b) & lookup(bishops, b, 1 << a);
            }
        }
    }

    writeln!(buf, "static BETWEEN_MAP: [u64; {}] = {:?};", between.len(), between)
}
