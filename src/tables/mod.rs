pub mod history;
pub mod killers;
pub mod pv;
pub mod transposition;

pub use history::*;
pub use killers::*;
pub use pv::*;
pub use transposition::*;
