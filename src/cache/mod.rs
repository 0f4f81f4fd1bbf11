pub mod structs;

pub use structs::{StandingsCache, StandingsKey};
