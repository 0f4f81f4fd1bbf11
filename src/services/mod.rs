pub mod import;
pub mod standings;

pub use import::ImportService;
pub use standings::{StandingsQuery, StandingsService};
