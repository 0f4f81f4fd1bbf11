pub mod connection;
pub mod pairings;
pub mod players;
pub mod prizes;
pub mod rounds;
pub mod season_data;
pub mod seasons;
pub mod setup;
pub mod teams;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use season_data::{highlight_prizes, import_season, load_season};
