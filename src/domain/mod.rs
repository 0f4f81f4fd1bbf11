pub mod models;
mod snapshot;

pub use models::*;
pub use snapshot::{SeasonData, SeasonSnapshot};
