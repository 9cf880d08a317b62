pub mod storage;
pub mod types;

pub use storage::{get_season_path, load_season, save_season};
pub use types::{Predictable, SeasonState};
