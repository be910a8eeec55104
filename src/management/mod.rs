mod history;
mod playlist;
mod tally;

pub use history::{CollectOptions, Collected, FetchState, HistoryCollector};
pub use playlist::{PlaylistBuilder, render, table_rows};
pub use tally::TrackTally;
