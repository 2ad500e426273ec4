pub mod storage;
pub mod watchlist;

pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use watchlist::{WatchlistStore, WATCHLIST_KEY};
