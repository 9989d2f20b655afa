pub mod history;

pub use history::{HistoryQuoteProvider, WORLD_TRADING_DATA_URL};
