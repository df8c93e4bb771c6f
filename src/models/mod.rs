mod bar;
mod snapshot;
mod ticker;
pub mod indicators;

pub use bar::{DailyBar, PriceData};
pub use snapshot::{ArchiveData, DailySignals, MomentumSnapshot, StockDocument};
pub use ticker::{MarketType, Ticker};
