//! Provider adapter implementations.

mod coingecko;
mod iexcloud;

pub use coingecko::CoinGeckoAdapter;
pub use iexcloud::IexCloudAdapter;
