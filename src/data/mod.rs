//! Data acquisition: HTTP fetch, response parsing, caching and date columns.

pub mod cache;
pub mod dates;
pub mod parse;
pub mod power;

pub use cache::{CacheKey, FetchCache};
pub use dates::{display_date, reconstruct_dates};
pub use parse::{ClimateTable, parse_power_csv};
pub use power::{ClimateSource, PowerClient, load_table};
