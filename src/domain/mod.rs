//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated query window (`DateRange`)
//! - one normalized day of temperatures (`DailyRecord`)
//! - a day with its derived degree-days (`EnrichedRecord`)

pub mod types;

pub use types::*;
