//! Input/output helpers.
//!
//! - per-day results export (CSV) (`export`)
//! - result JSON read/write (`series`)

pub mod export;
pub mod series;

pub use export::*;
pub use series::*;
