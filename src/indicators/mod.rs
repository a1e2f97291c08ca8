//! Batch indicator engines over a `PriceSeries`.
//!
//! Stateless by design: each call recomputes from the full series. At a
//! polling cadence of minutes this is cheap; a streaming context would want
//! incremental accumulators instead.

pub mod bollinger;
pub mod rsi;

pub use bollinger::{bollinger, Bands};
pub use rsi::rsi;
