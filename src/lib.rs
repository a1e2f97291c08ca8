//! rsiwatch - Binance USDT-M futures RSI / Bollinger alert monitor.

pub mod alerts;
pub mod arguments;
pub mod binance;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod logger;
pub mod monitor;
pub mod series;
pub mod telegram;
