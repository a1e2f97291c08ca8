//! Startup configuration: Telegram credentials from the environment
//! (`config.env` via dotenv, then the process env), everything else from
//! command-line flags. Built once, validated fully, then passed into the
//! monitor — core computation never reads ambient state.

use crate::alerts::Comparator;
use crate::arguments::{self, arg_value_in};
use crate::errors::RsiWatchError;

/// Kline interval vocabulary accepted by the exchange.
pub const VALID_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d",
];

pub const DEFAULT_SYMBOL: &str = "BTC";
pub const DEFAULT_QUOTE: &str = "USDT";
pub const DEFAULT_TIMEFRAMES: &str = "15m,1h,4h";
pub const DEFAULT_RSI_PERIOD: usize = 6;
pub const DEFAULT_DOWN_THRESHOLD: f64 = 40.0;
pub const DEFAULT_UP_THRESHOLD: f64 = 60.0;
pub const DEFAULT_SLEEP_SECS: u64 = 300;
pub const DEFAULT_BB_PERIOD: usize = 20;
pub const DEFAULT_BB_STD_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform RSI comparison across every configured timeframe.
    MultiTimeframeRsi,
    /// RSI plus Bollinger breakout on the first configured timeframe.
    RsiBollinger,
}

impl Strategy {
    pub fn parse(name: &str) -> Result<Self, RsiWatchError> {
        match name {
            "rsi" => Ok(Strategy::MultiTimeframeRsi),
            "rsi-bb" => Ok(Strategy::RsiBollinger),
            other => Err(RsiWatchError::configuration(format!(
                "unknown strategy '{}', expected 'rsi' or 'rsi-bb'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub timeframes: Vec<String>,
    pub rsi_period: usize,
    pub down_threshold: f64,
    pub up_threshold: f64,
    pub sleep_secs: u64,
    pub bb_period: usize,
    pub bb_std_factor: f64,
    pub strategy: Strategy,
    pub long_op: Comparator,
    pub short_op: Comparator,
    pub telegram_token: String,
    pub chat_id: String,
}

impl Config {
    /// Load from the process environment and the global argument store.
    /// Any failure here is fatal; the monitor loop never starts.
    pub fn load() -> Result<Self, RsiWatchError> {
        // Same credentials file the bot has always used; absence is fine as
        // long as the variables reach us through the process env.
        dotenv::from_filename("config.env").ok();

        let telegram_token = require_env("TELEGRAM_TOKEN")?;
        let chat_id = require_env("CHAT_ID")?;

        Self::from_args(&arguments::get_cmd_args(), telegram_token, chat_id)
    }

    /// Pure construction from an explicit argument slice plus credentials.
    pub fn from_args(
        args: &[String],
        telegram_token: String,
        chat_id: String,
    ) -> Result<Self, RsiWatchError> {
        let quote = arg_value_in(args, "--quote")
            .unwrap_or_else(|| DEFAULT_QUOTE.to_string())
            .to_uppercase();
        let symbol = normalize_symbol(
            &arg_value_in(args, "--symbol").unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            &quote,
        );

        let timeframes: Vec<String> = arg_value_in(args, "--timeframes")
            .unwrap_or_else(|| DEFAULT_TIMEFRAMES.to_string())
            .split(',')
            .map(|tf| tf.trim().to_string())
            .filter(|tf| !tf.is_empty())
            .collect();

        let config = Config {
            symbol,
            timeframes,
            rsi_period: parsed(args, "--period", DEFAULT_RSI_PERIOD)?,
            down_threshold: parsed(args, "--down", DEFAULT_DOWN_THRESHOLD)?,
            up_threshold: parsed(args, "--up", DEFAULT_UP_THRESHOLD)?,
            sleep_secs: parsed(args, "--sleep", DEFAULT_SLEEP_SECS)?,
            bb_period: parsed(args, "--bb-period", DEFAULT_BB_PERIOD)?,
            bb_std_factor: parsed(args, "--bb-std", DEFAULT_BB_STD_FACTOR)?,
            strategy: match arg_value_in(args, "--strategy") {
                Some(name) => Strategy::parse(&name)?,
                None => Strategy::MultiTimeframeRsi,
            },
            long_op: match arg_value_in(args, "--long-op") {
                Some(symbol) => Comparator::parse(&symbol)?,
                None => Comparator::Lt,
            },
            short_op: match arg_value_in(args, "--short-op") {
                Some(symbol) => Comparator::parse(&symbol)?,
                None => Comparator::Gt,
            },
            telegram_token,
            chat_id,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RsiWatchError> {
        if self.timeframes.is_empty() {
            return Err(RsiWatchError::configuration(
                "at least one timeframe is required",
            ));
        }
        for tf in &self.timeframes {
            if !VALID_INTERVALS.contains(&tf.as_str()) {
                return Err(RsiWatchError::configuration(format!(
                    "unknown timeframe '{}', expected one of {}",
                    tf,
                    VALID_INTERVALS.join(",")
                )));
            }
        }
        if self.rsi_period < 1 {
            return Err(RsiWatchError::configuration("RSI period must be >= 1"));
        }
        if self.bb_period < 1 {
            return Err(RsiWatchError::configuration(
                "Bollinger period must be >= 1",
            ));
        }
        if !self.bb_std_factor.is_finite() || self.bb_std_factor < 0.0 {
            return Err(RsiWatchError::configuration(
                "Bollinger std factor must be finite and >= 0",
            ));
        }
        if self.sleep_secs < 1 {
            return Err(RsiWatchError::configuration(
                "sleep duration must be >= 1 second",
            ));
        }
        // With down >= up the LONG and SHORT rules stop being mutually
        // exclusive.
        if self.down_threshold >= self.up_threshold {
            return Err(RsiWatchError::configuration(format!(
                "down threshold ({}) must be below up threshold ({})",
                self.down_threshold, self.up_threshold
            )));
        }
        Ok(())
    }
}

/// Uppercase and suffix with the quote asset unless already suffixed, so
/// `dot` becomes `DOTUSDT` and `BTCUSDT` stays untouched.
pub fn normalize_symbol(symbol: &str, quote: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    if upper.ends_with(quote) {
        upper
    } else {
        format!("{}{}", upper, quote)
    }
}

fn require_env(name: &str) -> Result<String, RsiWatchError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RsiWatchError::configuration(format!(
            "missing required environment variable {}",
            name
        ))),
    }
}

fn parsed<T: std::str::FromStr>(
    args: &[String],
    flag: &str,
    default: T,
) -> Result<T, RsiWatchError> {
    match arg_value_in(args, flag) {
        Some(raw) => raw.parse().map_err(|_| {
            RsiWatchError::configuration(format!("invalid value '{}' for {}", raw, flag))
        }),
        None => Ok(default),
    }
}
