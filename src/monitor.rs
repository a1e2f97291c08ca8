//! The monitor loop: fetch → compute → evaluate → notify → sleep.
//!
//! One cycle is stateless with respect to the previous one; indicator
//! readings are computed fresh and discarded. Any error raised inside a
//! cycle is caught at the cycle boundary, logged, forwarded best-effort as
//! a notification, and answered with a fixed 30-second backoff — a failing
//! cycle never terminates the process.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::Notify;

use crate::alerts::{self, AlertRule, Decision};
use crate::config::{Config, Strategy};
use crate::errors::RsiWatchError;
use crate::indicators::{bollinger, rsi};
use crate::logger::{self, LogTag};
use crate::series::PriceSeries;

/// Candles requested per fetch; comfortably above any configurable lookback.
pub const KLINE_LIMIT: u32 = 100;

/// Fixed pause after a failed cycle before retrying.
pub const BACKOFF_SLEEP: Duration = Duration::from_secs(30);

/// Market-data collaborator: klines for a symbol/timeframe and the current
/// mark price.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, RsiWatchError>;

    async fn mark_price(&self, symbol: &str) -> Result<f64, RsiWatchError>;
}

/// Notification collaborator. Delivery is best-effort; the loop logs and
/// swallows failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), RsiWatchError>;
}

pub struct Monitor<M: MarketData, N: Notifier> {
    config: Config,
    market: M,
    notifier: N,
}

impl<M: MarketData, N: Notifier> Monitor<M, N> {
    pub fn new(config: Config, market: M, notifier: N) -> Self {
        Self {
            config,
            market,
            notifier,
        }
    }

    /// Run until `shutdown` is notified. Successful cycles sleep the
    /// configured interval, failed cycles the fixed backoff.
    pub async fn run(&self, shutdown: Arc<Notify>) {
        logger::info(
            LogTag::Monitor,
            &format!(
                "watching {} on [{}], RSI period {}, thresholds {}/{}, cycle every {}s",
                self.config.symbol,
                self.config.timeframes.join(","),
                self.config.rsi_period,
                self.config.down_threshold,
                self.config.up_threshold,
                self.config.sleep_secs
            ),
        );

        loop {
            if check_shutdown_or_delay(&shutdown, Duration::from_millis(100)).await {
                logger::info(LogTag::Monitor, "monitor shutting down...");
                break;
            }

            let delay = match self.cycle().await {
                Ok(decision) => {
                    if decision != Decision::None {
                        logger::info(LogTag::Alert, &format!("cycle decision: {:?}", decision));
                    } else {
                        logger::debug(LogTag::Monitor, "cycle complete, no alert");
                    }
                    Duration::from_secs(self.config.sleep_secs)
                }
                Err(e) => {
                    logger::error(LogTag::Monitor, &format!("cycle failed: {}", e));
                    self.notify_best_effort(&format!("rsiwatch cycle failed: {}", e))
                        .await;
                    logger::info(
                        LogTag::Monitor,
                        &format!("backing off {}s before retry", BACKOFF_SLEEP.as_secs()),
                    );
                    BACKOFF_SLEEP
                }
            };

            if check_shutdown_or_delay(&shutdown, delay).await {
                logger::info(LogTag::Monitor, "monitor shutting down...");
                break;
            }
        }
    }

    /// One fetch → compute → evaluate → notify pass. Errors propagate to
    /// `run`, which owns the backoff policy.
    pub async fn cycle(&self) -> Result<Decision, RsiWatchError> {
        match self.config.strategy {
            Strategy::MultiTimeframeRsi => self.cycle_uniform().await,
            Strategy::RsiBollinger => self.cycle_cross().await,
        }
    }

    /// Uniform RSI comparison across every configured timeframe.
    async fn cycle_uniform(&self) -> Result<Decision, RsiWatchError> {
        let symbol = &self.config.symbol;

        // All timeframe fetches run concurrently and join before any
        // evaluation starts.
        let fetches = self
            .config
            .timeframes
            .iter()
            .map(|tf| self.market.klines(symbol, tf, KLINE_LIMIT));
        let series_list = try_join_all(fetches).await?;
        let mark_price = self.market.mark_price(symbol).await?;

        let mut labelled = Vec::with_capacity(series_list.len());
        for (tf, series) in self.config.timeframes.iter().zip(series_list.iter()) {
            let value = rsi(series, self.config.rsi_period)?;
            logger::info(
                LogTag::Indicator,
                &format!(
                    "{} - {:.2} - RSI: {:.10} - {}",
                    symbol,
                    series.last().unwrap_or(f64::NAN),
                    value,
                    tf
                ),
            );
            labelled.push((format!("RSI {}", tf), value));
        }

        let readings: Vec<f64> = labelled.iter().map(|(_, v)| *v).collect();
        let decision = alerts::evaluate_uniform(
            &readings,
            AlertRule::new(self.config.long_op, self.config.down_threshold),
            AlertRule::new(self.config.short_op, self.config.up_threshold),
        );

        self.dispatch(decision, mark_price, &labelled).await;
        Ok(decision)
    }

    /// RSI gated by a Bollinger breakout on the first configured timeframe.
    async fn cycle_cross(&self) -> Result<Decision, RsiWatchError> {
        let symbol = &self.config.symbol;
        let tf = &self.config.timeframes[0];

        let (series, mark_price) = tokio::try_join!(
            self.market.klines(symbol, tf, KLINE_LIMIT),
            self.market.mark_price(symbol)
        )?;

        let rsi_value = rsi(&series, self.config.rsi_period)?;
        let bands = bollinger(&series, self.config.bb_period, self.config.bb_std_factor)?;
        logger::info(
            LogTag::Indicator,
            &format!(
                "{} - {:.2} - RSI: {:.10} - BB {:.2}/{:.2}/{:.2} - {}",
                symbol,
                series.last().unwrap_or(f64::NAN),
                rsi_value,
                bands.upper,
                bands.middle,
                bands.lower,
                tf
            ),
        );

        let decision = alerts::evaluate_cross(
            rsi_value,
            &bands,
            mark_price,
            self.config.down_threshold,
            self.config.up_threshold,
        );

        let labelled = vec![
            (format!("RSI {}", tf), rsi_value),
            ("BB upper".to_string(), bands.upper),
            ("BB middle".to_string(), bands.middle),
            ("BB lower".to_string(), bands.lower),
        ];
        self.dispatch(decision, mark_price, &labelled).await;
        Ok(decision)
    }

    async fn dispatch(&self, decision: Decision, mark_price: f64, readings: &[(String, f64)]) {
        if decision == Decision::None {
            return;
        }
        let message = alerts::format_alert(&self.config.symbol, mark_price, readings, decision);
        self.notify_best_effort(&message).await;
    }

    async fn notify_best_effort(&self, message: &str) {
        match self.notifier.send(message).await {
            Ok(()) => logger::debug(LogTag::Telegram, "notification delivered"),
            Err(e) => logger::error(
                LogTag::Telegram,
                &format!("notification delivery failed: {}", e),
            ),
        }
    }
}

/// Wait for `delay`, returning early with `true` if shutdown was requested.
pub async fn check_shutdown_or_delay(shutdown: &Notify, delay: Duration) -> bool {
    tokio::select! {
        _ = shutdown.notified() => true,
        _ = tokio::time::sleep(delay) => false,
    }
}
