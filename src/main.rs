use std::sync::Arc;

use tokio::sync::Notify;

use rsiwatch::arguments::{patterns, print_help};
use rsiwatch::binance::BinanceClient;
use rsiwatch::config::Config;
use rsiwatch::logger::{self, LogTag};
use rsiwatch::monitor::Monitor;
use rsiwatch::telegram::TelegramNotifier;

/// Entry point: help mode exits before anything else, fatal
/// misconfiguration exits non-zero before the loop, everything after that
/// runs until ctrl-c.
#[tokio::main]
async fn main() {
    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::System, &format!("fatal: {}", e));
            std::process::exit(1);
        }
    };

    logger::info(
        LogTag::System,
        &format!(
            "starting rsiwatch: symbol={} strategy={:?} timeframes=[{}]",
            config.symbol,
            config.strategy,
            config.timeframes.join(",")
        ),
    );

    let market = match BinanceClient::new() {
        Ok(client) => client,
        Err(e) => {
            logger::error(LogTag::System, &format!("fatal: {}", e));
            std::process::exit(1);
        }
    };

    let notifier = match TelegramNotifier::new(&config.telegram_token, &config.chat_id) {
        Ok(notifier) => notifier,
        Err(e) => {
            logger::error(LogTag::System, &format!("fatal: {}", e));
            std::process::exit(1);
        }
    };

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                logger::info(LogTag::System, "ctrl-c received, shutting down");
                shutdown.notify_one();
            }
        });
    }

    Monitor::new(config, market, notifier).run(shutdown).await;
    logger::info(LogTag::System, "rsiwatch stopped");
}
