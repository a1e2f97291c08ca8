//! Binance USDT-M futures market-data client.
//!
//! Two read-only endpoints: `/fapi/v1/klines` for candles and
//! `/fapi/v1/premiumIndex` for the mark price. Transport failures map to
//! `Network`, undecodable bodies to `MalformedData`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RsiWatchError;
use crate::logger::{self, LogTag};
use crate::monitor::MarketData;
use crate::series::PriceSeries;

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    mark_price: String,
}

pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new() -> Result<Self, RsiWatchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Base URL override, used by tests against a local server.
    pub fn with_base_url(base_url: &str) -> Result<Self, RsiWatchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RsiWatchError::network(base_url, e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_body(&self, path_and_query: &str) -> Result<String, RsiWatchError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        logger::debug(LogTag::Market, &format!("GET {}", url));

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RsiWatchError::network(
                url,
                format!("HTTP {}", status.as_u16()),
            ));
        }
        Ok(response.text().await?)
    }

    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, RsiWatchError> {
        let body = self
            .get_body(&format!(
                "/fapi/v1/klines?symbol={}&interval={}&limit={}",
                symbol, interval, limit
            ))
            .await?;
        let rows: Vec<Value> = serde_json::from_str(&body)?;
        PriceSeries::from_rows(&rows)
    }

    pub async fn mark_price(&self, symbol: &str) -> Result<f64, RsiWatchError> {
        let body = self
            .get_body(&format!("/fapi/v1/premiumIndex?symbol={}", symbol))
            .await?;
        let index: PremiumIndex = serde_json::from_str(&body)?;
        index.mark_price.parse::<f64>().map_err(|_| {
            RsiWatchError::malformed(
                "premiumIndex",
                format!("non-numeric markPrice '{}'", index.mark_price),
            )
        })
    }
}

#[async_trait]
impl MarketData for BinanceClient {
    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, RsiWatchError> {
        BinanceClient::klines(self, symbol, interval, limit).await
    }

    async fn mark_price(&self, symbol: &str) -> Result<f64, RsiWatchError> {
        BinanceClient::mark_price(self, symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BinanceClient::with_base_url("http://localhost:9000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn premium_index_decodes_mark_price_field() {
        let index: PremiumIndex =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","markPrice":"65000.12","lastFundingRate":"0.0001"}"#)
                .unwrap();
        assert_eq!(index.mark_price, "65000.12");
    }
}
