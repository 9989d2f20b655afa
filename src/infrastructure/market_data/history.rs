use crate::domain::errors::{ConfigurationError, FetchError};
use crate::domain::ports::{QuoteProvider, QuoteResponse};
use crate::domain::summary::DailyBar;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

pub const WORLD_TRADING_DATA_URL: &str = "https://api.worldtradingdata.com/api/v1/history";

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Option<HashMap<String, HistoryBar>>,
    #[serde(rename = "Message", alias = "message")]
    message: Option<String>,
}

/// Values arrive as numeric strings, occasionally as bare numbers.
#[derive(Debug, Deserialize)]
struct HistoryBar {
    open: Option<Value>,
    close: Option<Value>,
    high: Option<Value>,
    low: Option<Value>,
    volume: Option<Value>,
}

/// Daily history endpoint authenticated with a static API token.
pub struct HistoryQuoteProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HistoryQuoteProvider {
    /// Fails before any request can be made when no API key is configured.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Interpret a response body for `day`.
    pub fn interpret(body: &str, day: NaiveDate) -> QuoteResponse {
        let response: HistoryResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => return QuoteResponse::Malformed(format!("invalid JSON: {}", e)),
        };

        let Some(history) = response.history else {
            let reason = response
                .message
                .unwrap_or_else(|| "response has no history".to_string());
            return QuoteResponse::Malformed(reason);
        };

        let day_key = day.format("%Y-%m-%d").to_string();
        let Some(bar) = history.get(&day_key) else {
            return QuoteResponse::Malformed(format!("history has no entry for {}", day_key));
        };

        match Self::to_daily_bar(bar) {
            Ok(bar) => QuoteResponse::Found(bar),
            Err(reason) => QuoteResponse::Malformed(format!("{}: {}", day_key, reason)),
        }
    }

    fn to_daily_bar(bar: &HistoryBar) -> Result<DailyBar, String> {
        Ok(DailyBar {
            open: decimal_field("open", bar.open.as_ref())?,
            close: decimal_field("close", bar.close.as_ref())?,
            high: decimal_field("high", bar.high.as_ref())?,
            low: decimal_field("low", bar.low.as_ref())?,
            volume: volume_field(bar.volume.as_ref())?,
        })
    }
}

fn field_text(name: &str, value: Option<&Value>) -> Result<String, String> {
    match value {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!("{} has unexpected value {}", name, other)),
        None => Err(format!("{} is missing", name)),
    }
}

fn decimal_field(name: &str, value: Option<&Value>) -> Result<Decimal, String> {
    let text = field_text(name, value)?;
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| format!("{} is not a number: {}", name, text))
}

fn volume_field(value: Option<&Value>) -> Result<u64, String> {
    let text = field_text("volume", value)?;
    text.parse::<u64>()
        .map_err(|_| format!("volume is not a whole number: {}", text))
}

#[async_trait]
impl QuoteProvider for HistoryQuoteProvider {
    async fn daily_bar(&self, symbol: &str, day: NaiveDate) -> Result<QuoteResponse, FetchError> {
        let date = day.format("%Y-%m-%d").to_string();
        let quote_error = |reason: String| FetchError::Quote {
            symbol: symbol.to_string(),
            day,
            reason,
        };

        debug!("Requesting history for {} on {}", symbol, date);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("symbol", symbol),
                ("date_from", date.as_str()),
                ("date_to", date.as_str()),
                ("api_token", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| quote_error(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(quote_error(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| quote_error(e.without_url().to_string()))?;

        // Client errors usually carry a JSON message; let interpret report it
        Ok(Self::interpret(&body, day))
    }
}
