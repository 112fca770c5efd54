//! Technical indicators tool.

use async_trait::async_trait;
use chrono::NaiveDate;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    money, num, or_na, records, str_arg, str_field, symbol_arg, text, u64_arg,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::validation::DATE_FORMAT;

/// Data points shown before the output is truncated.
const MAX_POINTS: usize = 5;

pub const DEFAULT_PERIOD: u64 = 20;
pub const DEFAULT_TIMEFRAME: &str = "1day";

/// Indicators whose values are prices.
const PRICE_INDICATORS: &[&str] = &["sma", "ema", "wma", "dema", "tema"];

/// Indicator series for a symbol.
pub struct TechnicalIndicatorsService {
    source: Arc<dyn FinancialDataSource>,
}

impl TechnicalIndicatorsService {
    pub const NAME: &'static str = "get_technical_indicators";
    pub const DESCRIPTION: &'static str =
        "Get technical indicators for stock analysis (SMA, EMA, RSI, etc.)";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

/// Leading `YYYY-MM-DD` of a provider timestamp such as `2024-01-02 00:00:00`.
fn entry_day(entry: &JsonObject) -> Option<NaiveDate> {
    let date = str_field(entry, "date")?;
    NaiveDate::parse_from_str(date.get(..10)?, DATE_FORMAT).ok()
}

fn parse_bound(arguments: &JsonObject, key: &str) -> Option<NaiveDate> {
    str_arg(arguments, key).and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
}

#[async_trait]
impl FinancialService for TechnicalIndicatorsService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;
        let indicator = str_arg(arguments, "indicator_type")
            .map(str::to_lowercase)
            .ok_or_else(|| ToolError::invalid_argument("indicator_type", "is required"))?;
        let period = u64_arg(arguments, "period").unwrap_or(DEFAULT_PERIOD);
        let timeframe = str_arg(arguments, "timeframe").unwrap_or(DEFAULT_TIMEFRAME);
        let from = parse_bound(arguments, "from_date");
        let to = parse_bound(arguments, "to_date");

        let mut params = vec![("period", period.to_string()), ("type", indicator.clone())];
        if let Some(from) = from {
            params.push(("from", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = to {
            params.push(("to", to.format(DATE_FORMAT).to_string()));
        }

        let body = self
            .source
            .fetch(&format!("/technical_indicator/{timeframe}/{symbol}"), &params)
            .await?;
        let series = records(body)?;
        if series.is_empty() {
            return Err(ToolError::SymbolNotFound(symbol));
        }

        // Date bounds apply locally as well, inclusive.
        let points: Vec<&JsonObject> = series
            .iter()
            .filter(|entry| {
                let Some(day) = entry_day(entry) else {
                    return from.is_none() && to.is_none();
                };
                from.is_none_or(|f| day >= f) && to.is_none_or(|t| day <= t)
            })
            .collect();

        let label = indicator.to_uppercase();
        let mut out = format!(
            "Technical Indicators for {symbol}\n\n\
             Indicator: {label} ({period}-period, {timeframe})\n\n\
             Latest Data:"
        );

        if points.is_empty() {
            out.push_str("\n\nNo data points in the requested date range");
            return Ok(out);
        }

        let is_price = PRICE_INDICATORS.contains(&indicator.as_str());
        for entry in points.iter().take(MAX_POINTS) {
            out.push_str(&format!(
                "\n\nDate: {}\nClose Price: {}",
                text(entry, "date"),
                or_na(num(entry, "close"), money)
            ));
            if let Some(value) = num(entry, &indicator) {
                if is_price {
                    out.push_str(&format!("\n{label}: {}", money(value)));
                } else {
                    out.push_str(&format!("\n{label}: {value:.2}"));
                }
            }
        }
        if points.len() > MAX_POINTS {
            out.push_str(&format!(
                "\n\n... and {} more data points",
                points.len() - MAX_POINTS
            ));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::{Value, json};

    fn series() -> Value {
        let points: Vec<Value> = (1..=7)
            .rev()
            .map(|d| {
                json!({
                    "date": format!("2024-01-{d:02} 00:00:00"),
                    "close": 180.0 + d as f64,
                    "sma": 175.5 + d as f64,
                    "rsi": 50.0 + d as f64 / 4.0
                })
            })
            .collect();
        Value::Array(points)
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_default_timeframe_and_period() {
        let stub = Arc::new(StubSource::new().with("/technical_indicator/1day/AAPL", series()));
        let service = TechnicalIndicatorsService::new(stub.clone());

        let text = service
            .run(&args(json!({ "symbol": "AAPL", "indicator_type": "sma" })))
            .await
            .unwrap();

        assert!(text.contains("Indicator: SMA (20-period, 1day)"));
        let calls = stub.calls();
        assert_eq!(calls[0].path, "/technical_indicator/1day/AAPL");
        assert_eq!(
            calls[0].params,
            vec![
                ("period".to_string(), "20".to_string()),
                ("type".to_string(), "sma".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_period_twenty_output_is_exact() {
        let stub = Arc::new(StubSource::new().with("/technical_indicator/1day/AAPL", series()));
        let service = TechnicalIndicatorsService::new(stub);

        let text = service
            .run(&args(json!({ "symbol": "AAPL", "indicator_type": "sma", "period": 20 })))
            .await
            .unwrap();

        let expected = "Technical Indicators for AAPL\n\n\
            Indicator: SMA (20-period, 1day)\n\n\
            Latest Data:\n\n\
            Date: 2024-01-07 00:00:00\nClose Price: $187.00\nSMA: $182.50\n\n\
            Date: 2024-01-06 00:00:00\nClose Price: $186.00\nSMA: $181.50\n\n\
            Date: 2024-01-05 00:00:00\nClose Price: $185.00\nSMA: $180.50\n\n\
            Date: 2024-01-04 00:00:00\nClose Price: $184.00\nSMA: $179.50\n\n\
            Date: 2024-01-03 00:00:00\nClose Price: $183.00\nSMA: $178.50\n\n\
            ... and 2 more data points";
        assert_eq!(text, expected);
    }

    #[tokio::test]
    async fn test_oscillator_has_no_currency() {
        let stub = Arc::new(StubSource::new().with("/technical_indicator/1hour/AAPL", series()));
        let service = TechnicalIndicatorsService::new(stub);

        let text = service
            .run(&args(json!({
                "symbol": "AAPL",
                "indicator_type": "rsi",
                "period": 14,
                "timeframe": "1hour"
            })))
            .await
            .unwrap();
        assert!(text.contains("Indicator: RSI (14-period, 1hour)"));
        assert!(text.contains("RSI: 51.75"));
        assert!(!text.contains("RSI: $"));
    }

    #[tokio::test]
    async fn test_dates_filter_locally_inclusive() {
        let stub = Arc::new(StubSource::new().with("/technical_indicator/1day/AAPL", series()));
        let service = TechnicalIndicatorsService::new(stub.clone());

        let text = service
            .run(&args(json!({
                "symbol": "AAPL",
                "indicator_type": "sma",
                "from_date": "2024-01-03",
                "to_date": "2024-01-04"
            })))
            .await
            .unwrap();

        assert!(text.contains("Date: 2024-01-04"));
        assert!(text.contains("Date: 2024-01-03"));
        assert!(!text.contains("Date: 2024-01-05"));
        assert!(!text.contains("Date: 2024-01-02"));
        assert!(!text.contains("more data points"));

        let params = &stub.calls()[0].params;
        assert!(params.contains(&("from".to_string(), "2024-01-03".to_string())));
        assert!(params.contains(&("to".to_string(), "2024-01-04".to_string())));
    }

    #[tokio::test]
    async fn test_empty_series_is_no_data() {
        let stub = Arc::new(StubSource::new());
        let service = TechnicalIndicatorsService::new(stub);

        let text = service
            .run(&args(json!({ "symbol": "ZZZZ", "indicator_type": "ema" })))
            .await
            .unwrap();
        assert_eq!(text, "No data found for symbol: ZZZZ");
    }
}
