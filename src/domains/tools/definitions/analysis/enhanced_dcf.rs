//! Enhanced DCF analysis tool.
//!
//! Extends the provider DCF with a levered (equity) value, growth scenarios,
//! an enterprise value range and a four-factor financial health score.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use serde_json::Value;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    MissingFields, Recommendation, billions, f64_arg, first_record, first_record_or_empty, money,
    num, ratio, symbol_arg, text, upside_pct,
};
use crate::domains::tools::definitions::fundamentals::dcf::STOCK_PRICE_FIELD;
use crate::domains::tools::error::ToolError;

/// Growth assumptions for the three scenarios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthScenarios {
    pub bull: f64,
    pub base: f64,
    pub bear: f64,
}

impl Default for GrowthScenarios {
    fn default() -> Self {
        Self {
            bull: 0.15,
            base: 0.10,
            bear: 0.05,
        }
    }
}

impl GrowthScenarios {
    /// Read `growth_scenarios`, falling back to the default for each missing case.
    fn from_arguments(arguments: &JsonObject) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(given)) = arguments.get("growth_scenarios") else {
            return defaults;
        };
        let pick = |key: &str, fallback: f64| {
            given.get(key).and_then(Value::as_f64).unwrap_or(fallback)
        };
        Self {
            bull: pick("bull", defaults.bull),
            base: pick("base", defaults.base),
            bear: pick("bear", defaults.bear),
        }
    }
}

/// `dcf * (1 + growth) / (1 + discount_adjustment)`.
pub fn scenario_value(dcf: f64, growth: f64, discount_adjustment: f64) -> f64 {
    dcf * (1.0 + growth) / (1.0 + discount_adjustment)
}

/// Equity value per share after netting debt against cash.
///
/// Without a share count the net debt cannot be spread, so the value is
/// returned unchanged.
pub fn levered_value(value: f64, shares: f64, total_debt: f64, cash: f64) -> f64 {
    if shares <= 0.0 {
        return value;
    }
    (value * shares - (total_debt - cash)) / shares
}

/// Four-factor health rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthRating {
    fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Inputs to [`health_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthInputs {
    pub current_ratio: f64,
    pub debt_to_equity: f64,
    pub roe: f64,
    pub free_cash_flow: f64,
    pub revenue: f64,
}

/// Score 0-100: 25 points each for liquidity, leverage, ROE and FCF margin.
pub fn health_score(inputs: &HealthInputs) -> (u32, HealthRating) {
    let tiered = |value: f64, tiers: [f64; 3], higher_is_better: bool| -> u32 {
        let [top, mid, low] = tiers;
        let passes = |t: f64| if higher_is_better { value >= t } else { value <= t };
        if passes(top) {
            25
        } else if passes(mid) {
            20
        } else if passes(low) {
            15
        } else {
            0
        }
    };

    let mut score = tiered(inputs.current_ratio, [2.0, 1.5, 1.0], true)
        + tiered(inputs.debt_to_equity, [0.3, 0.5, 1.0], false)
        + tiered(inputs.roe, [0.15, 0.10, 0.05], true);
    if inputs.revenue > 0.0 {
        score += tiered(inputs.free_cash_flow / inputs.revenue, [0.15, 0.10, 0.05], true);
    }

    (score, HealthRating::from_score(score))
}

/// Levered DCF, scenarios and financial health in one report.
pub struct EnhancedDcfService {
    source: Arc<dyn FinancialDataSource>,
}

impl EnhancedDcfService {
    pub const NAME: &'static str = "get_enhanced_dcf_analysis";
    pub const DESCRIPTION: &'static str = "Perform enhanced DCF analysis with levered DCF, \
        scenario modeling, and comprehensive financial health metrics";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FinancialService for EnhancedDcfService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;
        let scenarios = GrowthScenarios::from_arguments(arguments);
        let discount = f64_arg(arguments, "discount_rate_adjustment").unwrap_or(0.0);

        let latest = [("limit", "1".to_string())];
        let dcf_path = format!("/discounted-cash-flow/{symbol}");
        let balance_path = format!("/balance-sheet-statement/{symbol}");
        let cash_flow_path = format!("/cash-flow-statement/{symbol}");
        let metrics_path = format!("/key-metrics/{symbol}");
        let income_path = format!("/income-statement/{symbol}");

        let (dcf_body, balance, cash_flow, metrics, income) = tokio::try_join!(
            self.source.fetch(&dcf_path, &[]),
            self.source.fetch(&balance_path, &latest),
            self.source.fetch(&cash_flow_path, &latest),
            self.source.fetch(&metrics_path, &latest),
            self.source.fetch(&income_path, &latest),
        )?;

        let dcf_record = first_record(dcf_body, &symbol)?;
        let (Some(base_dcf), Some(price)) =
            (num(&dcf_record, "dcf"), num(&dcf_record, STOCK_PRICE_FIELD))
        else {
            let fields = ["dcf", STOCK_PRICE_FIELD]
                .into_iter()
                .filter(|key| num(&dcf_record, key).is_none())
                .map(str::to_string)
                .collect();
            return Err(ToolError::DataIncomplete { symbol, fields });
        };

        let balance = first_record_or_empty(balance, &symbol)?;
        let cash_flow = first_record_or_empty(cash_flow, &symbol)?;
        let metrics = first_record_or_empty(metrics, &symbol)?;
        let income = first_record_or_empty(income, &symbol)?;

        let mut missing = MissingFields::new();
        let total_debt = missing.take(&balance, "balance_sheet", "totalDebt");
        let cash = missing.take(&balance, "balance_sheet", "cashAndCashEquivalents");
        let equity = missing.take(&balance, "balance_sheet", "totalStockholdersEquity");
        let current_assets = missing.take(&balance, "balance_sheet", "totalCurrentAssets");
        let current_liabilities =
            missing.take(&balance, "balance_sheet", "totalCurrentLiabilities");
        let free_cash_flow = missing.take(&cash_flow, "cash_flow", "freeCashFlow");
        let market_cap = missing.take(&metrics, "key_metrics", "marketCap");
        let enterprise_value = missing.take(&metrics, "key_metrics", "enterpriseValue");
        let roe = missing.take(&metrics, "key_metrics", "roe");
        let revenue = missing.take(&income, "income_statement", "revenue");

        let shares = if price > 0.0 { market_cap / price } else { 0.0 };
        let levered_dcf = levered_value(base_dcf, shares, total_debt, cash);

        let bull = scenario_value(base_dcf, scenarios.bull, discount);
        let base = scenario_value(base_dcf, scenarios.base, discount);
        let bear = scenario_value(base_dcf, scenarios.bear, discount);

        let inputs = HealthInputs {
            current_ratio: ratio(current_assets, current_liabilities),
            debt_to_equity: ratio(total_debt, equity),
            roe,
            free_cash_flow,
            revenue,
        };
        let (score, rating) = health_score(&inputs);

        let upside_base = upside_pct(base_dcf, price).unwrap_or(0.0);
        let upside_levered = upside_pct(levered_dcf, price).unwrap_or(0.0);
        let recommendation = Recommendation::from_upside(upside_levered);

        let scenario_line = |label: &str, value: f64, growth: f64| {
            format!(
                "{label} Case DCF: {} ({:.1}% growth) | Levered: {}",
                money(value),
                growth * 100.0,
                money(levered_value(value, shares, total_debt, cash))
            )
        };

        let mut out = format!(
            "Enhanced DCF Analysis for {symbol}\n\
             Date: {date}\n\n\
             === CORE VALUATION ===\n\
             Current Stock Price: {price}\n\
             Base DCF Fair Value: {base_dcf}\n\
             Levered DCF Fair Value: {levered}\n\n\
             Upside/Downside (Base): {upside_base:.1}%\n\
             Upside/Downside (Levered): {upside_levered:.1}%\n\n\
             === SCENARIO ANALYSIS ===\n\
             {bull_line}\n\
             {base_line}\n\
             {bear_line}\n\
             Discount Rate Adjustment: {discount:.1}%\n\
             Enterprise Value Range: {ev_low} - {ev_high}\n\n\
             === FINANCIAL HEALTH METRICS ===\n\
             Financial Health Score: {score}/100 ({rating})\n\
             Current Ratio: {current_ratio:.2}\n\
             Debt-to-Equity: {debt_to_equity:.2}\n\
             Return on Equity: {roe:.1}%\n\
             Free Cash Flow: {fcf}\n\n\
             === VALUATION CONTEXT ===\n\
             Market Cap: {market_cap}\n\
             Enterprise Value: {enterprise_value}\n\
             Net Debt: {net_debt}\n\n\
             === RECOMMENDATION ===\n\
             {action} ({valuation}): {upside_levered:.1}% levered upside/downside \
             with {health} financial health",
            date = text(&dcf_record, "date"),
            price = money(price),
            base_dcf = money(base_dcf),
            levered = money(levered_dcf),
            bull_line = scenario_line("Bull", bull, scenarios.bull),
            base_line = scenario_line("Base", base, scenarios.base),
            bear_line = scenario_line("Bear", bear, scenarios.bear),
            discount = discount * 100.0,
            ev_low = billions(bear.min(bull) * shares),
            ev_high = billions(bear.max(bull) * shares),
            rating = rating.as_str(),
            current_ratio = inputs.current_ratio,
            debt_to_equity = inputs.debt_to_equity,
            roe = roe * 100.0,
            fcf = billions(free_cash_flow),
            market_cap = billions(market_cap),
            enterprise_value = billions(enterprise_value),
            net_debt = billions(total_debt - cash),
            action = recommendation.label(),
            valuation = recommendation.valuation(),
            health = rating.as_str().to_lowercase(),
        );

        if let Some(note) = missing.note() {
            out.push_str("\n\n");
            out.push_str(&note);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::stub::StubSource;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn full_stub() -> StubSource {
        StubSource::new()
            .with(
                "/discounted-cash-flow/ACME",
                json!([{
                    "symbol": "ACME",
                    "date": "2024-01-02",
                    "dcf": 130.0,
                    "Stock Price": 100.0
                }]),
            )
            .with(
                "/balance-sheet-statement/ACME",
                json!([{
                    "totalDebt": 2.0e9,
                    "cashAndCashEquivalents": 1.0e9,
                    "totalStockholdersEquity": 10.0e9,
                    "totalCurrentAssets": 5.0e9,
                    "totalCurrentLiabilities": 2.0e9
                }]),
            )
            .with(
                "/cash-flow-statement/ACME",
                json!([{ "freeCashFlow": 3.0e9 }]),
            )
            .with(
                "/key-metrics/ACME",
                json!([{ "marketCap": 10.0e9, "enterpriseValue": 11.0e9, "roe": 0.2 }]),
            )
            .with(
                "/income-statement/ACME",
                json!([{ "revenue": 15.0e9 }]),
            )
    }

    #[test]
    fn test_scenario_value() {
        assert!((scenario_value(100.0, 0.10, 0.0) - 110.0).abs() < EPS);
        assert!((scenario_value(100.0, 0.10, 0.10) - 100.0).abs() < EPS);
    }

    #[test]
    fn test_levered_value() {
        // 100M shares, 1B net debt: 10 per share off.
        assert!((levered_value(130.0, 100.0e6, 2.0e9, 1.0e9) - 120.0).abs() < EPS);
        assert_eq!(levered_value(130.0, 0.0, 2.0e9, 1.0e9), 130.0);
    }

    #[test]
    fn test_health_score_tiers() {
        let strong = HealthInputs {
            current_ratio: 2.5,
            debt_to_equity: 0.2,
            roe: 0.2,
            free_cash_flow: 20.0,
            revenue: 100.0,
        };
        assert_eq!(health_score(&strong), (100, HealthRating::Excellent));

        let fair = HealthInputs {
            current_ratio: 1.2,
            debt_to_equity: 0.8,
            roe: 0.06,
            free_cash_flow: 0.0,
            revenue: 100.0,
        };
        assert_eq!(health_score(&fair), (45, HealthRating::Fair));

        assert_eq!(
            health_score(&HealthInputs {
                debt_to_equity: 5.0,
                ..Default::default()
            }),
            (0, HealthRating::Poor)
        );
    }

    #[test]
    fn test_scenarios_from_arguments() {
        let args = json!({ "growth_scenarios": { "bull": 0.3 } });
        let scenarios = GrowthScenarios::from_arguments(args.as_object().unwrap());
        assert_eq!(
            scenarios,
            GrowthScenarios {
                bull: 0.3,
                base: 0.10,
                bear: 0.05
            }
        );
    }

    #[tokio::test]
    async fn test_full_report() {
        let stub = Arc::new(full_stub());
        let service = EnhancedDcfService::new(stub.clone());

        let args = json!({ "symbol": "ACME" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();

        assert!(text.starts_with("Enhanced DCF Analysis for ACME\nDate: 2024-01-02"));
        assert!(text.contains("Levered DCF Fair Value: $120.00"));
        assert!(text.contains("Upside/Downside (Base): 30.0%"));
        assert!(text.contains("Upside/Downside (Levered): 20.0%"));
        assert!(text.contains("Bull Case DCF: $149.50 (15.0% growth) | Levered: $139.50"));
        assert!(text.contains("Bear Case DCF: $136.50 (5.0% growth)"));
        let shares = 100.0e6;
        let ev_range = format!(
            "Enterprise Value Range: {} - {}",
            billions(scenario_value(130.0, 0.05, 0.0) * shares),
            billions(scenario_value(130.0, 0.15, 0.0) * shares)
        );
        assert!(text.contains(&ev_range));
        assert!(text.contains("Financial Health Score: 100/100 (Excellent)"));
        assert!(text.contains("Net Debt: $1.0B"));
        assert!(text.contains(
            "=== RECOMMENDATION ===\nBUY (Undervalued): 20.0% levered upside/downside"
        ));
        assert!(!text.contains("Note:"));
        assert_eq!(stub.call_count(), 5);
    }

    #[tokio::test]
    async fn test_missing_statements_are_noted() {
        let stub = Arc::new(StubSource::new().with(
            "/discounted-cash-flow/ACME",
            json!([{ "dcf": 150.0, "Stock Price": 100.0 }]),
        ));
        let service = EnhancedDcfService::new(stub);

        let args = json!({ "symbol": "ACME" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert!(text.contains("STRONG BUY (Undervalued)"));
        assert!(
            text.contains("Note: missing provider fields treated as 0: balance_sheet.totalDebt")
        );
        assert!(text.contains("key_metrics.marketCap"));
    }

    #[tokio::test]
    async fn test_missing_stock_price_is_incomplete() {
        let stub = Arc::new(StubSource::new().with(
            "/discounted-cash-flow/ACME",
            json!([{ "symbol": "ACME", "dcf": 130.0 }]),
        ));
        let service = EnhancedDcfService::new(stub.clone());

        let args = json!({ "symbol": "ACME" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert_eq!(text, "Incomplete data for symbol ACME: missing Stock Price");

        let err = service
            .execute(args.as_object().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "DataIncomplete");
    }

    #[tokio::test]
    async fn test_missing_dcf_is_incomplete() {
        let stub = Arc::new(StubSource::new().with(
            "/discounted-cash-flow/ACME",
            json!([{ "symbol": "ACME", "Stock Price": 100.0 }]),
        ));
        let service = EnhancedDcfService::new(stub);

        let args = json!({ "symbol": "ACME" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert_eq!(text, "Incomplete data for symbol ACME: missing dcf");
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let service = EnhancedDcfService::new(Arc::new(StubSource::new()));
        let args = json!({ "symbol": "ZZZZ" });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert_eq!(text, "No data found for symbol: ZZZZ");
    }

    #[tokio::test]
    async fn test_custom_scenarios_and_discount() {
        let stub = Arc::new(full_stub());
        let service = EnhancedDcfService::new(stub);

        let args = json!({
            "symbol": "ACME",
            "growth_scenarios": { "bull": 0.3, "base": 0.0, "bear": -0.1 },
            "discount_rate_adjustment": 0.3
        });
        let text = service.run(args.as_object().unwrap()).await.unwrap();
        assert!(text.contains("Bull Case DCF: $130.00 (30.0% growth)"));
        assert!(text.contains("Base Case DCF: $100.00 (0.0% growth)"));
        assert!(text.contains("Bear Case DCF: $90.00 (-10.0% growth)"));
        assert!(text.contains("Discount Rate Adjustment: 30.0%"));
    }

    #[tokio::test]
    async fn test_ev_range_is_ordered_when_bear_exceeds_bull() {
        let stub = Arc::new(full_stub());
        let service = EnhancedDcfService::new(stub);

        let args = json!({
            "symbol": "ACME",
            "growth_scenarios": { "bull": 0.0, "bear": 0.5 }
        });
        let text = service.run(args.as_object().unwrap()).await.unwrap();

        let shares = 100.0e6;
        let ev_range = format!(
            "Enterprise Value Range: {} - {}",
            billions(scenario_value(130.0, 0.0, 0.0) * shares),
            billions(scenario_value(130.0, 0.5, 0.0) * shares)
        );
        assert!(text.contains(&ev_range), "{text}");
    }
}
