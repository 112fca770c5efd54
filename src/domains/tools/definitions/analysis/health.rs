//! Advanced financial health tool: Altman Z-Score and Piotroski F-Score.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use std::sync::Arc;

use crate::core::upstream::FinancialDataSource;
use crate::domains::tools::FinancialService;
use crate::domains::tools::definitions::common::{
    MissingFields, billions, first_record_or_empty, ratio, records, symbol_arg, text,
};
use crate::domains::tools::error::ToolError;

// ============================================================================
// Altman Z-Score
// ============================================================================

/// Altman Z-Score inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AltmanInputs {
    pub working_capital: f64,
    pub retained_earnings: f64,
    pub ebit: f64,
    pub market_value_equity: f64,
    pub sales: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
}

/// Bankruptcy risk zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZZone {
    Safe,
    Grey,
    Distress,
}

impl ZZone {
    pub fn from_score(z: f64) -> Self {
        if z > 2.99 {
            Self::Safe
        } else if z > 1.81 {
            Self::Grey
        } else {
            Self::Distress
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Grey => "Grey",
            Self::Distress => "Distress",
        }
    }

    fn risk(self) -> &'static str {
        match self {
            Self::Safe => "low bankruptcy risk",
            Self::Grey => "moderate bankruptcy risk",
            Self::Distress => "high bankruptcy risk",
        }
    }
}

/// Weighted components `[A, B, C, D, E]` of the Z-Score.
pub fn altman_components(inputs: &AltmanInputs) -> [f64; 5] {
    let assets = inputs.total_assets;
    [
        inputs.working_capital / assets,
        inputs.retained_earnings / assets,
        inputs.ebit / assets,
        ratio(inputs.market_value_equity, inputs.total_liabilities),
        inputs.sales / assets,
    ]
}

/// `Z = 1.2A + 1.4B + 3.3C + 0.6D + 1.0E`. Requires positive total assets.
pub fn altman_z(inputs: &AltmanInputs) -> f64 {
    let [a, b, c, d, e] = altman_components(inputs);
    1.2 * a + 1.4 * b + 3.3 * c + 0.6 * d + 1.0 * e
}

// ============================================================================
// Piotroski F-Score
// ============================================================================

/// Figures for one reporting period.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodFigures {
    pub net_income: f64,
    pub operating_cash_flow: f64,
    pub total_assets: f64,
    pub long_term_debt: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub shares_outstanding: f64,
    pub gross_profit: f64,
    pub revenue: f64,
}

impl PeriodFigures {
    fn roa(&self) -> f64 {
        ratio(self.net_income, self.total_assets)
    }

    fn leverage(&self) -> f64 {
        ratio(self.long_term_debt, self.total_assets)
    }

    fn current_ratio(&self) -> f64 {
        ratio(self.current_assets, self.current_liabilities)
    }

    fn gross_margin(&self) -> f64 {
        ratio(self.gross_profit, self.revenue)
    }

    fn asset_turnover(&self) -> f64 {
        ratio(self.revenue, self.total_assets)
    }
}

/// The nine Piotroski tests in order.
pub const PIOTROSKI_TESTS: [&str; 9] = [
    "Positive return on assets",
    "Positive operating cash flow",
    "Improving return on assets",
    "Operating cash flow exceeds net income",
    "Decreasing long-term leverage",
    "Improving current ratio",
    "No share dilution",
    "Improving gross margin",
    "Improving asset turnover",
];

/// Outcome of each Piotroski test, aligned with [`PIOTROSKI_TESTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piotroski {
    pub passed: [bool; 9],
}

impl Piotroski {
    /// Run the tests. Year-over-year tests fail without a previous period.
    ///
    /// Trend tests on a ratio also fail when the previous value is zero, which
    /// is what a missing provider field reads as.
    pub fn evaluate(current: &PeriodFigures, previous: Option<&PeriodFigures>) -> Self {
        let cur = current;
        let trend = |test: fn(&PeriodFigures, &PeriodFigures) -> bool| {
            previous.is_some_and(|prev| test(cur, prev))
        };
        Self {
            passed: [
                cur.roa() > 0.0,
                cur.operating_cash_flow > 0.0,
                trend(|c, p| c.roa() > p.roa()),
                cur.operating_cash_flow > cur.net_income,
                trend(|c, p| c.leverage() < p.leverage()),
                trend(|c, p| p.current_ratio() > 0.0 && c.current_ratio() > p.current_ratio()),
                trend(|c, p| {
                    p.shares_outstanding > 0.0
                        && c.shares_outstanding > 0.0
                        && c.shares_outstanding <= p.shares_outstanding
                }),
                trend(|c, p| {
                    p.revenue > 0.0 && c.revenue > 0.0 && c.gross_margin() > p.gross_margin()
                }),
                trend(|c, p| p.asset_turnover() > 0.0 && c.asset_turnover() > p.asset_turnover()),
            ],
        }
    }

    pub fn score(&self) -> u32 {
        self.passed.iter().filter(|p| **p).count() as u32
    }
}

/// Piotroski strength band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FBand {
    Strong,
    Moderate,
    Weak,
}

impl FBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            7.. => Self::Strong,
            4..=6 => Self::Moderate,
            _ => Self::Weak,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }
}

// ============================================================================
// Overall rating
// ============================================================================

/// Combined rating from the Z zone and F band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallRating {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl OverallRating {
    /// | Z \ F    | Strong      | Moderate | Weak      |
    /// |----------|-------------|----------|-----------|
    /// | Safe     | Very Strong | Strong   | Moderate  |
    /// | Grey     | Strong      | Moderate | Weak      |
    /// | Distress | Moderate    | Weak     | Very Weak |
    pub fn from_parts(zone: ZZone, band: FBand) -> Self {
        use FBand as F;
        use ZZone as Z;
        match (zone, band) {
            (Z::Safe, F::Strong) => Self::VeryStrong,
            (Z::Safe, F::Moderate) | (Z::Grey, F::Strong) => Self::Strong,
            (Z::Safe, F::Weak) | (Z::Grey, F::Moderate) | (Z::Distress, F::Strong) => {
                Self::Moderate
            }
            (Z::Grey, F::Weak) | (Z::Distress, F::Moderate) => Self::Weak,
            (Z::Distress, F::Weak) => Self::VeryWeak,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryStrong => "Very Strong",
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::VeryWeak => "Very Weak",
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// Altman Z-Score, Piotroski F-Score and a combined rating.
pub struct AdvancedFinancialHealthService {
    source: Arc<dyn FinancialDataSource>,
}

impl AdvancedFinancialHealthService {
    pub const NAME: &'static str = "get_advanced_financial_health";
    pub const DESCRIPTION: &'static str = "Perform advanced financial health analysis including \
        Altman Z-Score and Piotroski F-Score";

    pub fn new(source: Arc<dyn FinancialDataSource>) -> Self {
        Self { source }
    }
}

/// Statement records for one period.
struct PeriodRecords<'a> {
    balance: &'a JsonObject,
    income: &'a JsonObject,
    cash_flow: &'a JsonObject,
}

impl PeriodRecords<'_> {
    fn figures(&self, missing: &mut MissingFields, period: &str) -> PeriodFigures {
        let balance = format!("balance_sheet[{period}]");
        let income = format!("income_statement[{period}]");
        let cash_flow = format!("cash_flow[{period}]");
        PeriodFigures {
            net_income: missing.take(self.income, &income, "netIncome"),
            operating_cash_flow: missing.take(self.cash_flow, &cash_flow, "operatingCashFlow"),
            total_assets: missing.take(self.balance, &balance, "totalAssets"),
            long_term_debt: missing.take(self.balance, &balance, "longTermDebt"),
            current_assets: missing.take(self.balance, &balance, "totalCurrentAssets"),
            current_liabilities: missing.take(self.balance, &balance, "totalCurrentLiabilities"),
            shares_outstanding: missing.take(self.income, &income, "weightedAverageShsOut"),
            gross_profit: missing.take(self.income, &income, "grossProfit"),
            revenue: missing.take(self.income, &income, "revenue"),
        }
    }
}

#[async_trait]
impl FinancialService for AdvancedFinancialHealthService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let symbol = symbol_arg(arguments)?;

        let two_periods = [("limit", "2".to_string())];
        let latest = [("limit", "1".to_string())];
        let balance_path = format!("/balance-sheet-statement/{symbol}");
        let income_path = format!("/income-statement/{symbol}");
        let cash_flow_path = format!("/cash-flow-statement/{symbol}");
        let metrics_path = format!("/key-metrics/{symbol}");

        let (balance, income, cash_flow, metrics) = tokio::try_join!(
            self.source.fetch(&balance_path, &two_periods),
            self.source.fetch(&income_path, &two_periods),
            self.source.fetch(&cash_flow_path, &two_periods),
            self.source.fetch(&metrics_path, &latest),
        )?;

        let balance = records(balance)?;
        let income = records(income)?;
        let cash_flow = records(cash_flow)?;
        let metrics = first_record_or_empty(metrics, &symbol)?;
        if balance.is_empty() && income.is_empty() {
            return Err(ToolError::SymbolNotFound(symbol));
        }

        let empty = JsonObject::new();
        let period = |index: usize| PeriodRecords {
            balance: balance.get(index).unwrap_or(&empty),
            income: income.get(index).unwrap_or(&empty),
            cash_flow: cash_flow.get(index).unwrap_or(&empty),
        };

        let mut missing = MissingFields::new();
        let current_records = period(0);
        let current = current_records.figures(&mut missing, "current");
        let has_previous = balance.len() > 1 && income.len() > 1 && cash_flow.len() > 1;
        let previous = has_previous.then(|| period(1).figures(&mut missing, "previous"));

        if current.total_assets <= 0.0 {
            return Err(ToolError::DataIncomplete {
                symbol,
                fields: vec!["balance_sheet.totalAssets".to_string()],
            });
        }

        let total_liabilities =
            missing.take(current_records.balance, "balance_sheet[current]", "totalLiabilities");
        let retained_earnings =
            missing.take(current_records.balance, "balance_sheet[current]", "retainedEarnings");
        let equity = missing.take(
            current_records.balance,
            "balance_sheet[current]",
            "totalStockholdersEquity",
        );
        let ebit =
            missing.take(current_records.income, "income_statement[current]", "operatingIncome");
        let free_cash_flow =
            missing.take(current_records.cash_flow, "cash_flow[current]", "freeCashFlow");
        let market_cap = missing.take(&metrics, "key_metrics", "marketCap");

        let altman = AltmanInputs {
            working_capital: current.current_assets - current.current_liabilities,
            retained_earnings,
            ebit,
            market_value_equity: market_cap,
            sales: current.revenue,
            total_assets: current.total_assets,
            total_liabilities,
        };
        let z = altman_z(&altman);
        let zone = ZZone::from_score(z);
        let [a, b, c, d, e] = altman_components(&altman);

        let piotroski = Piotroski::evaluate(&current, previous.as_ref());
        let f_score = piotroski.score();
        let band = FBand::from_score(f_score);
        let overall = OverallRating::from_parts(zone, band);

        let mut out = format!(
            "Advanced Financial Health Analysis for {symbol}\n\
             Period: {date}\n\n\
             === ALTMAN Z-SCORE ===\n\
             Z-Score: {z:.2} ({zone} Zone - {risk})\n\
             - Working Capital / Total Assets: {a:.3}\n\
             - Retained Earnings / Total Assets: {b:.3}\n\
             - EBIT / Total Assets: {c:.3}\n\
             - Market Value of Equity / Total Liabilities: {d:.3}\n\
             - Sales / Total Assets: {e:.3}\n\n\
             === PIOTROSKI F-SCORE ===\n\
             F-Score: {f_score}/9 ({band})",
            date = text(current_records.balance, "date"),
            zone = zone.as_str(),
            risk = zone.risk(),
            band = band.as_str(),
        );
        for (name, passed) in PIOTROSKI_TESTS.iter().zip(piotroski.passed) {
            out.push_str(&format!("\n[{}] {name}", if passed { "x" } else { " " }));
        }
        if previous.is_none() {
            out.push_str("\n(previous period unavailable: year-over-year tests not passed)");
        }

        out.push_str(&format!(
            "\n\n=== KEY METRICS ===\n\
             Current Ratio: {:.2}\n\
             Debt-to-Equity: {:.2}\n\
             Return on Assets: {:.1}%\n\
             Gross Margin: {:.1}%\n\
             Working Capital: {}\n\
             Long-term Debt: {}\n\
             Operating Cash Flow: {}\n\
             Free Cash Flow: {}\n\n\
             === OVERALL RATING ===\n\
             {} (Altman zone: {}, Piotroski band: {})",
            current.current_ratio(),
            ratio(total_liabilities, equity),
            current.roa() * 100.0,
            current.gross_margin() * 100.0,
            billions(altman.working_capital),
            billions(current.long_term_debt),
            billions(current.operating_cash_flow),
            billions(free_cash_flow),
            overall.as_str(),
            zone.as_str(),
            band.as_str(),
        ));

        if let Some(note) = missing.note() {
            out.push_str("\n\n");
            out.push_str(&note);
        }

        Ok(out)
    }
}
