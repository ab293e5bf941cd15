//! Aggregation result types
//!
//! Plain domain structs; the API layer maps them onto its camelCase response
//! shapes.

use chrono::NaiveDate;

/// Income on one calendar day, 2-decimal rounded
#[derive(Debug, Clone, PartialEq)]
pub struct DailyIncome {
    pub date: NaiveDate,
    pub income: f64,
}

/// Daily income summary over a window
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeSummary {
    pub total_income: f64,
    pub average_daily_income: f64,
    pub highest_daily_income: f64,
    /// Date ascending, one entry per day with at least one order line
    pub income_per_day: Vec<DailyIncome>,
}

/// Units sold for one dish plus its share of all in-window order lines
#[derive(Debug, Clone, PartialEq)]
pub struct DishUnits {
    pub dish_id: i64,
    pub count: u64,
    pub percentage: f64,
}

/// Order line count on one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub amount: u64,
}

/// Occurrences of one (dish, topping) combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboCount {
    pub dish_id: i64,
    pub topping_id: i64,
    pub count: u64,
}

/// Occurrences of one topping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToppingCount {
    pub topping_id: i64,
    pub count: u64,
}
