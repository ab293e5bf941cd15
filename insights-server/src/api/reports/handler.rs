//! Sales report handlers
//!
//! Handlers parse query parameters, pull table snapshots from the dataset
//! service and call into `reports::queries`. Response bodies are camelCase;
//! the domain structs stay snake_case and are mapped here, at the
//! serialization boundary.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::reports::queries::{self, DEFAULT_TOPPING_LIMIT};
use crate::reports::range::DateRange;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl RangeQuery {
    /// Both bounds required, strict `YYYY-MM-DD`
    fn require_range(&self) -> AppResult<DateRange> {
        let start = self
            .start_date
            .as_deref()
            .ok_or_else(|| AppError::validation("Missing required parameter: startDate"))?;
        let end = self
            .end_date
            .as_deref()
            .ok_or_else(|| AppError::validation("Missing required parameter: endDate"))?;
        Ok(DateRange::new(parse_date(start)?, parse_date(end)?))
    }
}

#[derive(Debug, Deserialize)]
pub struct ToppingsQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    /// Kept as a raw string so a bad value maps to the validation envelope
    /// instead of failing inside the `Query` extractor
    pub limit: Option<String>,
}

impl ToppingsQuery {
    /// Non-negative integer, default 3
    fn parse_limit(&self) -> AppResult<usize> {
        match self.limit.as_deref() {
            None => Ok(DEFAULT_TOPPING_LIMIT),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid limit: {}", raw))),
        }
    }

    /// The window only applies when both bounds are present; a lone bound
    /// means the whole table, matching the nullable-range contract
    fn optional_range(&self) -> AppResult<Option<DateRange>> {
        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) => {
                Ok(Some(DateRange::new(parse_date(start)?, parse_date(end)?)))
            }
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSalesResponse {
    pub total_sales: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyIncomeEntry {
    pub date: NaiveDate,
    pub income: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageSalesResponse {
    /// Period-over-period comparison was never implemented upstream; this
    /// field is a constant-zero placeholder kept for response compatibility
    pub percentage_change: f64,
    pub total_income: f64,
    pub average_daily_income: f64,
    pub highest_daily_income: f64,
    pub income_per_day: Vec<DailyIncomeEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDishEntry {
    pub product_id: i64,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopByUnitsResponse {
    pub tops: Vec<TopDishEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCountEntry {
    pub date: NaiveDate,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesCountResponse {
    pub count_per_day: Vec<DailyCountEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishToppingEntry {
    pub dish_id: i64,
    pub topping_id: i64,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishToppingResponse {
    pub dish_topping: DishToppingEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToppingEntry {
    pub topping_id: i64,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopToppingsResponse {
    pub toppings: Vec<ToppingEntry>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /total-sales-value - sum of prices over the window
pub async fn total_sales_value(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Json<TotalSalesResponse>> {
    let range = params.require_range()?;
    tracing::debug!(%restaurant_id, start = %range.start, end = %range.end, "total sales value");

    let orders = state.dataset.order_lines()?;
    let total = queries::total_sales_value(&orders, range);

    Ok(Json(TotalSalesResponse { total_sales: total }))
}

/// GET /average-sales - daily income summary over the window
pub async fn average_sales(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Json<AverageSalesResponse>> {
    let range = params.require_range()?;
    tracing::debug!(%restaurant_id, start = %range.start, end = %range.end, "average sales");

    let orders = state.dataset.order_lines()?;
    let summary = queries::income_summary(&orders, range)?;

    Ok(Json(AverageSalesResponse {
        percentage_change: 0.0,
        total_income: summary.total_income,
        average_daily_income: summary.average_daily_income,
        highest_daily_income: summary.highest_daily_income,
        income_per_day: summary
            .income_per_day
            .into_iter()
            .map(|day| DailyIncomeEntry {
                date: day.date,
                income: day.income,
            })
            .collect(),
    }))
}

/// GET /top-by-units - up to three best-selling dishes by unit count
pub async fn top_by_units(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Json<TopByUnitsResponse>> {
    let range = params.require_range()?;
    tracing::debug!(%restaurant_id, start = %range.start, end = %range.end, "top dishes by units");

    let orders = state.dataset.order_lines()?;
    let tops = queries::top_dishes_by_units(&orders, range);

    Ok(Json(TopByUnitsResponse {
        tops: tops
            .into_iter()
            .map(|dish| TopDishEntry {
                product_id: dish.dish_id,
                count: dish.count,
                percentage: dish.percentage,
            })
            .collect(),
    }))
}

/// GET /total-sales-count - per-day order line counts
pub async fn total_sales_count(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Json<SalesCountResponse>> {
    let range = params.require_range()?;
    tracing::debug!(%restaurant_id, start = %range.start, end = %range.end, "daily sales count");

    let orders = state.dataset.order_lines()?;
    let counts = queries::daily_order_counts(&orders, range);

    Ok(Json(SalesCountResponse {
        count_per_day: counts
            .into_iter()
            .map(|day| DailyCountEntry {
                date: day.date,
                amount: day.amount,
            })
            .collect(),
    }))
}

/// GET /most-frequent-dish-topping - the single top (dish, topping) pair
pub async fn most_frequent_dish_topping(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Json<DishToppingResponse>> {
    let range = params.require_range()?;
    tracing::debug!(%restaurant_id, start = %range.start, end = %range.end, "most frequent dish/topping");

    let orders = state.dataset.order_lines()?;
    let toppings = state.dataset.topping_lines()?;
    let best = queries::most_frequent_dish_topping(&toppings, &orders, range)?;

    Ok(Json(DishToppingResponse {
        dish_topping: DishToppingEntry {
            dish_id: best.dish_id,
            topping_id: best.topping_id,
            count: best.count,
        },
    }))
}

/// GET /top-toppings - most used toppings, optionally windowed
pub async fn top_toppings(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(params): Query<ToppingsQuery>,
) -> AppResult<Json<TopToppingsResponse>> {
    let range = params.optional_range()?;
    let limit = params.parse_limit()?;
    tracing::debug!(%restaurant_id, windowed = range.is_some(), limit, "top toppings");

    let orders = state.dataset.order_lines()?;
    let toppings = state.dataset.topping_lines()?;
    let tops = queries::top_toppings(&toppings, &orders, range, limit);

    Ok(Json(TopToppingsResponse {
        toppings: tops
            .into_iter()
            .map(|topping| ToppingEntry {
                topping_id: topping.topping_id,
                count: topping.count,
            })
            .collect(),
    }))
}
