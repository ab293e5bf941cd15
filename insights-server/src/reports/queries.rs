//! Aggregation queries over the sales tables
//!
//! Every query is a pure function of (table snapshot, window). Monetary
//! sums accumulate in `Decimal` and get rounded to 2 decimals at the
//! boundary. Grouping keeps first-seen table order, so count ties resolve
//! to the row that appears first in the source file.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::range::{DateRange, filter_by_date};
use super::types::{ComboCount, DailyCount, DailyIncome, DishUnits, IncomeSummary, ToppingCount};
use crate::dataset::{OrderLine, ToppingLine};
use crate::utils::money::{percentage, to_decimal, to_f64};
use crate::utils::{AppError, AppResult};

/// Number of entries returned by [`top_dishes_by_units`]
const TOP_DISHES: usize = 3;

/// Default number of entries returned by [`top_toppings`]
pub const DEFAULT_TOPPING_LIMIT: usize = 3;

/// Total sales value over the window
///
/// An empty window totals 0.0; this query never fails on empty input.
pub fn total_sales_value(rows: &[OrderLine], range: DateRange) -> f64 {
    let total: Decimal = rows
        .iter()
        .filter(|row| range.contains(row.date))
        .map(|row| to_decimal(row.price))
        .sum();
    to_f64(total)
}

/// Daily income summary over the window
///
/// Per-day income is grouped by calendar date, ascending. The average is the
/// mean over the days present in the window; absent days are not
/// zero-filled. An empty window has no mean or maximum, so it is a defined
/// failure rather than a crash.
pub fn income_summary(rows: &[OrderLine], range: DateRange) -> AppResult<IncomeSummary> {
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for row in rows.iter().filter(|row| range.contains(row.date)) {
        *per_day.entry(row.date).or_insert(Decimal::ZERO) += to_decimal(row.price);
    }

    if per_day.is_empty() {
        return Err(AppError::empty_range(format!(
            "no order lines between {} and {}",
            range.start, range.end
        )));
    }

    let total: Decimal = per_day.values().copied().sum();
    let average = total / Decimal::from(per_day.len() as u64);
    let highest = per_day.values().copied().max().unwrap_or(Decimal::ZERO);

    Ok(IncomeSummary {
        total_income: to_f64(total),
        average_daily_income: to_f64(average),
        highest_daily_income: to_f64(highest),
        income_per_day: per_day
            .into_iter()
            .map(|(date, income)| DailyIncome {
                date,
                income: to_f64(income),
            })
            .collect(),
    })
}

/// Top dishes by unit count, with each dish's share of all in-window lines
///
/// Returns at most three entries, count descending. The share denominator is
/// the number of in-window order lines (not just lines of the top dishes);
/// with no in-window lines there is nothing to rank and no division happens.
pub fn top_dishes_by_units(rows: &[OrderLine], range: DateRange) -> Vec<DishUnits> {
    let in_range = filter_by_date(rows, range);
    let total = in_range.len() as u64;

    let mut counts: IndexMap<i64, u64> = IndexMap::new();
    for row in &in_range {
        *counts.entry(row.dish_id).or_insert(0) += 1;
    }

    let mut entries: Vec<(i64, u64)> = counts.into_iter().collect();
    // Stable sort: ties keep first-seen order
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(TOP_DISHES);

    entries
        .into_iter()
        .map(|(dish_id, count)| DishUnits {
            dish_id,
            count,
            percentage: percentage(Decimal::from(count), Decimal::from(total)),
        })
        .collect()
}

/// Order line count per day, date ascending
pub fn daily_order_counts(rows: &[OrderLine], range: DateRange) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in rows.iter().filter(|row| range.contains(row.date)) {
        *per_day.entry(row.date).or_insert(0) += 1;
    }
    per_day
        .into_iter()
        .map(|(date, amount)| DailyCount { date, amount })
        .collect()
}

/// Left-join topping lines to their order lines on `order_item_id`
///
/// A topping row with no matching order line has no date, so any window
/// filter drops it silently.
fn joined_toppings<'a>(
    toppings: &'a [ToppingLine],
    orders: &'a [OrderLine],
) -> impl Iterator<Item = (&'a ToppingLine, &'a OrderLine)> {
    let by_item: HashMap<i64, &OrderLine> =
        orders.iter().map(|o| (o.order_item_id, o)).collect();
    toppings
        .iter()
        .filter_map(move |t| by_item.get(&t.order_item_id).map(|o| (t, *o)))
}

/// The single most frequent (dish, topping) combination in the window
///
/// On count ties the first-occurring combination wins (strict `>` during the
/// scan over first-seen groups). No combinations in the window is a defined
/// failure.
pub fn most_frequent_dish_topping(
    toppings: &[ToppingLine],
    orders: &[OrderLine],
    range: DateRange,
) -> AppResult<ComboCount> {
    let mut counts: IndexMap<(i64, i64), u64> = IndexMap::new();
    for (topping, order) in joined_toppings(toppings, orders) {
        if range.contains(order.date) {
            *counts
                .entry((order.dish_id, topping.topping_id))
                .or_insert(0) += 1;
        }
    }

    let mut best: Option<ComboCount> = None;
    for ((dish_id, topping_id), count) in counts {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(ComboCount {
                dish_id,
                topping_id,
                count,
            });
        }
    }

    best.ok_or_else(|| {
        AppError::empty_range(format!(
            "no dish/topping combinations between {} and {}",
            range.start, range.end
        ))
    })
}

/// Most used toppings, count descending, truncated to `limit`
///
/// The window is optional. Without one, every topping row counts, matched to
/// an order line or not; with one, only topping rows whose order line falls
/// inside the window count. Ties keep first-seen order.
pub fn top_toppings(
    toppings: &[ToppingLine],
    orders: &[OrderLine],
    range: Option<DateRange>,
    limit: usize,
) -> Vec<ToppingCount> {
    let mut counts: IndexMap<i64, u64> = IndexMap::new();
    match range {
        Some(range) => {
            for (topping, order) in joined_toppings(toppings, orders) {
                if range.contains(order.date) {
                    *counts.entry(topping.topping_id).or_insert(0) += 1;
                }
            }
        }
        None => {
            for topping in toppings {
                *counts.entry(topping.topping_id).or_insert(0) += 1;
            }
        }
    }

    let mut entries: Vec<(i64, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);

    entries
        .into_iter()
        .map(|(topping_id, count)| ToppingCount { topping_id, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    fn line(order_item_id: i64, dish_id: i64, date: NaiveDate, price: f64) -> OrderLine {
        OrderLine {
            order_item_id,
            dish_id,
            date,
            price,
        }
    }

    fn topping(order_item_id: i64, topping_id: i64) -> ToppingLine {
        ToppingLine {
            order_item_id,
            topping_id,
        }
    }

    fn january() -> DateRange {
        DateRange::new(d(1), d(31))
    }

    // ========== total_sales_value ==========

    #[test]
    fn test_total_sales_value() {
        let rows = vec![
            line(1, 100, d(1), 10.00),
            line(2, 101, d(1), 5.00),
            line(3, 100, d(2), 20.00),
        ];
        assert_eq!(total_sales_value(&rows, DateRange::new(d(1), d(2))), 35.00);
    }

    #[test]
    fn test_total_sales_value_excludes_out_of_window_rows() {
        let rows = vec![
            line(1, 100, d(1), 10.00),
            line(2, 100, d(15), 99.00),
            line(3, 100, d(31), 1.00),
        ];
        assert_eq!(total_sales_value(&rows, DateRange::new(d(10), d(20))), 99.00);
    }

    #[test]
    fn test_total_sales_value_empty_window_is_zero() {
        let rows = vec![line(1, 100, d(1), 10.00)];
        assert_eq!(total_sales_value(&rows, DateRange::new(d(10), d(20))), 0.0);
    }

    #[test]
    fn test_total_sales_value_reversed_window_is_zero() {
        let rows = vec![line(1, 100, d(15), 10.00)];
        assert_eq!(total_sales_value(&rows, DateRange::new(d(20), d(10))), 0.0);
    }

    #[test]
    fn test_total_sales_value_sums_in_decimal() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        let rows = vec![line(1, 100, d(1), 0.1), line(2, 100, d(1), 0.2)];
        assert_eq!(total_sales_value(&rows, january()), 0.3);
    }

    #[test]
    fn test_total_sales_value_negative_prices_pass_through() {
        let rows = vec![line(1, 100, d(1), 10.00), line(2, 100, d(1), -2.50)];
        assert_eq!(total_sales_value(&rows, january()), 7.50);
    }

    // ========== income_summary ==========

    #[test]
    fn test_income_summary() {
        let rows = vec![
            line(1, 100, d(1), 10.00),
            line(2, 101, d(1), 5.00),
            line(3, 100, d(2), 20.00),
        ];
        let summary = income_summary(&rows, DateRange::new(d(1), d(2))).unwrap();

        assert_eq!(summary.total_income, 35.00);
        assert_eq!(summary.average_daily_income, 17.50);
        assert_eq!(summary.highest_daily_income, 20.00);
        assert_eq!(
            summary.income_per_day,
            vec![
                DailyIncome {
                    date: d(1),
                    income: 15.00
                },
                DailyIncome {
                    date: d(2),
                    income: 20.00
                },
            ]
        );
    }

    #[test]
    fn test_income_summary_mean_skips_absent_days() {
        // Days 1 and 10 have sales; the window covers 31 days but the mean
        // divides by the 2 days present
        let rows = vec![line(1, 100, d(1), 10.00), line(2, 100, d(10), 20.00)];
        let summary = income_summary(&rows, january()).unwrap();
        assert_eq!(summary.average_daily_income, 15.00);
    }

    #[test]
    fn test_income_summary_single_day() {
        let rows = vec![line(1, 100, d(5), 12.34)];
        let summary = income_summary(&rows, january()).unwrap();
        assert_eq!(summary.total_income, 12.34);
        assert_eq!(summary.average_daily_income, 12.34);
        assert_eq!(summary.highest_daily_income, 12.34);
    }

    #[test]
    fn test_income_summary_days_are_ascending() {
        let rows = vec![
            line(1, 100, d(20), 1.00),
            line(2, 100, d(3), 2.00),
            line(3, 100, d(11), 3.00),
        ];
        let summary = income_summary(&rows, january()).unwrap();
        let dates: Vec<NaiveDate> = summary.income_per_day.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(3), d(11), d(20)]);
    }

    #[test]
    fn test_income_summary_rounds_at_the_boundary() {
        // Per-day sums stay unrounded until output: 3 * 0.335 = 1.005 -> 1.01
        let rows = vec![
            line(1, 100, d(1), 0.335),
            line(2, 100, d(1), 0.335),
            line(3, 100, d(1), 0.335),
        ];
        let summary = income_summary(&rows, january()).unwrap();
        assert_eq!(summary.income_per_day[0].income, 1.01);
        assert_eq!(summary.total_income, 1.01);
    }

    #[test]
    fn test_income_summary_empty_window_fails() {
        let rows = vec![line(1, 100, d(1), 10.00)];
        let err = income_summary(&rows, DateRange::new(d(10), d(20))).unwrap_err();
        assert!(matches!(err, AppError::EmptyRange(_)));
    }

    #[test]
    fn test_income_summary_reversed_window_fails_like_empty() {
        let rows = vec![line(1, 100, d(15), 10.00)];
        let err = income_summary(&rows, DateRange::new(d(20), d(10))).unwrap_err();
        assert!(matches!(err, AppError::EmptyRange(_)));
    }

    // ========== top_dishes_by_units ==========

    #[test]
    fn test_top_dishes_by_units() {
        let rows = vec![
            line(1, 7, d(1), 25.00),
            line(2, 7, d(2), 25.00),
            line(3, 7, d(3), 25.00),
            line(4, 8, d(3), 25.00),
        ];
        let tops = top_dishes_by_units(&rows, january());
        assert_eq!(
            tops,
            vec![
                DishUnits {
                    dish_id: 7,
                    count: 3,
                    percentage: 75.00
                },
                DishUnits {
                    dish_id: 8,
                    count: 1,
                    percentage: 25.00
                },
            ]
        );
    }

    #[test]
    fn test_top_dishes_truncates_to_three() {
        let rows = vec![
            line(1, 1, d(1), 1.0),
            line(2, 1, d(1), 1.0),
            line(3, 1, d(1), 1.0),
            line(4, 1, d(1), 1.0),
            line(5, 2, d(1), 1.0),
            line(6, 2, d(1), 1.0),
            line(7, 2, d(1), 1.0),
            line(8, 3, d(1), 1.0),
            line(9, 3, d(1), 1.0),
            line(10, 4, d(1), 1.0),
        ];
        let tops = top_dishes_by_units(&rows, january());
        assert_eq!(tops.len(), 3);
        assert_eq!(tops[0].dish_id, 1);
        assert_eq!(tops[1].dish_id, 2);
        assert_eq!(tops[2].dish_id, 3);
        // Denominator is all 10 in-window lines, not just the top three
        assert_eq!(tops[0].percentage, 40.00);
        assert_eq!(tops[1].percentage, 30.00);
        assert_eq!(tops[2].percentage, 20.00);
    }

    #[test]
    fn test_top_dishes_tie_keeps_first_seen_order() {
        // Dishes 9 and 5 both count 2; 9 appears first in the table
        let rows = vec![
            line(1, 9, d(1), 1.0),
            line(2, 5, d(1), 1.0),
            line(3, 5, d(2), 1.0),
            line(4, 9, d(2), 1.0),
        ];
        let tops = top_dishes_by_units(&rows, january());
        assert_eq!(tops[0].dish_id, 9);
        assert_eq!(tops[1].dish_id, 5);
    }

    #[test]
    fn test_top_dishes_empty_window_is_empty_not_a_crash() {
        let rows = vec![line(1, 7, d(1), 25.00)];
        let tops = top_dishes_by_units(&rows, DateRange::new(d(10), d(20)));
        assert!(tops.is_empty());
    }

    #[test]
    fn test_top_dishes_percentage_thirds_round_to_two_decimals() {
        let rows = vec![
            line(1, 1, d(1), 1.0),
            line(2, 1, d(1), 1.0),
            line(3, 2, d(1), 1.0),
        ];
        let tops = top_dishes_by_units(&rows, january());
        assert_eq!(tops[0].percentage, 66.67);
        assert_eq!(tops[1].percentage, 33.33);
    }

    // ========== daily_order_counts ==========

    #[test]
    fn test_daily_order_counts() {
        let rows = vec![
            line(1, 1, d(2), 1.0),
            line(2, 2, d(1), 1.0),
            line(3, 3, d(2), 1.0),
            line(4, 4, d(2), 1.0),
        ];
        let counts = daily_order_counts(&rows, january());
        assert_eq!(
            counts,
            vec![
                DailyCount {
                    date: d(1),
                    amount: 1
                },
                DailyCount {
                    date: d(2),
                    amount: 3
                },
            ]
        );
    }

    #[test]
    fn test_daily_order_counts_sum_equals_filtered_rows() {
        let rows = vec![
            line(1, 1, d(1), 1.0),
            line(2, 2, d(2), 1.0),
            line(3, 3, d(15), 1.0),
            line(4, 4, d(30), 1.0),
        ];
        let range = DateRange::new(d(1), d(15));
        let counts = daily_order_counts(&rows, range);
        let total: u64 = counts.iter().map(|c| c.amount).sum();
        assert_eq!(total, filter_by_date(&rows, range).len() as u64);
    }

    #[test]
    fn test_daily_order_counts_empty_window() {
        let rows = vec![line(1, 1, d(1), 1.0)];
        assert!(daily_order_counts(&rows, DateRange::new(d(10), d(20))).is_empty());
    }

    // ========== most_frequent_dish_topping ==========

    #[test]
    fn test_most_frequent_dish_topping() {
        let orders = vec![
            line(1, 100, d(1), 10.0),
            line(2, 100, d(2), 10.0),
            line(3, 200, d(3), 10.0),
        ];
        let toppings = vec![
            topping(1, 5),
            topping(2, 5),
            topping(3, 5),
            topping(1, 6),
        ];
        let best = most_frequent_dish_topping(&toppings, &orders, january()).unwrap();
        assert_eq!(
            best,
            ComboCount {
                dish_id: 100,
                topping_id: 5,
                count: 2
            }
        );
    }

    #[test]
    fn test_most_frequent_dish_topping_tie_takes_first_occurring() {
        let orders = vec![line(1, 100, d(1), 10.0), line(2, 200, d(1), 10.0)];
        // (100,5) and (200,6) both count 1; (100,5) occurs first
        let toppings = vec![topping(1, 5), topping(2, 6)];
        let best = most_frequent_dish_topping(&toppings, &orders, january()).unwrap();
        assert_eq!(best.dish_id, 100);
        assert_eq!(best.topping_id, 5);
    }

    #[test]
    fn test_most_frequent_dish_topping_window_filters_by_order_date() {
        let orders = vec![line(1, 100, d(1), 10.0), line(2, 200, d(20), 10.0)];
        let toppings = vec![
            topping(1, 5),
            topping(2, 6),
            topping(2, 6),
        ];
        let best =
            most_frequent_dish_topping(&toppings, &orders, DateRange::new(d(1), d(10))).unwrap();
        // The dish 200 rows fall outside the window despite the higher count
        assert_eq!(best.dish_id, 100);
        assert_eq!(best.count, 1);
    }

    #[test]
    fn test_most_frequent_dish_topping_unmatched_toppings_are_dropped() {
        let orders = vec![line(1, 100, d(1), 10.0)];
        // order_item_id 99 has no order line: no date, silently excluded
        let toppings = vec![topping(1, 5), topping(99, 6), topping(99, 6)];
        let best = most_frequent_dish_topping(&toppings, &orders, january()).unwrap();
        assert_eq!(best.topping_id, 5);
    }

    #[test]
    fn test_most_frequent_dish_topping_empty_window_fails() {
        let orders = vec![line(1, 100, d(1), 10.0)];
        let toppings = vec![topping(1, 5)];
        let err =
            most_frequent_dish_topping(&toppings, &orders, DateRange::new(d(10), d(20)))
                .unwrap_err();
        assert!(matches!(err, AppError::EmptyRange(_)));
    }

    #[test]
    fn test_most_frequent_dish_topping_no_toppings_at_all_fails() {
        let orders = vec![line(1, 100, d(1), 10.0)];
        let err = most_frequent_dish_topping(&[], &orders, january()).unwrap_err();
        assert!(matches!(err, AppError::EmptyRange(_)));
    }

    // ========== top_toppings ==========

    #[test]
    fn test_top_toppings_without_window_counts_every_row() {
        let orders = vec![line(1, 100, d(1), 10.0)];
        // Topping 6 rows have no matching order line but still count when
        // no window is given
        let toppings = vec![
            topping(1, 5),
            topping(99, 6),
            topping(99, 6),
            topping(1, 7),
        ];
        let tops = top_toppings(&toppings, &orders, None, DEFAULT_TOPPING_LIMIT);
        assert_eq!(
            tops,
            vec![
                ToppingCount {
                    topping_id: 6,
                    count: 2
                },
                ToppingCount {
                    topping_id: 5,
                    count: 1
                },
                ToppingCount {
                    topping_id: 7,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_toppings_with_window_drops_unmatched_and_out_of_window() {
        let orders = vec![line(1, 100, d(1), 10.0), line(2, 100, d(20), 10.0)];
        let toppings = vec![
            topping(1, 5),
            topping(2, 6),
            topping(99, 7),
        ];
        let tops = top_toppings(
            &toppings,
            &orders,
            Some(DateRange::new(d(1), d(10))),
            DEFAULT_TOPPING_LIMIT,
        );
        assert_eq!(
            tops,
            vec![ToppingCount {
                topping_id: 5,
                count: 1
            }]
        );
    }

    #[test]
    fn test_top_toppings_truncates_to_limit() {
        let toppings = vec![
            topping(1, 1),
            topping(1, 1),
            topping(1, 2),
            topping(1, 2),
            topping(1, 3),
            topping(1, 4),
        ];
        let tops = top_toppings(&toppings, &[], None, 2);
        assert_eq!(tops.len(), 2);
        assert_eq!(tops[0].topping_id, 1);
        assert_eq!(tops[1].topping_id, 2);
    }

    #[test]
    fn test_top_toppings_tie_keeps_first_seen_order() {
        let toppings = vec![topping(1, 9), topping(1, 4), topping(1, 4), topping(1, 9)];
        let tops = top_toppings(&toppings, &[], None, DEFAULT_TOPPING_LIMIT);
        assert_eq!(tops[0].topping_id, 9);
        assert_eq!(tops[1].topping_id, 4);
    }

    #[test]
    fn test_top_toppings_zero_limit_is_empty() {
        let toppings = vec![topping(1, 9)];
        assert!(top_toppings(&toppings, &[], None, 0).is_empty());
    }
}
