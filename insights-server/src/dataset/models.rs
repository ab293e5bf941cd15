//! Row models for the sales tables
//!
//! Structs map CSV columns by header name; columns the queries never touch
//! (menu number, category, ...) are simply not declared and get skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::utils::time::parse_date_cell;

/// One dish order line (a row of `dishes.csv`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    /// Unique per order line; correlates topping rows
    pub order_item_id: i64,
    /// Dish/product sold
    pub dish_id: i64,
    /// Calendar date of the sale (time-of-day discarded at load)
    #[serde(deserialize_with = "de_calendar_date")]
    pub date: NaiveDate,
    /// Monetary amount; not validated, negative values pass through
    pub price: f64,
}

/// One topping line (a row of `dishes_toppings.csv`)
///
/// `order_item_id` is a foreign key into [`OrderLine`]; one order line may
/// carry any number of topping rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToppingLine {
    pub order_item_id: i64,
    pub topping_id: i64,
}

/// Deserialize a date or datetime cell down to its calendar date
fn de_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_cell(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable date {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_order_lines(data: &str) -> Result<Vec<OrderLine>, csv::Error> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        reader.deserialize().collect()
    }

    #[test]
    fn test_order_line_from_csv() {
        let data = "order_item_id,dish_id,date,price\n1,42,2023-01-15,12.50\n";
        let rows = read_order_lines(data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_item_id, 1);
        assert_eq!(rows[0].dish_id, 42);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(rows[0].price, 12.50);
    }

    #[test]
    fn test_order_line_datetime_cell_truncates() {
        let data = "order_item_id,dish_id,date,price\n1,42,2023-01-15 19:30:00,12.50\n";
        let rows = read_order_lines(data).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_order_line_extra_columns_ignored() {
        let data = "order_item_id,dish_id,menu_number,date,price,category\n1,42,7,2023-01-15,12.50,starters\n";
        let rows = read_order_lines(data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dish_id, 42);
    }

    #[test]
    fn test_order_line_bad_date_is_an_error() {
        let data = "order_item_id,dish_id,date,price\n1,42,someday,12.50\n";
        assert!(read_order_lines(data).is_err());
    }

    #[test]
    fn test_order_line_missing_column_is_an_error() {
        let data = "order_item_id,dish_id,date\n1,42,2023-01-15\n";
        assert!(read_order_lines(data).is_err());
    }

    #[test]
    fn test_topping_line_from_csv() {
        let data = "order_item_id,topping_id\n1,9\n1,11\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<ToppingLine> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topping_id, 9);
        assert_eq!(rows[1].topping_id, 11);
    }
}
