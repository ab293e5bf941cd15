//! CSV table loading
//!
//! A load either succeeds for the whole file or fails for the whole file;
//! a bad row never silently disappears from the aggregates.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::utils::{AppError, AppResult};

/// Read a whole CSV table into memory
///
/// Columns are matched by header name, so column order does not matter and
/// unknown columns are ignored. Missing columns, malformed rows and
/// unparseable date cells all fail the load with a dataset error.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let file = File::open(path)
        .map_err(|e| AppError::dataset(format!("failed to open {}: {}", path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        // The csv error display already carries the record/line position
        let row: T = record
            .map_err(|e| AppError::dataset(format!("failed to parse {}: {}", path.display(), e)))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::models::{OrderLine, ToppingLine};
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_order_lines() {
        let file = write_table(
            "order_item_id,dish_id,date,price\n\
             1,42,2023-01-15,12.50\n\
             2,43,2023-01-16 12:00:00,8.00\n",
        );
        let rows: Vec<OrderLine> = load_table(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].price, 8.00);
    }

    #[test]
    fn test_load_topping_lines() {
        let file = write_table("order_item_id,topping_id\n1,9\n1,11\n2,9\n");
        let rows: Vec<ToppingLine> = load_table(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_table::<OrderLine>(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
        assert!(err.to_string().contains("not/here.csv"));
    }

    #[test]
    fn test_load_missing_column_fails_whole_load() {
        let file = write_table("order_item_id,dish_id,date\n1,42,2023-01-15\n");
        let err = load_table::<OrderLine>(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_load_bad_row_fails_whole_load() {
        let file = write_table(
            "order_item_id,dish_id,date,price\n\
             1,42,2023-01-15,12.50\n\
             2,43,not-a-date,8.00\n",
        );
        let err = load_table::<OrderLine>(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_load_headers_only_is_empty_not_an_error() {
        let file = write_table("order_item_id,dish_id,date,price\n");
        let rows: Vec<OrderLine> = load_table(file.path()).unwrap();
        assert!(rows.is_empty());
    }
}
