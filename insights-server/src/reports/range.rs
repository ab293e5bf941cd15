//! Inclusive date windows over order lines

use chrono::NaiveDate;

use crate::dataset::OrderLine;

/// Inclusive calendar date window
///
/// A reversed window (`start > end`) contains nothing; filtering with one
/// yields an empty set, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Keep only the order lines whose date falls inside the window
pub fn filter_by_date<'a>(rows: &'a [OrderLine], range: DateRange) -> Vec<&'a OrderLine> {
    rows.iter().filter(|row| range.contains(row.date)).collect()
}
