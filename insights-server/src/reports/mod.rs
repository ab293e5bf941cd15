//! Sales report core
//!
//! Date-window filtering plus the aggregation queries the API serves. All
//! functions here are synchronous and side-effect free; the API layer owns
//! parameter parsing and response shaping.

pub mod queries;
pub mod range;
pub mod types;

pub use queries::DEFAULT_TOPPING_LIMIT;
pub use range::{DateRange, filter_by_date};
pub use types::{ComboCount, DailyCount, DailyIncome, DishUnits, IncomeSummary, ToppingCount};
