//! CSV-backed sales dataset
//!
//! [`DatasetService`] serves immutable snapshots of the two sales tables and
//! reloads a table only when its backing file changed.

pub mod loader;
pub mod models;
pub mod service;

pub use models::{OrderLine, ToppingLine};
pub use service::{DISHES_TABLE, DatasetService, TOPPINGS_TABLE};
