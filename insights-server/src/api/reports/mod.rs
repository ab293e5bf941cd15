//! Sales reports API 模块 (销售报表)
//!
//! 所有路由挂在 `/api/restaurants/{restaurant_id}` 下并要求 Basic 认证
//! (认证由路由器级别的 `require_auth` 中间件强制)。
//! `restaurant_id` 只被记录，不参与过滤 (单租户数据集)。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants/{restaurant_id}", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/total-sales-value", get(handler::total_sales_value))
        .route("/average-sales", get(handler::average_sales))
        .route("/top-by-units", get(handler::top_by_units))
        .route("/total-sales-count", get(handler::total_sales_count))
        .route(
            "/most-frequent-dish-topping",
            get(handler::most_frequent_dish_topping),
        )
        .route("/top-toppings", get(handler::top_toppings))
}
