//! Calendar enrichment
//!
//! Derives ORDER_YEAR, ORDER_MONTH (1-12) and ORDER_QUARTER (1-4) from
//! ORDER_DATE. Row-local and deterministic; a null ORDER_DATE propagates null
//! to all three derived columns.

use crate::schema::{ORDER_DATE, ORDER_MONTH, ORDER_QUARTER, ORDER_YEAR};
use polars::prelude::*;

pub fn enrich_orders(orders: LazyFrame) -> LazyFrame {
    orders.with_columns([
        col(ORDER_DATE).dt().year().cast(DataType::Int32).alias(ORDER_YEAR),
        col(ORDER_DATE).dt().month().cast(DataType::Int32).alias(ORDER_MONTH),
        col(ORDER_DATE).dt().quarter().cast(DataType::Int32).alias(ORDER_QUARTER),
    ])
}
