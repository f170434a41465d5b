//! Input relation schemas
//!
//! The two input files are headerless, so column order here must match the
//! field order in the files. All fields are nullable: a cell that fails to
//! coerce loads as null instead of rejecting the row.

use polars::prelude::*;

// Shared join key. Canonical type is Int64 on both sides; a product row whose
// key cell is not an integer loads as null and can never match.
pub const PROD_ID: &str = "PROD_ID";

// Product columns
pub const PROD_NAME: &str = "PROD_NAME";
pub const PRICE: &str = "PRICE";

// Order columns
pub const CUST_ID: &str = "CUST_ID";
pub const ORDER_DATE: &str = "ORDER_DATE";
pub const LOCATION: &str = "LOCATION";
pub const ORDER_TYPE: &str = "ORDER_TYPE";

// Calendar columns derived from ORDER_DATE
pub const ORDER_YEAR: &str = "ORDER_YEAR";
pub const ORDER_MONTH: &str = "ORDER_MONTH";
pub const ORDER_QUARTER: &str = "ORDER_QUARTER";

/// Every column the reducers reference. The pipeline checks the joined sales
/// frame against this list before aggregating.
pub const SALES_COLUMNS: [&str; 8] = [
    PROD_ID,
    CUST_ID,
    ORDER_TYPE,
    ORDER_YEAR,
    ORDER_MONTH,
    ORDER_QUARTER,
    PROD_NAME,
    PRICE,
];

/// Schema of the product catalog file: PROD_ID, PROD_NAME, PRICE.
///
/// PRICE is text in the source file; the loader casts it to Float64 before
/// anything aggregates over it.
pub fn product_schema() -> Schema {
    Schema::from_iter([
        Field::new(PROD_ID, DataType::Int64),
        Field::new(PROD_NAME, DataType::String),
        Field::new(PRICE, DataType::String),
    ])
}

/// Schema of the order file: PROD_ID, CUST_ID, ORDER_DATE, LOCATION, ORDER_TYPE.
pub fn order_schema() -> Schema {
    Schema::from_iter([
        Field::new(PROD_ID, DataType::Int64),
        Field::new(CUST_ID, DataType::String),
        Field::new(ORDER_DATE, DataType::Date),
        Field::new(LOCATION, DataType::String),
        Field::new(ORDER_TYPE, DataType::String),
    ])
}
