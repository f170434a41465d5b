//! Batch sales analytics for restaurant order data.
//!
//! Joins an order log with a product catalog and produces nine aggregate
//! reports (spend, revenue and purchase-frequency breakdowns). One linear
//! pass: schema -> load -> enrich -> join -> aggregate -> emit.

pub mod aggregate;
pub mod config;
pub mod enrich;
pub mod error;
pub mod join;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod sink;
