//! Order x Product join
//!
//! The sales relation is an inner equi-join on PROD_ID: rows from either side
//! without a matching key are excluded, and a non-unique PROD_ID in the
//! product catalog fans out into one sales row per matching pair. The drop is
//! silent in the data; `referential_gaps` gives the pipeline the counts to log.

use crate::error::Result;
use crate::schema::PROD_ID;
use polars::prelude::*;

/// Denormalize orders against the product catalog. Orders with a null or
/// unknown PROD_ID are dropped here and in every downstream report.
pub fn join_sales(orders: LazyFrame, products: LazyFrame) -> LazyFrame {
    orders.join(
        products,
        [col(PROD_ID)],
        [col(PROD_ID)],
        JoinArgs::new(JoinType::Inner),
    )
}

/// Rows lost to the inner join, on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferentialGaps {
    pub orders_without_product: usize,
    pub products_without_order: usize,
}

/// Count order rows whose PROD_ID has no product, and product rows whose
/// PROD_ID never appears in an order. Joins against deduplicated key sets so
/// fan-out cannot inflate the counts; null keys never match and so are
/// counted as gaps.
pub fn referential_gaps(orders: &DataFrame, products: &DataFrame) -> Result<ReferentialGaps> {
    let matched_orders = semi_count(orders, products)?;
    let matched_products = semi_count(products, orders)?;

    Ok(ReferentialGaps {
        orders_without_product: orders.height() - matched_orders,
        products_without_order: products.height() - matched_products,
    })
}

// Rows of `left` whose PROD_ID exists in `right`.
fn semi_count(left: &DataFrame, right: &DataFrame) -> Result<usize> {
    let right_keys = right
        .clone()
        .lazy()
        .select([col(PROD_ID)])
        .drop_nulls(None)
        .unique(None, UniqueKeepStrategy::Any);

    let matched = left
        .clone()
        .lazy()
        .join(
            right_keys,
            [col(PROD_ID)],
            [col(PROD_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    Ok(matched.height())
}
