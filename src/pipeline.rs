//! Pipeline orchestration
//!
//! The pipeline object is the explicitly constructed execution context: built
//! once from config, passed a sink, no ambient state. Data flows strictly
//! forward (load -> enrich -> join -> aggregate -> emit) and every stage is a
//! pure function of its inputs, so a rerun over the same files reproduces the
//! same reports.

use crate::aggregate;
use crate::config::PipelineConfig;
use crate::enrich;
use crate::error::{AnalyticsError, Result};
use crate::join;
use crate::loader;
use crate::schema::SALES_COLUMNS;
use crate::sink::ReportSink;
use itertools::Itertools;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Row accounting for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub products_loaded: usize,
    pub orders_loaded: usize,
    pub sales_rows: usize,
    pub orders_without_product: usize,
    pub products_without_order: usize,
    pub reports_emitted: usize,
}

pub struct SalesPipeline {
    config: PipelineConfig,
}

impl SalesPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline, emitting every report through `sink`.
    pub fn run(&self, sink: &mut dyn ReportSink) -> Result<RunSummary> {
        let separator = self.config.separator_byte()?;

        info!("loading product catalog from {}", self.config.product_path.display());
        let products = loader::load_products(&self.config.product_path, separator)?.collect()?;
        info!("loading orders from {}", self.config.orders_path.display());
        let orders = loader::load_orders(&self.config.orders_path, separator)?.collect()?;

        debug!("product preview:\n{}", products.head(Some(5)));
        debug!("order preview:\n{}", orders.head(Some(5)));

        let gaps = join::referential_gaps(&orders, &products)?;
        if gaps.orders_without_product > 0 {
            warn!(
                "{} order rows reference no product and are dropped by the inner join",
                gaps.orders_without_product
            );
        }
        if gaps.products_without_order > 0 {
            warn!(
                "{} product rows are never referenced by an order",
                gaps.products_without_order
            );
        }

        let enriched = enrich::enrich_orders(orders.clone().lazy());
        let sales = join::join_sales(enriched, products.clone().lazy()).collect()?;
        info!("sales relation has {} rows", sales.height());
        ensure_sales_columns(&sales)?;

        let sales_rows = sales.height();
        let mut reports_emitted = 0;
        for report in aggregate::reports(sales.lazy()) {
            let frame = report.frame.collect()?;
            sink.emit(report.name, &frame)?;
            reports_emitted += 1;
        }

        Ok(RunSummary {
            products_loaded: products.height(),
            orders_loaded: orders.height(),
            sales_rows,
            orders_without_product: gaps.orders_without_product,
            products_without_order: gaps.products_without_order,
            reports_emitted,
        })
    }
}

// The reducers address columns by name; catch a malformed join before the
// first group-by does.
fn ensure_sales_columns(sales: &DataFrame) -> Result<()> {
    let missing: Vec<&str> = SALES_COLUMNS
        .iter()
        .copied()
        .filter(|column| sales.column(column).is_err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalyticsError::Transform(format!(
            "sales relation is missing column(s): {}",
            missing.iter().join(", ")
        )))
    }
}
