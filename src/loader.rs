//! Relation loader
//!
//! Reads a headerless delimited file into a typed LazyFrame using an explicit
//! schema. Coercion policy is null-and-continue: a cell that fails to parse to
//! its declared type becomes null rather than rejecting the row. Rows with the
//! wrong field count are padded with nulls (short rows) or truncated (long
//! rows); a raw preflight pass counts them so they are not silently invisible.

use crate::error::{AnalyticsError, Result};
use crate::schema::{self, PRICE};
use itertools::Itertools;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Raw shape of an input file before typed parsing.
#[derive(Debug, Clone, Copy)]
pub struct RawFileStats {
    pub rows: usize,
    pub ragged_rows: usize,
}

/// Scan one relation with the given schema. The file is headerless, so schema
/// field order is the file column order.
pub fn load_relation(path: &Path, relation_schema: Schema, separator: u8) -> Result<LazyFrame> {
    if !path.exists() {
        return Err(AnalyticsError::Load(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let stats = preflight(path, relation_schema.len(), separator)?;
    if stats.ragged_rows > 0 {
        warn!(
            "{}: {} of {} rows do not have {} fields ({}); short rows are padded with nulls, long rows truncated",
            path.display(),
            stats.ragged_rows,
            stats.rows,
            relation_schema.len(),
            relation_schema.iter_names().join(", ")
        );
    }
    debug!("{}: {} raw rows", path.display(), stats.rows);

    let lf = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_separator(separator)
        .with_schema(Some(Arc::new(relation_schema)))
        .with_ignore_errors(true)
        .with_truncate_ragged_lines(true)
        .finish()?;

    Ok(lf)
}

/// Load the product catalog. PRICE arrives as text and is cast to Float64
/// here, before anything aggregates over it; unparseable prices become null.
pub fn load_products(path: &Path, separator: u8) -> Result<LazyFrame> {
    let lf = load_relation(path, schema::product_schema(), separator)?;
    Ok(lf.with_column(col(PRICE).cast(DataType::Float64)))
}

/// Load the order log.
pub fn load_orders(path: &Path, separator: u8) -> Result<LazyFrame> {
    load_relation(path, schema::order_schema(), separator)
}

/// Count rows and rows whose field count differs from the schema, without
/// typed parsing. Uses a flexible reader so ragged rows are observed rather
/// than rejected.
fn preflight(path: &Path, expected_fields: usize, separator: u8) -> Result<RawFileStats> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator)
        .from_path(path)
        .map_err(|e| AnalyticsError::Load(format!("cannot open {}: {}", path.display(), e)))?;

    let mut rows = 0usize;
    let mut ragged_rows = 0usize;
    for record in reader.records() {
        let record = record
            .map_err(|e| AnalyticsError::Load(format!("cannot read {}: {}", path.display(), e)))?;
        rows += 1;
        if record.len() != expected_fields {
            ragged_rows += 1;
        }
    }

    Ok(RawFileStats { rows, ragged_rows })
}
