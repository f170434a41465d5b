//! Report sinks
//!
//! The pipeline computes report tables and hands them to a sink once each;
//! how they are rendered or stored is the sink's concern.

use crate::error::{AnalyticsError, Result};
use polars::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub trait ReportSink {
    fn emit(&mut self, name: &str, report: &DataFrame) -> Result<()>;
}

/// Pretty-prints every report to stdout.
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&mut self, name: &str, report: &DataFrame) -> Result<()> {
        println!("\n=== {} ===", name);
        println!("{}", report);
        Ok(())
    }
}

/// Writes each report to `<out_dir>/<name>.csv`, with headers.
pub struct CsvDirSink {
    out_dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }
}

impl ReportSink for CsvDirSink {
    fn emit(&mut self, name: &str, report: &DataFrame) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.csv", name));
        let mut file = fs::File::create(&path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut report.clone())
            .map_err(|e| {
                AnalyticsError::Report(format!("failed to write {}: {}", path.display(), e))
            })?;
        debug!("wrote {} ({} rows) to {}", name, report.height(), path.display());
        Ok(())
    }
}

/// Collects reports in memory. Test support.
#[derive(Default)]
pub struct MemorySink {
    pub reports: Vec<(String, DataFrame)>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.reports
            .iter()
            .find(|(report_name, _)| report_name == name)
            .map(|(_, df)| df)
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, name: &str, report: &DataFrame) -> Result<()> {
        self.reports.push((name.to_string(), report.clone()));
        Ok(())
    }
}

/// Discards every report; computes the run for its summary and logs only.
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&mut self, _name: &str, _report: &DataFrame) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_dir_sink_writes_file() {
        let dir = std::env::temp_dir().join("sales_insights_sink_test");
        let _ = fs::remove_dir_all(&dir);

        let report = df!("CUST_ID" => ["C1"], "Total Cost" => [20.0]).unwrap();
        let mut sink = CsvDirSink::new(&dir);
        sink.emit("customer_spend", &report).unwrap();

        let written = fs::read_to_string(dir.join("customer_spend.csv")).unwrap();
        assert!(written.starts_with("CUST_ID,Total Cost"));
        assert!(written.contains("C1,20.0"));
    }

    #[test]
    fn test_memory_sink_keeps_order_and_lookup() {
        let report = df!("k" => [1i64]).unwrap();
        let mut sink = MemorySink::default();
        sink.emit("first", &report).unwrap();
        sink.emit("second", &report).unwrap();

        assert_eq!(sink.reports.len(), 2);
        assert_eq!(sink.reports[0].0, "first");
        assert!(sink.get("second").is_some());
        assert!(sink.get("missing").is_none());
    }
}
