use anyhow::Result;
use clap::Parser;
use sales_insights::config::PipelineConfig;
use sales_insights::pipeline::SalesPipeline;
use sales_insights::sink::{ConsoleSink, CsvDirSink, NullSink, ReportSink};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sales-insights")]
#[command(about = "Sales analytics reports for restaurant order data")]
struct Args {
    /// Path to the product catalog file (headerless delimited text)
    #[arg(short, long)]
    products: Option<PathBuf>,

    /// Path to the order file (headerless delimited text)
    #[arg(short = 'r', long)]
    orders: Option<PathBuf>,

    /// JSON config file; individual flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write reports as CSV files into this directory instead of stdout
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Field separator used by both input files
    #[arg(short, long)]
    separator: Option<char>,

    /// Compute the reports but do not print them
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(products) = args.products {
        config.product_path = products;
    }
    if let Some(orders) = args.orders {
        config.orders_path = orders;
    }
    if let Some(separator) = args.separator {
        config.separator = separator;
    }
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir;
    }

    info!("starting sales analytics run");
    let pipeline = SalesPipeline::new(config.clone());

    let mut sink: Box<dyn ReportSink> = match (&config.output_dir, args.quiet) {
        (Some(dir), _) => Box::new(CsvDirSink::new(dir.clone())),
        (None, false) => Box::new(ConsoleSink),
        (None, true) => Box::new(NullSink),
    };
    let summary = pipeline.run(sink.as_mut())?;
    info!("run complete: {:?}", summary);

    println!("\n=== Run Summary ===");
    println!("products loaded:         {}", summary.products_loaded);
    println!("orders loaded:           {}", summary.orders_loaded);
    println!("sales rows:              {}", summary.sales_rows);
    println!("orders without product:  {}", summary.orders_without_product);
    println!("products without order:  {}", summary.products_without_order);
    println!("reports emitted:         {}", summary.reports_emitted);

    Ok(())
}
