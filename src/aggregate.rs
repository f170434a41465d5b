//! Report reducers
//!
//! Nine independent reducers over the immutable sales relation. Each one is a
//! pure group-by/aggregate/rename/sort chain; none depends on another, so the
//! registry hands every reducer its own lazy clone of the same frame.
//!
//! Output column names (including their inconsistent capitalization) are part
//! of the report contract and must not be normalized.
//!
//! Sort order is descending by the measure; ties break by the group key(s)
//! ascending with maintain_order set, so report output is deterministic.

use crate::schema::{
    CUST_ID, ORDER_MONTH, ORDER_QUARTER, ORDER_TYPE, ORDER_YEAR, PRICE, PROD_ID, PROD_NAME,
};
use polars::prelude::*;

pub const TOTAL_COST: &str = "Total Cost";
pub const YEARLY_SALES: &str = "YEARLY SALES";
pub const QUARTER_SALES: &str = "QUARTER SALES";
pub const MONTH_SALES: &str = "MONTH SALES";
pub const FREQ_PROD: &str = "FREQ_PROD";
pub const FREQ_CUST: &str = "FREQ_cust";
pub const FREQ_ORDER_TYPE: &str = "FREQ_ORDER_TYPE";

const TOP_PRODUCTS_LIMIT: u32 = 5;

/// A named report ready for a sink to collect and emit.
pub struct Report {
    pub name: &'static str,
    pub frame: LazyFrame,
}

/// Total spend per customer.
pub fn customer_spend(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[CUST_ID], TOTAL_COST)
}

/// Total spend per product.
pub fn category_spend(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[PROD_NAME], TOTAL_COST)
}

/// Revenue per calendar month (across years).
pub fn monthly_revenue(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[ORDER_MONTH], TOTAL_COST)
}

/// Revenue per year.
pub fn yearly_revenue(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[ORDER_YEAR], YEARLY_SALES)
}

/// Revenue per quarter (across years).
pub fn quarterly_sales(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[ORDER_QUARTER], QUARTER_SALES)
}

/// Revenue per (year, month) pair.
pub fn month_by_year_sales(sales: LazyFrame) -> LazyFrame {
    sum_of_price(sales, &[ORDER_YEAR, ORDER_MONTH], MONTH_SALES)
}

/// The five most frequently sold products.
pub fn top_products_by_freq(sales: LazyFrame) -> LazyFrame {
    count_of(sales, &[PROD_NAME], PROD_ID, FREQ_PROD).limit(TOP_PRODUCTS_LIMIT)
}

/// Purchase count per customer.
pub fn customer_frequency(sales: LazyFrame) -> LazyFrame {
    count_of(sales, &[CUST_ID], CUST_ID, FREQ_CUST)
}

/// Purchase count per order channel.
pub fn order_channel_frequency(sales: LazyFrame) -> LazyFrame {
    count_of(sales, &[ORDER_TYPE], ORDER_TYPE, FREQ_ORDER_TYPE)
}

/// Every report, in emission order.
pub fn reports(sales: LazyFrame) -> Vec<Report> {
    vec![
        Report { name: "customer_spend", frame: customer_spend(sales.clone()) },
        Report { name: "category_spend", frame: category_spend(sales.clone()) },
        Report { name: "monthly_revenue", frame: monthly_revenue(sales.clone()) },
        Report { name: "yearly_revenue", frame: yearly_revenue(sales.clone()) },
        Report { name: "quarterly_sales", frame: quarterly_sales(sales.clone()) },
        Report { name: "month_by_year_sales", frame: month_by_year_sales(sales.clone()) },
        Report { name: "top_products_by_freq", frame: top_products_by_freq(sales.clone()) },
        Report { name: "customer_frequency", frame: customer_frequency(sales.clone()) },
        Report { name: "order_channel_frequency", frame: order_channel_frequency(sales) },
    ]
}

fn sum_of_price(sales: LazyFrame, keys: &[&str], measure: &str) -> LazyFrame {
    let key_exprs: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let grouped = sales
        .group_by(key_exprs)
        .agg([col(PRICE).sum().alias(measure)]);
    sort_descending(grouped, measure, keys)
}

// COUNT(counted) per group: non-null count, SQL COUNT(col) semantics.
fn count_of(sales: LazyFrame, keys: &[&str], counted: &str, measure: &str) -> LazyFrame {
    let key_exprs: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let grouped = sales
        .group_by(key_exprs)
        .agg([col(counted).count().alias(measure)]);
    sort_descending(grouped, measure, keys)
}

fn sort_descending(report: LazyFrame, measure: &str, keys: &[&str]) -> LazyFrame {
    let mut by: Vec<Expr> = vec![col(measure)];
    by.extend(keys.iter().map(|k| col(*k)));

    let mut descending = vec![true];
    descending.extend(std::iter::repeat(false).take(keys.len()));

    report.sort_by_exprs(
        by,
        SortMultipleOptions::default()
            .with_order_descendings(descending)
            .with_maintain_order(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // A small denormalized sales frame: the join output shape the reducers see.
    fn sales() -> LazyFrame {
        df!(
            PROD_ID => [1i64, 1, 2, 2, 3, 1],
            CUST_ID => ["C1", "C1", "C2", "C1", "C3", "C2"],
            ORDER_TYPE => ["online", "online", "dine-in", "online", "dine-in", "online"],
            ORDER_YEAR => [2023i32, 2023, 2023, 2024, 2024, 2023],
            ORDER_MONTH => [1i32, 2, 1, 4, 7, 1],
            ORDER_QUARTER => [1i32, 1, 1, 2, 3, 1],
            PROD_NAME => ["Pizza", "Pizza", "Burger", "Burger", "Fries", "Pizza"],
            PRICE => [10.0, 10.0, 5.0, 5.0, 2.5, 10.0],
        )
        .unwrap()
        .lazy()
    }

    fn keys_of(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_customer_spend() {
        let df = customer_spend(sales()).collect().unwrap();

        assert_eq!(keys_of(&df, CUST_ID), vec!["C1", "C2", "C3"]);
        let totals = df.column(TOTAL_COST).unwrap().f64().unwrap();
        assert_eq!(totals.get(0), Some(25.0));
        assert_eq!(totals.get(1), Some(15.0));
        assert_eq!(totals.get(2), Some(2.5));
    }

    #[test]
    fn test_category_spend() {
        let df = category_spend(sales()).collect().unwrap();

        assert_eq!(keys_of(&df, PROD_NAME), vec!["Pizza", "Burger", "Fries"]);
        let totals = df.column(TOTAL_COST).unwrap().f64().unwrap();
        assert_eq!(totals.get(0), Some(30.0));
    }

    #[test]
    fn test_monthly_revenue() {
        let df = monthly_revenue(sales()).collect().unwrap();

        let months = df.column(ORDER_MONTH).unwrap().i32().unwrap();
        let totals = df.column(TOTAL_COST).unwrap().f64().unwrap();
        assert_eq!(months.get(0), Some(1));
        assert_eq!(totals.get(0), Some(25.0));
    }

    #[test]
    fn test_yearly_and_quarterly_column_names() {
        let yearly = yearly_revenue(sales()).collect().unwrap();
        assert!(yearly.column(YEARLY_SALES).is_ok());
        let years = yearly.column(ORDER_YEAR).unwrap().i32().unwrap();
        assert_eq!(years.get(0), Some(2023));

        let quarterly = quarterly_sales(sales()).collect().unwrap();
        assert!(quarterly.column(QUARTER_SALES).is_ok());
    }

    #[test]
    fn test_month_by_year_groups_on_both_keys() {
        let df = month_by_year_sales(sales()).collect().unwrap();

        // (2023,1)=25.0, (2023,2)=10.0, (2024,4)=5.0, (2024,7)=2.5
        assert_eq!(df.height(), 4);
        let totals = df.column(MONTH_SALES).unwrap().f64().unwrap();
        assert_eq!(totals.get(0), Some(25.0));
        let years = df.column(ORDER_YEAR).unwrap().i32().unwrap();
        let months = df.column(ORDER_MONTH).unwrap().i32().unwrap();
        assert_eq!((years.get(0), months.get(0)), (Some(2023), Some(1)));
    }

    #[test]
    fn test_top_products_limit() {
        let many = df!(
            PROD_ID => [1i64, 2, 3, 4, 5, 6, 1],
            CUST_ID => ["C1"; 7],
            ORDER_TYPE => ["online"; 7],
            ORDER_YEAR => [2023i32; 7],
            ORDER_MONTH => [1i32; 7],
            ORDER_QUARTER => [1i32; 7],
            PROD_NAME => ["A", "B", "C", "D", "E", "F", "A"],
            PRICE => [1.0; 7],
        )
        .unwrap()
        .lazy();

        let df = top_products_by_freq(many).collect().unwrap();
        assert_eq!(df.height(), 5);
        // "A" appears twice, every other product once: it must survive the cut.
        let freqs = df.column(FREQ_PROD).unwrap().u32().unwrap();
        assert_eq!(freqs.get(0), Some(2));
        assert_eq!(keys_of(&df, PROD_NAME)[0], "A");
    }

    #[test]
    fn test_frequency_reports() {
        let cust = customer_frequency(sales()).collect().unwrap();
        let freqs = cust.column(FREQ_CUST).unwrap().u32().unwrap();
        assert_eq!(keys_of(&cust, CUST_ID), vec!["C1", "C2", "C3"]);
        assert_eq!(freqs.get(0), Some(3));

        let channel = order_channel_frequency(sales()).collect().unwrap();
        let freqs = channel.column(FREQ_ORDER_TYPE).unwrap().u32().unwrap();
        assert_eq!(keys_of(&channel, ORDER_TYPE), vec!["online", "dine-in"]);
        assert_eq!(freqs.get(0), Some(4));
        assert_eq!(freqs.get(1), Some(2));
    }

    #[test]
    fn test_ties_break_by_key_ascending() {
        let tied = df!(
            PROD_ID => [1i64, 2],
            CUST_ID => ["C2", "C1"],
            ORDER_TYPE => ["online", "online"],
            ORDER_YEAR => [2023i32, 2023],
            ORDER_MONTH => [1i32, 1],
            ORDER_QUARTER => [1i32, 1],
            PROD_NAME => ["Pizza", "Burger"],
            PRICE => [5.0, 5.0],
        )
        .unwrap()
        .lazy();

        let df = customer_spend(tied).collect().unwrap();
        assert_eq!(keys_of(&df, CUST_ID), vec!["C1", "C2"]);
    }

    #[test]
    fn test_all_reports_sorted_non_increasing() {
        for report in reports(sales()) {
            let df = report.frame.collect().unwrap();
            let measure = df.get_columns().last().unwrap().clone();
            let values: Vec<f64> = (0..df.height())
                .map(|idx| {
                    measure
                        .cast(&DataType::Float64)
                        .unwrap()
                        .f64()
                        .unwrap()
                        .get(idx)
                        .unwrap()
                })
                .collect();
            for pair in values.windows(2) {
                assert!(pair[0] >= pair[1], "{} is not sorted", report.name);
            }
        }
    }

    #[test]
    fn test_sums_match_naive_recomputation() {
        let sales_df = sales().collect().unwrap();
        let report = customer_spend(sales_df.clone().lazy()).collect().unwrap();

        let customers = report.column(CUST_ID).unwrap().str().unwrap();
        let totals = report.column(TOTAL_COST).unwrap().f64().unwrap();
        for idx in 0..report.height() {
            let customer = customers.get(idx).unwrap();
            let expected: f64 = sales_df
                .column(CUST_ID)
                .unwrap()
                .str()
                .unwrap()
                .into_iter()
                .zip(sales_df.column(PRICE).unwrap().f64().unwrap().into_iter())
                .filter(|(c, _)| c.as_deref() == Some(customer))
                .filter_map(|(_, p)| p)
                .sum();
            assert_eq!(totals.get(idx), Some(expected));
        }
    }
}
