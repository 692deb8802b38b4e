//! Sales analysis: CSV ingestion, aggregation and chart rendering.

mod aggregate;
mod chart;
mod generate;
mod ingest;

pub use aggregate::{
    monthly_totals, most_sold_product, summarize, top_products, top_revenue_product,
    ProductQuantity, ProductRevenue, SalesSummary,
};
pub use chart::{monthly_chart, top_products_chart, MONTHLY_CHART, TOP_PRODUCTS_CHART};
pub use generate::{sample_records, write_csv, DEFAULT_RECORDS, DEFAULT_SEED};
pub use ingest::{load, parse, LoadReport, REQUIRED_COLUMNS};
