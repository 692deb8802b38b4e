//! Aggregations over sales records: monthly totals and per-product rankings.
//!
//! Every per-product computation keeps products in the order they were first encountered, so ties
//! always resolve in favor of the product that appeared first in the input.

use crate::model::{Amount, SaleRecord};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Cumulative units sold for one product.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub product: String,
    pub quantity: u64,
}

/// Cumulative revenue for one product.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: Amount,
}

/// Everything the sales report prints.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub record_count: usize,
    pub grand_total: Amount,
    pub monthly: BTreeMap<String, Amount>,
    pub most_sold: Option<ProductQuantity>,
    pub top_revenue: Option<ProductRevenue>,
    pub top_products: Vec<ProductRevenue>,
}

/// Sums record totals by `YYYY-MM`. Lexicographic key order is chronological order.
pub fn monthly_totals(records: &[SaleRecord]) -> Result<BTreeMap<String, Amount>> {
    let mut months: BTreeMap<String, Amount> = BTreeMap::new();
    for record in records {
        let month = months.entry(record.month_key()).or_default();
        *month = month
            .checked_add(record.total())
            .with_context(|| format!("Sales for {} are too large to add up", record.month_key()))?;
    }
    Ok(months)
}

/// The product with the most units sold, or `None` when there are no records.
pub fn most_sold_product(records: &[SaleRecord]) -> Result<Option<ProductQuantity>> {
    let quantities = accumulate(records, |r| u64::from(r.quantity()), u64::checked_add)?;
    Ok(first_max(quantities).map(|(product, quantity)| ProductQuantity { product, quantity }))
}

/// The product with the highest cumulative revenue, or `None` when there are no records.
pub fn top_revenue_product(records: &[SaleRecord]) -> Result<Option<ProductRevenue>> {
    Ok(first_max(revenue_by_product(records)?)
        .map(|(product, revenue)| ProductRevenue { product, revenue }))
}

/// Products ranked by revenue, highest first, truncated to `n`.
pub fn top_products(records: &[SaleRecord], n: usize) -> Result<Vec<ProductRevenue>> {
    let mut ranked: Vec<ProductRevenue> = revenue_by_product(records)?
        .into_iter()
        .map(|(product, revenue)| ProductRevenue { product, revenue })
        .collect();
    // sort_by is stable, equal revenues keep encounter order
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(n);
    Ok(ranked)
}

/// Runs every aggregation used by the report. Fails when a sum does not fit in an `Amount`.
pub fn summarize(records: &[SaleRecord], top_n: usize) -> Result<SalesSummary> {
    let grand_total = Amount::checked_sum(records.iter().map(SaleRecord::total))
        .context("The grand total of the sales is too large to add up")?;
    Ok(SalesSummary {
        record_count: records.len(),
        grand_total,
        monthly: monthly_totals(records)?,
        most_sold: most_sold_product(records)?,
        top_revenue: top_revenue_product(records)?,
        top_products: top_products(records, top_n)?,
    })
}

fn revenue_by_product(records: &[SaleRecord]) -> Result<Vec<(String, Amount)>> {
    accumulate(records, SaleRecord::total, |a, b| a.checked_add(b))
}

/// Groups by product name and sums `value` with `add`, preserving first-encounter order.
fn accumulate<T, F, A>(records: &[SaleRecord], value: F, add: A) -> Result<Vec<(String, T)>>
where
    T: Default + Copy,
    F: Fn(&SaleRecord) -> T,
    A: Fn(T, T) -> Option<T>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, T)> = Vec::new();
    for record in records {
        let ix = *index.entry(record.product()).or_insert_with(|| {
            totals.push((record.product().to_string(), T::default()));
            totals.len() - 1
        });
        totals[ix].1 = add(totals[ix].1, value(record))
            .with_context(|| format!("Sales of {} are too large to add up", record.product()))?;
    }
    Ok(totals)
}

/// Returns the first entry holding the maximum value.
fn first_max<T: Ord>(entries: Vec<(String, T)>) -> Option<(String, T)> {
    let mut best: Option<(String, T)> = None;
    for entry in entries {
        let better = match &best {
            Some((_, value)) => entry.1 > *value,
            None => true,
        };
        if better {
            best = Some(entry);
        }
    }
    best
}
