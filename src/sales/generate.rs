//! Writes a synthetic sales file so the report can be tried without real data.

use crate::model::{Amount, CsvSaleRow, SaleRecord};
use crate::{utils, Result};
use anyhow::Context;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::path::Path;

/// Seed used by `handy sales generate` so that the sample file is reproducible.
pub const DEFAULT_SEED: u64 = 42;

pub const DEFAULT_RECORDS: usize = 200;

const PRODUCTS: [&str; 15] = [
    "Laptop",
    "Mouse",
    "Teclado",
    "Monitor",
    "Auriculares",
    "Webcam",
    "Tablet",
    "Smartphone",
    "Impresora",
    "Router",
    "Disco Duro",
    "Memoria RAM",
    "Procesador",
    "Tarjeta Gráfica",
    "Fuente de Poder",
];

/// Produces `count` random sales spread over 2024, sorted by date.
pub fn sample_records(count: usize, seed: u64) -> Result<Vec<SaleRecord>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("Invalid start date")?;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        // 2024 is a leap year, offsets 0..=365 stay inside it
        let date = start + Days::new(rng.gen_range(0..=365));
        let product = *PRODUCTS.choose(&mut rng).context("Empty product list")?;
        let quantity = rng.gen_range(1..=10);
        let (low, high) = price_band_cents(product);
        let price = Amount::new(Decimal::new(rng.gen_range(low..=high), 2));
        records.push(SaleRecord::new(date, product, quantity, price)?);
    }
    records.sort_by_key(SaleRecord::date);
    Ok(records)
}

/// Writes `records` as a sales CSV with the standard header.
pub async fn write_csv(path: &Path, records: &[SaleRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for record in records {
        wtr.serialize(CsvSaleRow::from(record))
            .context("Unable to serialize sales row")?;
    }
    let data = wtr.into_inner().context("Unable to finish writing CSV data")?;
    utils::write(path, data).await
}

fn price_band_cents(product: &str) -> (i64, i64) {
    match product {
        "Laptop" | "Smartphone" | "Tablet" => (20_000, 150_000),
        "Monitor" | "Impresora" => (10_000, 50_000),
        _ => (1_000, 15_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::ingest;

    #[test]
    fn test_sample_is_reproducible_and_sorted() {
        let a = sample_records(50, 7).unwrap();
        let b = sample_records(50, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.windows(2).all(|w| w[0].date() <= w[1].date()));
        assert!(a.iter().all(|r| r.date().format("%Y").to_string() == "2024"));
        assert!(a.iter().all(|r| (1..=10).contains(&r.quantity())));
    }

    #[test]
    fn test_price_bands() {
        for record in sample_records(200, DEFAULT_SEED).unwrap() {
            let (low, high) = price_band_cents(record.product());
            let cents = record.price().value() * Decimal::from(100);
            assert!(cents >= Decimal::from(low) && cents <= Decimal::from(high));
        }
    }

    #[tokio::test]
    async fn test_written_file_loads_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ventas.csv");
        let records = sample_records(20, DEFAULT_SEED).unwrap();
        write_csv(&path, &records).await.unwrap();

        let content = utils::read(&path).await.unwrap();
        assert!(content.starts_with("fecha,producto,cantidad,precio\n"));

        let report = ingest::load(&path).await.unwrap();
        assert!(report.skipped().is_empty());
        assert_eq!(report.records(), records.as_slice());
    }
}
