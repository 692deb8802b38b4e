use crate::model::Amount;
use crate::Result;
use anyhow::{ensure, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date format used by the `fecha` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of a sales CSV file exactly as it appears on disk.
///
/// ```text
/// fecha,producto,cantidad,precio
/// 2024-01-03,Laptop,2,899.99
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CsvSaleRow {
    pub fecha: String,
    pub producto: String,
    pub cantidad: String,
    pub precio: String,
}

/// A validated sale. `total` is always `quantity × price`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    date: NaiveDate,
    product: String,
    quantity: u32,
    price: Amount,
    total: Amount,
}

impl SaleRecord {
    /// Creates a record, computing its total. A negative price is rejected, and so is a total too
    /// large to represent.
    pub fn new(date: NaiveDate, product: impl Into<String>, quantity: u32, price: Amount) -> Result<Self> {
        ensure!(!price.is_negative(), "Price cannot be negative: {price}");
        let total = price
            .checked_times(quantity)
            .with_context(|| format!("Total of {quantity} × {} is too large", price.value()))?;
        Ok(Self {
            date,
            product: product.into(),
            quantity,
            price,
            total,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// The `YYYY-MM` bucket this sale falls into.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl TryFrom<CsvSaleRow> for SaleRecord {
    type Error = anyhow::Error;

    fn try_from(row: CsvSaleRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(row.fecha.trim(), DATE_FORMAT)
            .with_context(|| format!("Invalid fecha '{}', expected YYYY-MM-DD", row.fecha))?;
        let product = row.producto.trim();
        ensure!(!product.is_empty(), "Missing producto");
        let quantity: u32 = row
            .cantidad
            .trim()
            .parse()
            .with_context(|| format!("Invalid cantidad '{}'", row.cantidad))?;
        let price: Amount = row
            .precio
            .parse()
            .with_context(|| format!("Invalid precio '{}'", row.precio))?;
        SaleRecord::new(date, product, quantity, price)
    }
}

impl From<&SaleRecord> for CsvSaleRow {
    fn from(record: &SaleRecord) -> Self {
        Self {
            fecha: record.date.format(DATE_FORMAT).to_string(),
            producto: record.product.clone(),
            cantidad: record.quantity.to_string(),
            precio: record.price.value().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(fecha: &str, producto: &str, cantidad: &str, precio: &str) -> CsvSaleRow {
        CsvSaleRow {
            fecha: fecha.into(),
            producto: producto.into(),
            cantidad: cantidad.into(),
            precio: precio.into(),
        }
    }

    #[test]
    fn test_total_is_quantity_times_price() {
        let record = SaleRecord::try_from(row("2024-03-09", "Mouse", "3", "12.50")).unwrap();
        assert_eq!(record.total(), Amount::from_str("37.50").unwrap());
        assert_eq!(record.month_key(), "2024-03");
        assert_eq!(record.product(), "Mouse");
    }

    #[test]
    fn test_zero_quantity_is_allowed() {
        let record = SaleRecord::try_from(row("2024-03-09", "Mouse", "0", "12.50")).unwrap();
        assert!(record.total().is_zero());
    }

    #[test]
    fn test_bad_rows() {
        assert!(SaleRecord::try_from(row("09/03/2024", "Mouse", "1", "1")).is_err());
        assert!(SaleRecord::try_from(row("2024-03-09", "  ", "1", "1")).is_err());
        assert!(SaleRecord::try_from(row("2024-03-09", "Mouse", "-1", "1")).is_err());
        assert!(SaleRecord::try_from(row("2024-03-09", "Mouse", "1.5", "1")).is_err());
        assert!(SaleRecord::try_from(row("2024-03-09", "Mouse", "1", "-3")).is_err());
        assert!(SaleRecord::try_from(row("2024-03-09", "Mouse", "1", "abc")).is_err());
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let max = "79228162514264337593543950335";
        let err = SaleRecord::try_from(row("2024-01-02", "B", "2", max)).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err:#}");
        let record = SaleRecord::try_from(row("2024-01-02", "B", "1", max)).unwrap();
        assert_eq!(record.total().value().to_string(), max);
    }

    #[test]
    fn test_csv_row_from_record() {
        let record = SaleRecord::try_from(row("2024-11-30", "Router", "4", "49.9")).unwrap();
        let back = CsvSaleRow::from(&record);
        assert_eq!(back, row("2024-11-30", "Router", "4", "49.9"));
    }
}
