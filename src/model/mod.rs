//! Types that represent the core data model, such as `SaleRecord` and `Task`.
mod amount;
mod sale;
mod task;

pub use amount::{Amount, AmountError};
pub use sale::{CsvSaleRow, SaleRecord, DATE_FORMAT};
pub use task::{Task, TaskList};
