use crate::args::{GenerateArgs, SalesArgs};
use crate::commands::Out;
use crate::sales::{self, SalesSummary};
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Structured output of `handy sales`.
#[derive(Debug, Clone, Serialize)]
pub struct SalesOut {
    pub summary: SalesSummary,
    pub skipped: Vec<String>,
    pub charts: Vec<PathBuf>,
}

/// Loads the sales file, prints the summary and writes the two charts. With no usable records the
/// summary says so and no charts are drawn.
pub async fn sales(config: &Config, args: &SalesArgs) -> Result<Out<SalesOut>> {
    let report = sales::load(args.file()).await?;
    let skipped = report.skipped().to_vec();
    let records = report.into_records();
    let top_n = args.top().unwrap_or_else(|| config.top_products());
    let summary = sales::summarize(&records, top_n)
        .with_context(|| format!("Unable to summarize {}", args.file().display()))?;

    let out_dir = match args.out() {
        Some(dir) => dir.to_path_buf(),
        None => config
            .sales_output_dir()
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let mut charts = Vec::new();
    if summary.monthly.is_empty() {
        warn!("No sales data, skipping the charts");
    } else {
        utils::make_dir(&out_dir).await?;
        let monthly_path = out_dir.join(sales::MONTHLY_CHART);
        sales::monthly_chart(&monthly_path, &summary.monthly)?;
        info!("Saved {}", monthly_path.display());
        charts.push(monthly_path);

        let top_path = out_dir.join(sales::TOP_PRODUCTS_CHART);
        sales::top_products_chart(&top_path, &summary.top_products)?;
        info!("Saved {}", top_path.display());
        charts.push(top_path);
    }

    let message = render_summary(&summary, skipped.len());
    Ok(Out::new(
        message,
        SalesOut {
            summary,
            skipped,
            charts,
        },
    ))
}

/// Writes a synthetic sales file that `handy sales` can read.
pub async fn sales_generate(args: &GenerateArgs) -> Result<Out<()>> {
    let records = sales::sample_records(args.records(), args.seed())?;
    sales::write_csv(args.file(), &records).await?;
    Ok(format!(
        "Wrote {} sales records to {}",
        records.len(),
        args.file().display()
    )
    .into())
}

fn render_summary(summary: &SalesSummary, skipped: usize) -> String {
    let mut lines = vec![
        "=== RESUMEN DE VENTAS ===".to_string(),
        format!("Registros: {} ({skipped} omitidos)", summary.record_count),
    ];
    if summary.record_count == 0 {
        lines.push("No hay datos de ventas.".to_string());
        return lines.join("\n");
    }
    lines.push(format!("Total: {}", summary.grand_total));
    if let Some(most_sold) = &summary.most_sold {
        lines.push(format!(
            "Producto más vendido: {} ({} unidades)",
            most_sold.product, most_sold.quantity
        ));
    }
    if let Some(top) = &summary.top_revenue {
        lines.push(format!("Producto con más ingresos: {} ({})", top.product, top.revenue));
    }
    lines.push("\nVentas por mes:".to_string());
    for (month, total) in &summary.monthly {
        lines.push(format!("  {month}  {total:>14}"));
    }
    lines.push(format!("\nTop {} productos por ingresos:", summary.top_products.len()));
    for (i, p) in summary.top_products.iter().enumerate() {
        lines.push(format!("  {}. {:<20} {:>14}", i + 1, p.product, p.revenue));
    }
    lines.join("\n")
}
