//! Renders the sales charts as SVG files using `plotters`.

use crate::model::Amount;
use crate::sales::ProductRevenue;
use crate::Result;
use anyhow::Context;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the monthly bar chart.
pub const MONTHLY_CHART: &str = "ventas_por_mes.svg";

/// File name of the top products chart.
pub const TOP_PRODUCTS_CHART: &str = "top_productos.svg";

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const CORAL: RGBColor = RGBColor(255, 127, 80);

/// Draws a vertical bar per month. `monthly` must not be empty.
pub fn monthly_chart(path: &Path, monthly: &BTreeMap<String, Amount>) -> Result<()> {
    let labels: Vec<&str> = monthly.keys().map(String::as_str).collect();
    let values: Vec<f64> = monthly.values().map(Amount::to_f64).collect();
    draw_monthly(path, &labels, &values)
        .with_context(|| format!("Unable to draw the monthly chart at {}", path.display()))
}

/// Draws a horizontal bar per product with its revenue printed next to the bar. `top` must not be
/// empty.
pub fn top_products_chart(path: &Path, top: &[ProductRevenue]) -> Result<()> {
    let labels: Vec<&str> = top.iter().map(|p| p.product.as_str()).collect();
    let values: Vec<f64> = top.iter().map(|p| p.revenue.to_f64()).collect();
    let texts: Vec<String> = top.iter().map(|p| format!(" {}", p.revenue)).collect();
    draw_top_products(path, &labels, &values, &texts)
        .with_context(|| format!("Unable to draw the top products chart at {}", path.display()))
}

fn draw_monthly(path: &Path, labels: &[&str], values: &[f64]) -> Result<()> {
    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let label_fmt = |v: &SegmentValue<usize>| segment_label(v, labels);
    let money_fmt = |v: &f64| format!("${v:.0}");

    let mut chart = ChartBuilder::on(&root)
        .caption("Ventas Totales por Mes", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..axis_max(values))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len() + 1)
        .x_label_formatter(&label_fmt)
        .y_label_formatter(&money_fmt)
        .x_desc("Mes (YYYY-MM)")
        .y_desc("Ventas Totales ($)")
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
            STEEL_BLUE.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_top_products(path: &Path, labels: &[&str], values: &[f64], texts: &[String]) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let label_fmt = |v: &SegmentValue<usize>| segment_label(v, labels);
    let money_fmt = |v: &f64| format!("${v:.0}");
    let title = format!("Top {} Productos por Ingresos", labels.len());

    // Leave room to the right of the longest bar for its value label.
    let x_max = axis_max(values) * 1.15;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..x_max, (0..labels.len()).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len() + 1)
        .y_label_formatter(&label_fmt)
        .x_label_formatter(&money_fmt)
        .x_desc("Ingresos Totales ($)")
        .y_desc("Producto")
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Rectangle::new(
            [(0.0, SegmentValue::Exact(i)), (*v, SegmentValue::Exact(i + 1))],
            CORAL.filled(),
        )
    }))?;

    chart.draw_series(values.iter().zip(texts).enumerate().map(|(i, (v, text))| {
        Text::new(
            text.clone(),
            (*v, SegmentValue::CenterOf(i)),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn segment_label(v: &SegmentValue<usize>, labels: &[&str]) -> String {
    match v {
        SegmentValue::CenterOf(i) => labels.get(*i).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Upper bound for a value axis, with some headroom above the tallest bar.
fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(0.0, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_monthly_chart_writes_svg() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(MONTHLY_CHART);
        let mut monthly = BTreeMap::new();
        monthly.insert("2024-01".to_string(), amt("25"));
        monthly.insert("2024-02".to_string(), amt("10"));
        monthly_chart(&path, &monthly).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ventas Totales por Mes"));
    }

    #[test]
    fn test_top_products_chart_writes_svg() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(TOP_PRODUCTS_CHART);
        let top = vec![
            ProductRevenue {
                product: "Laptop".to_string(),
                revenue: amt("1500"),
            },
            ProductRevenue {
                product: "Mouse".to_string(),
                revenue: amt("30"),
            },
        ];
        top_products_chart(&path, &top).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Top 2 Productos por Ingresos"));
        assert!(svg.contains("$1,500.00"));
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(&[]), 1.0);
        assert_eq!(axis_max(&[0.0]), 1.0);
        assert!((axis_max(&[10.0, 20.0]) - 22.0).abs() < 1e-9);
    }
}
