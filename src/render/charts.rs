//! Chart rendering with `plotters`.
//!
//! Two figures: the combined analysis image (monthly revenue bars above a
//! category pie) and the forecast scatter with its fitted line. Backends
//! are flushed with `present` only after every draw call succeeded, so a
//! failed render never leaves a partial image behind.

use std::path::Path;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

use super::ensure_parent;
use crate::domain::ReportError;
use crate::services::report_service::ReportSummary;
use crate::services::trend_service::{TrendModel, TrendPoint};

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

const PIE_COLORS: [RGBColor; 6] = [
    RGBColor(102, 153, 204),
    RGBColor(240, 163, 82),
    RGBColor(122, 184, 122),
    RGBColor(205, 97, 85),
    RGBColor(155, 126, 189),
    RGBColor(212, 188, 96),
];

fn render_error<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Unexpected(format!("chart rendering failed: {}", e))
}

/// Render the combined monthly-bar + category-pie figure.
pub fn render_analysis_chart(summary: &ReportSummary, path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;

    let root = BitMapBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;
    let (upper, lower) = root.split_vertically(500);

    draw_monthly_bars(&upper, &summary.monthly_totals)?;
    draw_category_pie(&lower, &summary.category_totals)?;

    root.present().map_err(render_error)?;
    Ok(())
}

fn draw_monthly_bars(
    area: &DrawingArea<BitMapBackend, Shift>,
    monthly: &[(String, f64)],
) -> Result<(), ReportError> {
    let y_max = monthly
        .iter()
        .map(|(_, total)| *total)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Chiffre d'affaires mensuel (2024 - FCFA)", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d((0..monthly.len()).into_segmented(), 0f64..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Montant (FCFA)")
        .x_labels(monthly.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => monthly
                .get(*i)
                .map(|(month, _)| month.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(monthly.iter().enumerate().map(|(i, (_, total))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), *total),
                ],
                BAR_COLOR.filled(),
            )
        }))
        .map_err(render_error)?;

    Ok(())
}

fn draw_category_pie(
    area: &DrawingArea<BitMapBackend, Shift>,
    categories: &[(String, f64)],
) -> Result<(), ReportError> {
    let area = area
        .titled("Répartition du CA par catégorie (FCFA)", ("sans-serif", 28))
        .map_err(render_error)?;

    let dims = area.dim_in_pixel();
    let center = ((dims.0 / 2) as i32, (dims.1 / 2) as i32);
    let radius = f64::from(dims.0.min(dims.1)) * 0.35;

    // Each slice is labeled with the absolute total; plotters adds the
    // percentage inside the slice.
    let sizes: Vec<f64> = categories.iter().map(|(_, total)| *total).collect();
    let labels: Vec<String> = categories
        .iter()
        .map(|(name, total)| format!("{} ({:.0} FCFA)", name, total))
        .collect();
    let colors: Vec<RGBColor> = (0..categories.len())
        .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(("sans-serif", 20).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 18).into_font().color(&BLACK));

    area.draw(&pie).map_err(render_error)?;
    Ok(())
}

/// Render the forecast figure: every sample as a scatter point plus the
/// fitted line across the whole day-of-year domain.
pub fn render_forecast_chart(
    points: &[TrendPoint],
    model: &TrendModel,
    path: &Path,
) -> Result<(), ReportError> {
    ensure_parent(path)?;

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let y_max = points
        .iter()
        .map(|p| p.amount_fcfa)
        .chain([model.predict(1.0), model.predict(366.0)])
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Prévision du chiffre d'affaires annuel", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(0f64..367f64, 0f64..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Jour de l'année")
        .y_desc("Montant (FCFA)")
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(points.iter().map(|p| {
            Circle::new(
                (f64::from(p.day_of_year), p.amount_fcfa),
                3,
                BLUE.mix(0.3).filled(),
            )
        }))
        .map_err(render_error)?
        .label("Données réelles")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(
            (1..=366).map(|d| (f64::from(d), model.predict(f64::from(d)))),
            RED.stroke_width(2),
        ))
        .map_err(render_error)?
        .label("Prédiction")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}
