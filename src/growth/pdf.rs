//! PDF growth chart — recorded measurements drawn over the WHO percentile
//! curves with `printpdf`.

use std::io::BufWriter;

use printpdf::*;

use crate::models::enums::Sex;

use super::reference::{anchor_table, Anchor, MAX_REFERENCE_MONTHS};
use super::{ChartError, GrowthSeries};

// A4 landscape page with the plot area inset for titles and axis labels.
const PAGE_W: f64 = 297.0;
const PAGE_H: f64 = 210.0;
const PLOT_LEFT: f64 = 35.0;
const PLOT_RIGHT: f64 = 278.0;
const PLOT_BOTTOM: f64 = 30.0;
const PLOT_TOP: f64 = 175.0;

const PERCENTILE_LABELS: [&str; 5] = ["P3", "P15", "P50", "P85", "P97"];

/// Render the series over its reference curves. Returns PDF bytes.
pub fn render_growth_pdf(series: &GrowthSeries) -> Result<Vec<u8>, ChartError> {
    let title = format!(
        "{} — {} (WHO 0-{} months, {})",
        series.measure.label(),
        series.child_name,
        MAX_REFERENCE_MONTHS,
        sex_word(series.sex),
    );

    let (doc, page1, layer1) =
        PdfDocument::new(&title, Mm(PAGE_W as f32), Mm(PAGE_H as f32), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ChartError::Pdf(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ChartError::Pdf(format!("PDF font error: {e}")))?;

    let table = anchor_table(series.sex, series.measure);
    let scale = ValueScale::for_chart(table, series);

    layer.use_text(&title, 14.0, Mm(PLOT_LEFT as f32), Mm(192.0), &bold);

    draw_frame_and_grid(&layer, &font, &scale);
    draw_percentile_curves(&layer, &font, table, &scale);
    draw_measurements(&layer, series, &scale);

    // Axis captions
    layer.use_text("Age (months)", 10.0, Mm(140.0), Mm(14.0), &font);
    layer.use_text(
        format!("{} ({})", series.measure.label(), series.measure.unit()),
        10.0,
        Mm(12.0),
        Mm(180.0),
        &font,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ChartError::Pdf(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ChartError::Pdf(format!("PDF buffer error: {e}")))
}

fn sex_word(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "boys",
        Sex::Female => "girls",
    }
}

/// Maps chart-space (months, value) to page millimetres.
struct ValueScale {
    value_min: f64,
    value_max: f64,
}

impl ValueScale {
    fn for_chart(table: &[Anchor], series: &GrowthSeries) -> Self {
        let mut value_min = table.iter().map(|a| a.p3).fold(f64::INFINITY, f64::min);
        let mut value_max = table.iter().map(|a| a.p97).fold(f64::NEG_INFINITY, f64::max);
        for point in &series.points {
            value_min = value_min.min(point.value);
            value_max = value_max.max(point.value);
        }
        let pad = (value_max - value_min) * 0.05;
        Self {
            value_min: value_min - pad,
            value_max: value_max + pad,
        }
    }

    fn x(&self, age_months: f64) -> f64 {
        let t = age_months / MAX_REFERENCE_MONTHS as f64;
        PLOT_LEFT + t * (PLOT_RIGHT - PLOT_LEFT)
    }

    fn y(&self, value: f64) -> f64 {
        let t = (value - self.value_min) / (self.value_max - self.value_min);
        PLOT_BOTTOM + t * (PLOT_TOP - PLOT_BOTTOM)
    }
}

fn polyline(points: &[(f64, f64)]) -> Line {
    Line {
        points: points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x as f32), Mm(y as f32)), false))
            .collect(),
        is_closed: false,
    }
}

fn draw_frame_and_grid(layer: &PdfLayerReference, font: &IndirectFontRef, scale: &ValueScale) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None)));
    layer.set_outline_thickness(0.8);
    layer.add_line(polyline(&[
        (PLOT_LEFT, PLOT_TOP),
        (PLOT_LEFT, PLOT_BOTTOM),
        (PLOT_RIGHT, PLOT_BOTTOM),
    ]));

    // Vertical grid every six months
    layer.set_outline_color(Color::Rgb(Rgb::new(0.85, 0.85, 0.85, None)));
    layer.set_outline_thickness(0.3);
    for month in (0..=MAX_REFERENCE_MONTHS).step_by(6) {
        let x = scale.x(month as f64);
        if month > 0 {
            layer.add_line(polyline(&[(x, PLOT_BOTTOM), (x, PLOT_TOP)]));
        }
        layer.use_text(
            format!("{month}"),
            8.0,
            Mm((x - 1.5) as f32),
            Mm((PLOT_BOTTOM - 5.0) as f32),
            font,
        );
    }

    // Horizontal grid at a readable value step
    let step = nice_step(scale.value_max - scale.value_min);
    let mut tick = (scale.value_min / step).ceil() * step;
    while tick <= scale.value_max {
        let y = scale.y(tick);
        layer.add_line(polyline(&[(PLOT_LEFT, y), (PLOT_RIGHT, y)]));
        layer.use_text(
            format!("{tick:.1}"),
            8.0,
            Mm((PLOT_LEFT - 12.0) as f32),
            Mm((y - 1.0) as f32),
            font,
        );
        tick += step;
    }
}

fn draw_percentile_curves(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    table: &[Anchor],
    scale: &ValueScale,
) {
    let curves: [fn(&Anchor) -> f64; 5] = [
        |a| a.p3,
        |a| a.p15,
        |a| a.p50,
        |a| a.p85,
        |a| a.p97,
    ];

    layer.set_outline_color(Color::Rgb(Rgb::new(0.55, 0.55, 0.65, None)));
    for (pick, label) in curves.iter().zip(PERCENTILE_LABELS) {
        // The median is drawn heavier than the outer bands.
        layer.set_outline_thickness(if label == "P50" { 0.7 } else { 0.4 });

        let points: Vec<(f64, f64)> = table
            .iter()
            .map(|a| (scale.x(a.month as f64), scale.y(pick(a))))
            .collect();
        layer.add_line(polyline(&points));

        let last = table.last().expect("reference table is never empty");
        layer.use_text(
            label,
            7.0,
            Mm((PLOT_RIGHT + 1.5) as f32),
            Mm((scale.y(pick(last)) - 1.0) as f32),
            font,
        );
    }
}

fn draw_measurements(layer: &PdfLayerReference, series: &GrowthSeries, scale: &ValueScale) {
    let charted: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter(|p| p.age_months <= MAX_REFERENCE_MONTHS)
        .map(|p| (scale.x(p.age_months as f64), scale.y(p.value)))
        .collect();

    layer.set_outline_color(Color::Rgb(Rgb::new(0.75, 0.2, 0.2, None)));
    layer.set_outline_thickness(1.1);
    if charted.len() >= 2 {
        layer.add_line(polyline(&charted));
    }

    // Cross markers so single measurements stay visible
    for &(x, y) in &charted {
        layer.add_line(polyline(&[(x - 1.2, y), (x + 1.2, y)]));
        layer.add_line(polyline(&[(x, y - 1.2), (x, y + 1.2)]));
    }
}

/// Round a raw axis step to 1/2/5 × 10^k.
fn nice_step(range: f64) -> f64 {
    let raw = range / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::chart::GrowthPoint;
    use crate::growth::reference::Measure;
    use chrono::NaiveDate;

    fn series(measure: Measure, points: Vec<(u32, f64)>) -> GrowthSeries {
        GrowthSeries {
            child_name: "Bo".into(),
            sex: Sex::Male,
            measure,
            points: points
                .into_iter()
                .map(|(age_months, value)| GrowthPoint {
                    age_months,
                    value,
                    record_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let s = series(Measure::WeightKg, vec![(3, 6.2), (6, 7.6), (10, 9.1)]);
        let bytes = render_growth_pdf(&s).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn single_point_series_renders() {
        let s = series(Measure::HeadCircumferenceCm, vec![(4, 41.5)]);
        let bytes = render_growth_pdf(&s).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn out_of_range_value_still_renders() {
        // heavier than P97: the scale expands instead of clipping
        let s = series(Measure::WeightKg, vec![(6, 12.5)]);
        let bytes = render_growth_pdf(&s).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn nice_step_rounds_to_125() {
        assert_eq!(nice_step(6.0), 1.0);
        assert_eq!(nice_step(12.0), 2.0);
        assert_eq!(nice_step(30.0), 5.0);
        assert_eq!(nice_step(60.0), 10.0);
    }
}
