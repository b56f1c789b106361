use crate::series::{CulvertSeries, SeriesSummary};
use crate::utils;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

pub const DISCHARGE_COLOR: RGBColor = RGBColor(0, 0, 255);
pub const HEADWATER_COLOR: RGBColor = RGBColor(255, 0, 0);
pub const TAILWATER_COLOR: RGBColor = RGBColor(0, 128, 0);

const TITLE_SIZE: f64 = 10.0;
const AXIS_DESC_SIZE: f64 = 8.0;
const LABEL_SIZE: f64 = 7.0;
const ANNOTATION_SIZE: f64 = 7.0;

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

/// Lines of the summary box, in display order.
pub fn annotation_lines(summary: &SeriesSummary) -> [String; 4] {
    [
        format!("Peak Q: {:.2} cfs", summary.peak_discharge),
        format!("Time to Peak: {:.2} hrs", summary.time_to_peak_hours),
        format!("Max HW Stage: {:.2} ft", summary.max_headwater_stage),
        format!("Max TW Stage: {:.2} ft", summary.max_tailwater_stage),
    ]
}

pub fn x_axis_label(minutes_per_step: f64) -> String {
    format!("Time Index ({}-min intervals)", minutes_per_step)
}

fn finite_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Draws one culvert chart: discharge on the primary axis, headwater and
/// tailwater stages on a secondary axis sharing the time index, a merged
/// legend in the lower right and the summary box in the upper left.
pub fn draw_culvert_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &CulvertSeries,
    minutes_per_step: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let discharge_range = utils::padded_range(&[series.discharge.as_slice()]);
    let stage_range = utils::padded_range(&[
        series.headwater_stage.as_slice(),
        series.tailwater_stage.as_slice(),
    ]);

    let mut chart = ChartBuilder::on(area)
        .caption(
            title,
            FontDesc::new(FontFamily::SansSerif, TITLE_SIZE, FontStyle::Bold)
                .color(&BLACK),
        )
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 42)
        .set_label_area_size(LabelAreaPosition::Right, 42)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(0.0..x_max, discharge_range)?
        .set_secondary_coord(0.0..x_max, stage_range);

    chart
        .configure_mesh()
        .x_desc(x_axis_label(minutes_per_step))
        .y_desc("Discharge (cfs)")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .label_style(font(LABEL_SIZE).color(&BLACK))
        .axis_desc_style(font(AXIS_DESC_SIZE).color(&BLACK))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Stage (ft)")
        .y_labels(6)
        .label_style(font(LABEL_SIZE).color(&BLACK))
        .axis_desc_style(font(AXIS_DESC_SIZE).color(&BLACK))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            finite_points(&series.discharge),
            DISCHARGE_COLOR.stroke_width(1),
        ))?
        .label("Q (cfs)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 16, y)], &DISCHARGE_COLOR)
        });

    chart
        .draw_secondary_series(LineSeries::new(
            finite_points(&series.headwater_stage),
            HEADWATER_COLOR.stroke_width(1),
        ))?
        .label("HW (ft)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 16, y)], &HEADWATER_COLOR)
        });

    chart
        .draw_secondary_series(LineSeries::new(
            finite_points(&series.tailwater_stage),
            TAILWATER_COLOR.stroke_width(1),
        ))?
        .label("TW (ft)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 16, y)], &TAILWATER_COLOR)
        });

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(font(LABEL_SIZE).color(&BLACK))
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    let plot_base = chart.plotting_area().get_base_pixel();
    let plot_dim = chart.plotting_area().dim_in_pixel();
    let summary = SeriesSummary::compute(series, minutes_per_step);
    draw_annotation(area, &annotation_lines(&summary), plot_base, plot_dim)
}

// Anchored at 5% of the plot width/height from the plot's top-left corner.
fn draw_annotation<DB>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
    plot_base: (i32, i32),
    plot_dim: (u32, u32),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let style = font(ANNOTATION_SIZE).color(&BLACK);
    let (area_x, area_y) = area.get_base_pixel();
    let left = plot_base.0 - area_x + (plot_dim.0 as f64 * 0.05) as i32;
    let top = plot_base.1 - area_y + (plot_dim.1 as f64 * 0.05) as i32;
    let padding = 4;
    let line_height = (ANNOTATION_SIZE * 1.3).ceil() as i32;

    let mut text_width = 0;
    for line in lines.iter() {
        let (w, _) = area.estimate_text_size(line, &style)?;
        text_width = text_width.max(w as i32);
    }
    let right = left + text_width + 2 * padding;
    let bottom = top + line_height * lines.len() as i32 + 2 * padding;

    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        WHITE.mix(0.8).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        BLACK.mix(0.3).stroke_width(1),
    ))?;
    for (i, line) in lines.iter().enumerate() {
        let y = top + padding + line_height * i as i32;
        area.draw_text(line, &style, (left + padding, y))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{PageCanvas, PdfBackend};

    fn sample_series() -> CulvertSeries {
        CulvertSeries {
            discharge: vec![10.0, 50.0, 30.0],
            headwater_stage: vec![100.0, 101.25, 100.5],
            tailwater_stage: vec![99.0, 99.75, 99.5],
        }
    }

    #[test]
    fn test_annotation_lines() {
        let summary = SeriesSummary::compute(&sample_series(), 5.0);
        let lines = annotation_lines(&summary);
        assert_eq!(lines[0], "Peak Q: 50.00 cfs");
        assert_eq!(lines[1], "Time to Peak: 0.08 hrs");
        assert_eq!(lines[2], "Max HW Stage: 101.25 ft");
        assert_eq!(lines[3], "Max TW Stage: 99.75 ft");
    }

    #[test]
    fn test_x_axis_label() {
        assert_eq!(x_axis_label(5.0), "Time Index (5-min intervals)");
        assert_eq!(x_axis_label(2.5), "Time Index (2.5-min intervals)");
    }

    #[test]
    fn test_finite_points_skip_nan() {
        let points = finite_points(&[1.0, f64::NAN, 3.0]);
        assert_eq!(points, vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_draw_culvert_chart_writes_labels() {
        let mut canvas = PageCanvas::new((306, 396));
        {
            let root = PdfBackend::new(&mut canvas).into_drawing_area();
            draw_culvert_chart(&root, "Levee A_Group 1", &sample_series(), 5.0)
                .unwrap();
        }
        let content = canvas.content();
        assert!(content.contains("(Levee A_Group 1) Tj"));
        assert!(content.contains("(Discharge \\(cfs\\)) Tj"));
        assert!(content.contains("(Stage \\(ft\\)) Tj"));
        assert!(content.contains("(Q \\(cfs\\)) Tj"));
        assert!(content.contains("(HW \\(ft\\)) Tj"));
        assert!(content.contains("(TW \\(ft\\)) Tj"));
        assert!(content.contains("(Peak Q: 50.00 cfs) Tj"));
        assert!(content.contains("(Time to Peak: 0.08 hrs) Tj"));
    }

    #[test]
    fn test_draw_single_step_series() {
        let mut canvas = PageCanvas::new((306, 396));
        let series = CulvertSeries {
            discharge: vec![3.0],
            headwater_stage: vec![1.0],
            tailwater_stage: vec![1.0],
        };
        {
            let root = PdfBackend::new(&mut canvas).into_drawing_area();
            draw_culvert_chart(&root, "single", &series, 5.0).unwrap();
        }
        assert!(canvas.content().contains("(Peak Q: 3.00 cfs) Tj"));
    }
}
