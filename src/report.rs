use crate::chart;
use crate::log;
use crate::pdf::{PageCanvas, PdfBackend, PdfDocument, US_LETTER};
use crate::series::CulvertSeries;
use indexmap::IndexMap;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

pub const PLOTS_PER_PAGE: usize = 4;
const GRID: (usize, usize) = (2, 2);
const PAGE_MARGIN: u32 = 18;
const DOCUMENT_TITLE: &str = "Culvert Group Time Series";

#[derive(Debug)]
pub enum ReportError {
    Io(io::Error),
    Drawing(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "could not write report: {}", e),
            ReportError::Drawing(e) => write!(f, "could not draw chart: {}", e),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Drawing(_) => None,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        ReportError::Io(e)
    }
}

impl From<DrawingAreaErrorKind<Infallible>> for ReportError {
    fn from(e: DrawingAreaErrorKind<Infallible>) -> Self {
        ReportError::Drawing(e.to_string())
    }
}

/// The series placed on one page, in grid order (row-major).
pub struct ReportPage<'a> {
    pub number: usize,
    pub slots: Vec<(&'a str, &'a CulvertSeries)>,
}

pub fn page_count(num_series: usize) -> usize {
    num_series.div_ceil(PLOTS_PER_PAGE)
}

pub fn paginate(series: &IndexMap<String, CulvertSeries>) -> Vec<ReportPage<'_>> {
    let entries: Vec<(&str, &CulvertSeries)> =
        series.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries
        .chunks(PLOTS_PER_PAGE)
        .enumerate()
        .map(|(i, chunk)| ReportPage {
            number: i + 1,
            slots: chunk.to_vec(),
        })
        .collect()
}

fn render_page(
    page: &ReportPage,
    minutes_per_step: f64,
) -> Result<PageCanvas, ReportError> {
    let mut canvas = PageCanvas::new(US_LETTER);
    {
        let root = PdfBackend::new(&mut canvas).into_drawing_area();
        root.fill(&WHITE)?;
        let body = root.margin(PAGE_MARGIN, PAGE_MARGIN, PAGE_MARGIN, PAGE_MARGIN);
        let cells = body.split_evenly(GRID);
        // Cells past the last series stay blank.
        for (cell, (name, series)) in cells.iter().zip(page.slots.iter()) {
            chart::draw_culvert_chart(cell, name, series, minutes_per_step)?;
        }
        root.present()?;
    }
    Ok(canvas)
}

/// Renders every series, four per page, and writes the document to
/// `output_path`. Returns the number of pages written.
pub fn render_report(
    series: &IndexMap<String, CulvertSeries>,
    minutes_per_step: f64,
    output_path: &Path,
) -> Result<usize, ReportError> {
    let num_pages = page_count(series.len());
    log::output_generation_line(output_path, num_pages);

    let pages = paginate(series);

    let mut document = PdfDocument::new(US_LETTER, DOCUMENT_TITLE);
    for page in pages.iter() {
        let canvas = render_page(page, minutes_per_step)?;
        document.add_page(canvas);
        log::page_rendered(page.number, num_pages, page.slots.len());
    }
    let written = document.page_count();
    document.save(output_path)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;

    fn series_map(n: usize) -> IndexMap<String, CulvertSeries> {
        (0..n)
            .map(|i| {
                let name = format!("Structure{}_Group{}", i, i);
                let series = CulvertSeries {
                    discharge: vec![1.0, 5.0 + i as f64, 2.0],
                    headwater_stage: vec![10.0, 11.0, 10.5],
                    tailwater_stage: vec![9.0, 9.5, 9.25],
                };
                (name, series)
            })
            .collect()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(4), 1);
        assert_eq!(page_count(5), 2);
        assert_eq!(page_count(8), 2);
        assert_eq!(page_count(9), 3);
    }

    #[test]
    fn test_paginate_keeps_order() {
        let map = series_map(5);
        let pages = paginate(&map);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].slots.len(), 4);
        assert_eq!(pages[0].slots[0].0, "Structure0_Group0");
        assert_eq!(pages[0].slots[3].0, "Structure3_Group3");
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].slots.len(), 1);
        assert_eq!(pages[1].slots[0].0, "Structure4_Group4");
    }

    #[test]
    fn test_render_page_leaves_unused_cells_blank() {
        let map = series_map(1);
        let pages = paginate(&map);
        let canvas = render_page(&pages[0], 5.0).unwrap();
        let content = canvas.content();
        assert_eq!(content.matches("(Structure0_Group0) Tj").count(), 1);
        assert_eq!(content.matches("(Peak Q: ").count(), 1);
    }

    #[test]
    fn test_four_series_fill_one_page() {
        let map = series_map(4);
        let pages = paginate(&map);
        assert_eq!(pages.len(), 1);
        let canvas = render_page(&pages[0], 5.0).unwrap();
        let content = canvas.content();
        assert_eq!(content.matches("(Peak Q: ").count(), 4);
        for i in 0..4 {
            let title = format!("(Structure{}_Group{}) Tj", i, i);
            assert_eq!(content.matches(title.as_str()).count(), 1);
        }
    }

    #[test]
    fn test_render_report_page_counts() {
        let dir = tempfile::tempdir().unwrap();
        for n in [0, 1, 4, 5, 9] {
            let path = dir.path().join(format!("report_{}.pdf", n));
            let written = render_report(&series_map(n), 5.0, &path).unwrap();
            assert_eq!(written, page_count(n));
            let doc = Document::load(&path).unwrap();
            assert_eq!(doc.get_pages().len(), page_count(n));
        }
    }

    #[test]
    fn test_render_report_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let result = render_report(&series_map(1), 5.0, &path);
        assert!(matches!(result, Err(ReportError::Io(_))));
        assert!(!path.exists());
    }
}
