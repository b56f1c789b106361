use crate::extract::ExtractionStats;
use crate::series::{CulvertSeries, SeriesSummary};
use chrono::Local;
use indexmap::IndexMap;
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// Helper function for displaying the greeting of a report run
pub fn show_greeting() {
    println!("\n# culvert-report v{}", env!("CARGO_PKG_VERSION"));
    println!("- Started at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

pub fn input_reading_line(input_path: &Path, root_path: &str) {
    println!("\n# Reading results");
    println!("- Store: {}", input_path.display());
    println!("- Subtree: {}", root_path);
}

/// Helper function for displaying the extracted series table header
pub fn extraction_table_header() {
    println!(
        "\n{0: <36} | {1: >6} | {2: >12} | {3: >10}",
        "series", "steps", "peak Q (cfs)", "peak (h)"
    )
}

/// Helper function for displaying a divider for the extracted series table
pub fn extraction_table_divider() {
    println!("------------------------------------------------------------------------")
}

/// Helper function for displaying one extracted series
pub fn extraction_table_row(name: &str, steps: usize, summary: &SeriesSummary) {
    println!(
        "{0: <36} | {1: >6} | {2: >12.2} | {3: >10.2}",
        name, steps, summary.peak_discharge, summary.time_to_peak_hours
    )
}

pub fn extraction_stats(stats: &ExtractionStats) {
    println!(
        "\nDatasets visited: {} | culvert series: {} | skipped: {} | overwritten: {}",
        stats.datasets_visited, stats.qualified, stats.skipped, stats.overwritten
    );
}

pub fn extraction_summary(
    series: &IndexMap<String, CulvertSeries>,
    stats: &ExtractionStats,
    minutes_per_step: f64,
) {
    if !series.is_empty() {
        extraction_table_header();
        extraction_table_divider();
        for (name, s) in series.iter() {
            let summary = SeriesSummary::compute(s, minutes_per_step);
            extraction_table_row(name, s.len(), &summary);
        }
    }
    extraction_stats(stats);
}

pub fn skipped_series(path: &str, err: &dyn Display) {
    eprintln!("WARN skipping {}: {}", path, err);
}

pub fn output_generation_line(output_path: &Path, num_pages: usize) {
    println!("\n# Rendering report");
    println!("- Document: {}", output_path.display());
    println!("- Pages: {}", num_pages);
}

pub fn page_rendered(page_number: usize, num_pages: usize, num_charts: usize) {
    println!("  page {}/{} ({} charts)", page_number, num_pages, num_charts);
}

pub fn report_written(output_path: &Path, num_pages: usize) {
    println!("- Wrote {} page(s) to {}", num_pages, output_path.display());
}

pub fn summary_table_line(summary_path: &Path) {
    println!("- Summary table: {}", summary_path.display());
}

pub fn show_farewell(time: Duration) {
    println!("\nTotal time: {:.2} s", time.as_millis() as f64 / 1000.0)
}
