use crate::series::{CulvertSeries, SeriesSummary};
use csv::Writer;
use indexmap::IndexMap;
use serde;
use std::error::Error;
use std::path::Path;

#[derive(serde::Serialize)]
struct SeriesSummaryOutput<'a> {
    series: &'a str,
    rows: usize,
    peak_discharge: f64,
    peak_index: usize,
    time_to_peak_hours: f64,
    max_headwater_stage: f64,
    max_tailwater_stage: f64,
}

/// Writes one row per culvert series, in report order.
pub fn write_summary_table(
    series: &IndexMap<String, CulvertSeries>,
    minutes_per_step: f64,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    for (name, s) in series.iter() {
        let summary = SeriesSummary::compute(s, minutes_per_step);
        wtr.serialize(SeriesSummaryOutput {
            series: name,
            rows: s.len(),
            peak_discharge: summary.peak_discharge,
            peak_index: summary.peak_index,
            time_to_peak_hours: summary.time_to_peak_hours,
            max_headwater_stage: summary.max_headwater_stage,
            max_tailwater_stage: summary.max_tailwater_stage,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_summary_table() {
        let mut series = IndexMap::new();
        series.insert(
            "Levee_Group 1".to_string(),
            CulvertSeries {
                discharge: vec![10.0, 50.0, 30.0],
                headwater_stage: vec![100.0, 101.5, 100.5],
                tailwater_stage: vec![99.0, 99.5, 99.25],
            },
        );
        series.insert(
            "Dam_Group 2".to_string(),
            CulvertSeries {
                discharge: vec![2.0, 1.0],
                headwater_stage: vec![5.0, 6.0],
                tailwater_stage: vec![4.0, 4.5],
            },
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary_table(&series, 6.0, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "series,rows,peak_discharge,peak_index,time_to_peak_hours,\
             max_headwater_stage,max_tailwater_stage"
        );
        assert_eq!(lines[1], "Levee_Group 1,3,50.0,1,0.1,101.5,99.5");
        assert_eq!(lines[2], "Dam_Group 2,2,2.0,0,0.0,6.0,4.5");
    }
}
