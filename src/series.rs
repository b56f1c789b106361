use crate::store::Table;
use crate::utils;
use std::error::Error;
use std::fmt;

/// Number of columns a culvert group dataset carries: discharge,
/// headwater stage and tailwater stage, in that order.
pub const NUM_COLUMNS: usize = 3;

#[derive(Debug, PartialEq)]
pub enum SeriesError {
    ShapeMismatch { columns: usize },
    EmptySeries,
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::ShapeMismatch { columns } => write!(
                f,
                "expected {} columns (discharge, headwater, tailwater), found {}",
                NUM_COLUMNS, columns
            ),
            SeriesError::EmptySeries => write!(f, "dataset has no time steps"),
        }
    }
}

impl Error for SeriesError {}

/// Discharge (cfs), headwater stage (ft) and tailwater stage (ft) of one
/// culvert group, one value per time step.
#[derive(Debug, Clone, PartialEq)]
pub struct CulvertSeries {
    pub discharge: Vec<f64>,
    pub headwater_stage: Vec<f64>,
    pub tailwater_stage: Vec<f64>,
}

impl CulvertSeries {
    pub fn from_table(table: &Table) -> Result<Self, SeriesError> {
        if table.num_columns() != NUM_COLUMNS {
            return Err(SeriesError::ShapeMismatch {
                columns: table.num_columns(),
            });
        }
        if table.num_rows() == 0 {
            return Err(SeriesError::EmptySeries);
        }
        Ok(Self {
            discharge: table.column(0),
            headwater_stage: table.column(1),
            tailwater_stage: table.column(2),
        })
    }

    pub fn len(&self) -> usize {
        self.discharge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discharge.is_empty()
    }
}

/// Scalar values shown in the annotation box of each chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub peak_discharge: f64,
    pub peak_index: usize,
    pub time_to_peak_hours: f64,
    pub max_headwater_stage: f64,
    pub max_tailwater_stage: f64,
}

impl SeriesSummary {
    pub fn compute(series: &CulvertSeries, minutes_per_step: f64) -> Self {
        let (peak_index, peak_discharge) = utils::first_max(&series.discharge)
            .unwrap_or((0, f64::NAN));
        Self {
            peak_discharge,
            peak_index,
            time_to_peak_hours: peak_index as f64 * minutes_per_step / 60.0,
            max_headwater_stage: utils::column_max(&series.headwater_stage),
            max_tailwater_stage: utils::column_max(&series.tailwater_stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(discharge: Vec<f64>) -> CulvertSeries {
        let n = discharge.len();
        CulvertSeries {
            discharge,
            headwater_stage: (0..n).map(|i| 100.0 + i as f64).collect(),
            tailwater_stage: (0..n).map(|i| 99.0 - i as f64).collect(),
        }
    }

    #[test]
    fn test_from_table_names_columns() {
        let table = Table::from_rows(&[
            vec![1.0, 10.0, 9.0],
            vec![2.0, 11.0, 8.5],
        ])
        .unwrap();
        let s = CulvertSeries::from_table(&table).unwrap();
        assert_eq!(s.discharge, vec![1.0, 2.0]);
        assert_eq!(s.headwater_stage, vec![10.0, 11.0]);
        assert_eq!(s.tailwater_stage, vec![9.0, 8.5]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_from_table_rejects_wrong_width() {
        let table = Table::from_rows(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            CulvertSeries::from_table(&table),
            Err(SeriesError::ShapeMismatch { columns: 2 })
        );
    }

    #[test]
    fn test_from_table_rejects_empty() {
        let table = Table::new(3, vec![]);
        assert_eq!(
            CulvertSeries::from_table(&table),
            Err(SeriesError::EmptySeries)
        );
    }

    #[test]
    fn test_summary_peak_and_time_to_peak() {
        let summary = SeriesSummary::compute(&series(vec![10.0, 50.0, 30.0]), 5.0);
        assert_eq!(summary.peak_discharge, 50.0);
        assert_eq!(summary.peak_index, 1);
        assert!((summary.time_to_peak_hours - 5.0 / 60.0).abs() < 1e-12);
        assert_eq!(summary.max_headwater_stage, 102.0);
        assert_eq!(summary.max_tailwater_stage, 99.0);
    }

    #[test]
    fn test_summary_duplicate_peak_uses_first() {
        let summary = SeriesSummary::compute(&series(vec![50.0, 10.0, 50.0]), 5.0);
        assert_eq!(summary.peak_index, 0);
        assert_eq!(summary.time_to_peak_hours, 0.0);
    }
}
