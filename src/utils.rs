use std::ops::Range;

/// Helper function for locating the maximum of a column. NaN cells are
/// ignored and ties resolve to the first occurrence, so the returned
/// index is the lowest one holding the maximum value.
///
/// ## Example
///
/// ```
/// let discharge = vec![50.0, 10.0, 50.0];
///
/// let (index, peak) = culvert_report::utils::first_max(&discharge).unwrap();
/// assert_eq!(index, 0);
/// assert_eq!(peak, 50.0);
/// ```
pub fn first_max(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

/// Maximum of a column ignoring NaN cells, NaN when there is nothing else.
pub fn column_max(values: &[f64]) -> f64 {
    first_max(values).map_or(f64::NAN, |(_, value)| value)
}

/// Axis range covering every finite value of the given columns, padded by
/// 5% on each side. Flat or empty data still gets a non-degenerate range.
pub fn padded_range(columns: &[&[f64]]) -> Range<f64> {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for value in columns.iter().flat_map(|c| c.iter()) {
        if value.is_finite() {
            low = low.min(*value);
            high = high.max(*value);
        }
    }
    if !low.is_finite() || !high.is_finite() {
        return 0.0..1.0;
    }
    if high - low < 1e-9 {
        return (low - 1.0)..(high + 1.0);
    }
    let pad = (high - low) * 0.05;
    (low - pad)..(high + pad)
}
