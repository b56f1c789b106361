use crate::log;
use crate::series::{CulvertSeries, SeriesError};
use crate::store::{segments, NodeKind, ResultNode, StoreError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// How the structure half of a composite series name is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingRule {
    /// The segment right before the (last) marker segment.
    #[default]
    MarkerParent,
    /// The ancestor this many levels above the leaf (the parent is 1).
    AncestorDepth(usize),
}

impl fmt::Display for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingRule::MarkerParent => write!(f, "marker parent"),
            NamingRule::AncestorDepth(n) => write!(f, "ancestor depth {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidSeriesPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub marker: String,
    pub naming: NamingRule,
    pub on_invalid_series: InvalidSeriesPolicy,
}

impl ExtractOptions {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            naming: NamingRule::default(),
            on_invalid_series: InvalidSeriesPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub datasets_visited: usize,
    pub qualified: usize,
    pub skipped: usize,
    pub overwritten: usize,
}

#[derive(Debug)]
pub enum ExtractError {
    Store(StoreError),
    Series { path: String, source: SeriesError },
    MissingAncestor { path: String, rule: NamingRule },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Store(err) => write!(f, "{}", err),
            ExtractError::Series { path, source } => {
                write!(f, "invalid culvert series {}: {}", path, source)
            }
            ExtractError::MissingAncestor { path, rule } => write!(
                f,
                "cannot derive a structure name for {} ({} rule)",
                path, rule
            ),
        }
    }
}

impl Error for ExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExtractError::Store(err) => Some(err),
            ExtractError::Series { source, .. } => Some(source),
            ExtractError::MissingAncestor { .. } => None,
        }
    }
}

impl From<StoreError> for ExtractError {
    fn from(value: StoreError) -> Self {
        ExtractError::Store(value)
    }
}

/// A dataset is a culvert series when one of its ancestors is the marker.
pub fn is_culvert_path(path: &str, marker: &str) -> bool {
    let parts = segments(path);
    match parts.split_last() {
        Some((_, ancestors)) => ancestors.iter().any(|s| *s == marker),
        None => false,
    }
}

/// Builds `<structure>_<leaf>` for a qualifying dataset path.
pub fn composite_name(
    path: &str,
    marker: &str,
    rule: NamingRule,
) -> Result<String, ExtractError> {
    let parts = segments(path);
    let missing = || ExtractError::MissingAncestor {
        path: path.to_string(),
        rule,
    };
    let (leaf, ancestors) = parts.split_last().ok_or_else(missing)?;
    let structure = match rule {
        NamingRule::MarkerParent => {
            let marker_index = ancestors
                .iter()
                .rposition(|s| *s == marker)
                .ok_or_else(missing)?;
            marker_index
                .checked_sub(1)
                .and_then(|i| ancestors.get(i))
                .ok_or_else(missing)?
        }
        NamingRule::AncestorDepth(depth) => depth
            .checked_sub(1)
            .and_then(|d| ancestors.len().checked_sub(d + 1))
            .and_then(|i| ancestors.get(i))
            .ok_or_else(missing)?,
    };
    Ok(format!("{}_{}", structure, leaf))
}

/// Walks the subtree under `root` depth-first and collects every culvert
/// series, keyed by composite name in traversal order. A repeated name
/// replaces the earlier series but keeps its position.
pub fn extract_culvert_series<N: ResultNode>(
    root: &N,
    options: &ExtractOptions,
) -> Result<(IndexMap<String, CulvertSeries>, ExtractionStats), ExtractError>
{
    let mut series = IndexMap::<String, CulvertSeries>::new();
    let mut stats = ExtractionStats::default();
    visit(root, options, &mut series, &mut stats)?;
    Ok((series, stats))
}

fn visit<N: ResultNode>(
    node: &N,
    options: &ExtractOptions,
    series: &mut IndexMap<String, CulvertSeries>,
    stats: &mut ExtractionStats,
) -> Result<(), ExtractError> {
    match node.kind() {
        NodeKind::Group => {
            for child in node.children()?.iter() {
                visit(child, options, series, stats)?;
            }
        }
        NodeKind::Dataset => {
            stats.datasets_visited += 1;
            if !is_culvert_path(node.path(), &options.marker) {
                return Ok(());
            }
            match read_series(node, options) {
                Ok((name, s)) => {
                    stats.qualified += 1;
                    if series.insert(name, s).is_some() {
                        stats.overwritten += 1;
                    }
                }
                Err(err) => match options.on_invalid_series {
                    InvalidSeriesPolicy::Abort => return Err(err),
                    InvalidSeriesPolicy::Skip => {
                        log::skipped_series(node.path(), &err);
                        stats.skipped += 1;
                    }
                },
            }
        }
    }
    Ok(())
}

fn read_series<N: ResultNode>(
    node: &N,
    options: &ExtractOptions,
) -> Result<(String, CulvertSeries), ExtractError> {
    let name = composite_name(node.path(), &options.marker, options.naming)?;
    let table = node.read_table()?;
    let s = CulvertSeries::from_table(&table).map_err(|source| {
        ExtractError::Series {
            path: node.path().to_string(),
            source,
        }
    })?;
    Ok((name, s))
}
