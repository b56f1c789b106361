use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum StoreError {
    /// The container could not be opened or is not a valid store.
    Open { path: String, reason: String },
    /// The requested internal path does not exist in the store.
    PathNotFound(String),
    /// A node exists but its payload cannot be read as a numeric table.
    Malformed { path: String, reason: String },
    /// The store format is not available in this build.
    Unsupported(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Open { path, reason } => {
                write!(f, "could not open result store {}: {}", path, reason)
            }
            StoreError::PathNotFound(path) => {
                write!(f, "path not found in result store: {}", path)
            }
            StoreError::Malformed { path, reason } => {
                write!(f, "malformed dataset {}: {}", path, reason)
            }
            StoreError::Unsupported(message) => write!(f, "{}", message),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

/// Numeric payload of a leaf dataset, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    num_columns: usize,
    values: Vec<f64>,
}

impl Table {
    pub fn new(num_columns: usize, values: Vec<f64>) -> Self {
        debug_assert!(num_columns == 0 || values.len() % num_columns == 0);
        Self {
            num_columns,
            values,
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let num_columns = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != num_columns) {
            return None;
        }
        let values = rows.iter().flatten().copied().collect();
        Some(Self::new(num_columns, values))
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        if self.num_columns == 0 {
            0
        } else {
            self.values.len() / self.num_columns
        }
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.values
            .iter()
            .skip(index)
            .step_by(self.num_columns.max(1))
            .copied()
            .collect()
    }
}

/// A node of a hierarchical result store: either a group with named
/// children or a leaf dataset holding a numeric table. Paths are absolute
/// and `/`-separated, the way the store itself names its objects.
pub trait ResultNode: Sized {
    fn path(&self) -> &str;

    fn name(&self) -> &str {
        self.path().rsplit('/').next().unwrap_or("")
    }

    fn kind(&self) -> NodeKind;

    /// Children in store-native order. Datasets have none.
    fn children(&self) -> Result<Vec<Self>, StoreError>;

    fn read_table(&self) -> Result<Table, StoreError>;
}

pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), name)
    }
}

pub fn normalize_path(path: &str) -> String {
    let parts = segments(path);
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Hdf5,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StoreFormat::Json,
            _ => StoreFormat::Hdf5,
        }
    }
}

/// Result store backed by a JSON document. Objects are groups (member
/// order is kept), arrays of numeric rows are datasets and `null` cells
/// read as NaN.
pub struct JsonStore {
    root: Value,
}

impl JsonStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let open_error = |reason: String| StoreError::Open {
            path: path.display().to_string(),
            reason,
        };
        let contents =
            fs::read_to_string(path).map_err(|e| open_error(e.to_string()))?;
        let root: Value = serde_json::from_str(&contents)
            .map_err(|e| open_error(e.to_string()))?;
        if !root.is_object() {
            return Err(open_error("top level is not a group".to_string()));
        }
        Ok(Self::from_value(root))
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn subtree(&self, path: &str) -> Result<JsonNode<'_>, StoreError> {
        let mut value = &self.root;
        for segment in segments(path) {
            value = match value {
                Value::Object(members) => members.get(segment),
                _ => None,
            }
            .ok_or_else(|| StoreError::PathNotFound(normalize_path(path)))?;
        }
        Ok(JsonNode {
            path: normalize_path(path),
            value,
        })
    }
}

pub struct JsonNode<'a> {
    path: String,
    value: &'a Value,
}

impl<'a> ResultNode for JsonNode<'a> {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> NodeKind {
        if self.value.is_object() {
            NodeKind::Group
        } else {
            NodeKind::Dataset
        }
    }

    fn children(&self) -> Result<Vec<Self>, StoreError> {
        match self.value {
            Value::Object(members) => Ok(members
                .iter()
                .map(|(name, value)| JsonNode {
                    path: join_path(&self.path, name),
                    value,
                })
                .collect()),
            _ => Ok(vec![]),
        }
    }

    fn read_table(&self) -> Result<Table, StoreError> {
        let malformed = |reason: &str| StoreError::Malformed {
            path: self.path.clone(),
            reason: reason.to_string(),
        };
        let rows = self
            .value
            .as_array()
            .ok_or_else(|| malformed("dataset is not an array of rows"))?;
        let mut parsed = Vec::<Vec<f64>>::with_capacity(rows.len());
        for row in rows {
            let cells = row
                .as_array()
                .ok_or_else(|| malformed("row is not an array"))?;
            let mut values = Vec::<f64>::with_capacity(cells.len());
            for cell in cells {
                match cell {
                    Value::Null => values.push(f64::NAN),
                    _ => values.push(
                        cell.as_f64()
                            .ok_or_else(|| malformed("non-numeric cell"))?,
                    ),
                }
            }
            parsed.push(values);
        }
        Table::from_rows(&parsed)
            .ok_or_else(|| malformed("rows have different lengths"))
    }
}
