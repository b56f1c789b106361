use crate::store::{
    join_path, normalize_path, NodeKind, ResultNode, StoreError, Table,
};
use hdf5::{Dataset, File, Group, LocationType};
use std::path::Path;

/// Result store backed by an HDF5 file. The file stays open for as long
/// as the store or any node opened from it is alive.
pub struct Hdf5Store {
    file: File,
}

impl Hdf5Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { file })
    }

    pub fn subtree(&self, path: &str) -> Result<Hdf5Node, StoreError> {
        let path = normalize_path(path);
        if path == "/" {
            let group = self.file.group("/").map_err(|e| malformed(&path, e))?;
            return Ok(Hdf5Node::Group { path, group });
        }
        if !self.file.link_exists(&path) {
            return Err(StoreError::PathNotFound(path));
        }
        open_member(&self.file, &path, path.clone())?
            .ok_or(StoreError::PathNotFound(path))
    }
}

pub enum Hdf5Node {
    Group { path: String, group: Group },
    Dataset { path: String, dataset: Dataset },
}

fn malformed(path: &str, err: hdf5::Error) -> StoreError {
    StoreError::Malformed {
        path: path.to_string(),
        reason: err.to_string(),
    }
}

// Named datatypes are neither groups nor datasets and are ignored.
fn open_member(
    parent: &Group,
    name: &str,
    path: String,
) -> Result<Option<Hdf5Node>, StoreError> {
    let loc_type = parent
        .loc_type_by_name(name)
        .map_err(|e| malformed(&path, e))?;
    let node = match loc_type {
        LocationType::Group => {
            let group = parent.group(name).map_err(|e| malformed(&path, e))?;
            Some(Hdf5Node::Group { path, group })
        }
        LocationType::Dataset => {
            let dataset =
                parent.dataset(name).map_err(|e| malformed(&path, e))?;
            Some(Hdf5Node::Dataset { path, dataset })
        }
        _ => None,
    };
    Ok(node)
}

impl ResultNode for Hdf5Node {
    fn path(&self) -> &str {
        match self {
            Hdf5Node::Group { path, .. } => path,
            Hdf5Node::Dataset { path, .. } => path,
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Hdf5Node::Group { .. } => NodeKind::Group,
            Hdf5Node::Dataset { .. } => NodeKind::Dataset,
        }
    }

    fn children(&self) -> Result<Vec<Self>, StoreError> {
        let (path, group) = match self {
            Hdf5Node::Group { path, group } => (path, group),
            Hdf5Node::Dataset { .. } => return Ok(vec![]),
        };
        // member_names() iterates in name order, like h5py does
        let names = group.member_names().map_err(|e| malformed(path, e))?;
        let mut children = Vec::<Hdf5Node>::with_capacity(names.len());
        for name in names.iter() {
            if let Some(child) = open_member(group, name, join_path(path, name))? {
                children.push(child);
            }
        }
        Ok(children)
    }

    fn read_table(&self) -> Result<Table, StoreError> {
        let (path, dataset) = match self {
            Hdf5Node::Dataset { path, dataset } => (path, dataset),
            Hdf5Node::Group { path, .. } => {
                return Err(StoreError::Malformed {
                    path: path.clone(),
                    reason: "node is a group, not a dataset".to_string(),
                })
            }
        };
        let shape = dataset.shape();
        if shape.len() != 2 {
            return Err(StoreError::Malformed {
                path: path.clone(),
                reason: format!("expected a 2-D dataset, found shape {:?}", shape),
            });
        }
        let array = dataset.read_2d::<f64>().map_err(|e| malformed(path, e))?;
        Ok(Table::new(array.ncols(), array.iter().copied().collect()))
    }
}
