pub mod chain;
pub mod check;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sg_types::{FlatHierarchy, HierarchyResolver, TypeTable};

/// Load the host type table if one was given; otherwise every type is a root.
pub fn load_resolver(types: Option<&Path>) -> anyhow::Result<Arc<dyn HierarchyResolver>> {
    match types {
        Some(path) => {
            let table = TypeTable::from_file(path)
                .with_context(|| format!("loading types from {}", path.display()))?;
            Ok(Arc::new(table))
        }
        None => Ok(Arc::new(FlatHierarchy)),
    }
}
