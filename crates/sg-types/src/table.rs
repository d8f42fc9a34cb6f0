// table.rs — In-memory host type table.
//
// The table is the usual HierarchyResolver: embedders register every host
// type that may flow into a template, together with its direct supertype
// and, optionally, a constructor for the name-based instantiate path.
//
// Tables can also be declared in a file:
//
//   [[types]]
//   name = "com.acme.Car"
//   supertype = "java.lang.Object"

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hierarchy::HierarchyResolver;
use crate::name::{TypeDescriptor, TypeName};
use crate::object::HostObject;

/// Builds a fresh instance of a host type.
pub type Constructor = Arc<dyn Fn() -> Box<dyn HostObject> + Send + Sync>;

/// On-disk shape of a type table file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeTableFile {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

/// Registered host types keyed by exact name.
#[derive(Default)]
pub struct TypeTable {
    descriptors: HashMap<TypeName, TypeDescriptor>,
    constructors: HashMap<TypeName, Constructor>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from descriptors, in order.
    ///
    /// A descriptor may name a supertype that is registered later (or
    /// never); unknown supertypes simply end the ancestor chain.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, TypeError> {
        let mut table = Self::new();
        for descriptor in descriptors {
            table.register(descriptor)?;
        }
        Ok(table)
    }

    /// Load a table from a `.toml`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self, TypeError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| TypeError::Io {
            path: display.clone(),
            source,
        })?;
        let file: TypeTableFile = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| TypeError::Parse {
                path: display.clone(),
                reason: e.to_string(),
            })?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| TypeError::Parse {
                    path: display.clone(),
                    reason: e.to_string(),
                })?
            }
            _ => return Err(TypeError::UnsupportedFormat { path: display }),
        };
        Self::from_descriptors(file.types)
    }

    /// Register a host type.
    ///
    /// Rejects empty names, duplicates, and any supertype link that would
    /// make the type its own ancestor.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), TypeError> {
        if descriptor.name.as_str().is_empty() {
            return Err(TypeError::EmptyName);
        }
        if self.descriptors.contains_key(&descriptor.name) {
            return Err(TypeError::Duplicate {
                name: descriptor.name.to_string(),
            });
        }
        if let Some(supertype) = &descriptor.supertype {
            if supertype.as_str().is_empty() {
                return Err(TypeError::EmptyName);
            }
            if self.ancestor_chain(supertype).contains(&descriptor.name) {
                return Err(TypeError::CyclicHierarchy {
                    name: descriptor.name.to_string(),
                    supertype: supertype.to_string(),
                });
            }
        }
        tracing::debug!(type_name = %descriptor.name, "registered host type");
        self.descriptors.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Register a host type that can also be instantiated by name.
    pub fn register_with_constructor<F>(
        &mut self,
        descriptor: TypeDescriptor,
        constructor: F,
    ) -> Result<(), TypeError>
    where
        F: Fn() -> Box<dyn HostObject> + Send + Sync + 'static,
    {
        let name = descriptor.name.clone();
        self.register(descriptor)?;
        self.constructors.insert(name, Arc::new(constructor));
        Ok(())
    }

    pub fn descriptor(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn is_instantiable(&self, name: &TypeName) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build a new instance of `name`, if it has a constructor.
    ///
    /// This performs no access check; callers go through the gate first.
    pub fn instantiate(&self, name: &TypeName) -> Option<Box<dyn HostObject>> {
        self.constructors.get(name).map(|ctor| ctor())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self.descriptors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl HierarchyResolver for TypeTable {
    fn supertype_of(&self, type_name: &TypeName) -> Option<TypeName> {
        self.descriptors
            .get(type_name)
            .and_then(|d| d.supertype.clone())
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTable")
            .field("types", &self.names())
            .field("instantiable", &self.constructors.len())
            .finish()
    }
}
