// name.rs — Type names and descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully-qualified identity of a host type, e.g. `"com.acme.Car"`.
///
/// Equality is exact string identity. `"com.acme.Car"` and
/// `"com.acme.car"` are different types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata for one host type: its name and its direct supertype.
///
/// Root types have no supertype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<TypeName>,
}

impl TypeDescriptor {
    /// Describe a root type.
    pub fn root(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
        }
    }

    /// Describe a type that directly extends `supertype`.
    pub fn extending(name: impl Into<TypeName>, supertype: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            supertype: Some(supertype.into()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.supertype.is_none()
    }
}
