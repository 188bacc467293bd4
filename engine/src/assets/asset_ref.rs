use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to an asset owned by the host (mesh, material, haptic
/// effect, class template). Loading is the host's business; gameplay code only
/// carries the name around and checks whether one was configured.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(name: &str) -> Self {
        AssetRef::new(name)
    }
}
