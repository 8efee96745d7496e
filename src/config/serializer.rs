// src/config/serializer.rs

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::QualificationConfiguration;
use crate::errors::{QualificationError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Writes a [`QualificationConfiguration`] to a file the PK-Sim CLI can read.
///
/// Implementations must either write the complete file or fail; callers treat
/// any error as "no run attempted".
pub trait ConfigSerializer: Send + Sync {
    fn serialize(&self, config: &QualificationConfiguration, destination: &Path) -> Result<()>;
}

/// Pretty-printed JSON through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct JsonConfigSerializer {
    fs: Arc<dyn FileSystem>,
}

impl JsonConfigSerializer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Default for JsonConfigSerializer {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ConfigSerializer for JsonConfigSerializer {
    fn serialize(&self, config: &QualificationConfiguration, destination: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(config)?;

        self.fs
            .write(destination, &json)
            .map_err(|source| QualificationError::ConfigWrite {
                path: destination.to_path_buf(),
                source,
            })?;

        debug!(
            project = %config.project_id(),
            path = ?destination,
            bytes = json.len(),
            "qualification configuration written"
        );
        Ok(())
    }
}
