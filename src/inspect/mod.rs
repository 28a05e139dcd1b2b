//! Inspection session: an open store plus the settings used to read it.

mod selection;

pub use selection::*;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geom::{DisplayTransform, PathGeometryBuilder, DEFAULT_DISPLAY_SCALE, RAY_LENGTH_NO_INTER};
use crate::store::{NodeStore, PathStore, QueryExecutor, SqliteStore};
use crate::util::Result;

/// Tunables for reading and displaying recorded paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Length of segments drawn for rays that hit nothing
    pub ray_length: f32,
    /// Uniform scale applied to ray geometry before drawing
    pub display_scale: f32,
    /// Check table layouts when the database is opened
    pub verify_schema: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            ray_length: RAY_LENGTH_NO_INTER,
            display_scale: DEFAULT_DISPLAY_SCALE,
            verify_schema: true,
        }
    }
}

/// Owns the query executor for the lifetime of a debug session.
pub struct Inspector<E = SqliteStore> {
    exec: E,
    config: InspectorConfig,
}

impl Inspector<SqliteStore> {
    /// Open the database at `path`, verifying its layout if configured to.
    pub fn open(path: impl AsRef<Path>, config: InspectorConfig) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        if config.verify_schema {
            store.verify_schema()?;
        }
        Ok(Self::new(store, config))
    }

    /// Release the database.
    pub fn close(self) -> Result<()> {
        self.exec.close()
    }
}

impl<E: QueryExecutor> Inspector<E> {
    /// Wrap an already open executor.
    pub fn new(exec: E, config: InspectorConfig) -> Self {
        Self { exec, config }
    }

    /// The underlying query executor.
    pub fn executor(&self) -> &E {
        &self.exec
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Node lookups against this session's store.
    pub fn nodes(&self) -> NodeStore<'_, E> {
        NodeStore::new(&self.exec)
    }

    /// Per-pixel path scans against this session's store.
    pub fn paths(&self) -> PathStore<'_, E> {
        PathStore::new(&self.exec)
    }

    /// Segment builder using the configured ray length.
    pub fn builder(&self) -> PathGeometryBuilder {
        PathGeometryBuilder::new(self.config.ray_length)
    }

    /// Scale applied to segments before drawing.
    pub fn display_transform(&self) -> DisplayTransform {
        DisplayTransform::scale(self.config.display_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let c = InspectorConfig::default();
        assert_eq!(c.ray_length, 500.0);
        assert_eq!(c.display_scale, 0.01);
        assert!(c.verify_schema);
    }

    #[test]
    fn test_config_partial_json() {
        let c: InspectorConfig = serde_json::from_str(r#"{"ray_length": 50.0}"#).unwrap();
        assert_eq!(c.ray_length, 50.0);
        assert_eq!(c.display_scale, 0.01);
    }

    #[test]
    fn test_builder_follows_config() {
        let config = InspectorConfig { ray_length: 5.0, display_scale: 1.0, verify_schema: false };
        let inspector = Inspector::new(SqliteStore::open_in_memory().unwrap(), config);
        assert_eq!(inspector.builder().ray_length, 5.0);
        assert_eq!(inspector.display_transform(), DisplayTransform::IDENTITY);
    }
}
