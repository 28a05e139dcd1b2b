//! Interactive selection: pixel -> paths -> path geometry -> node detail.
//!
//! Requests that point past the end of a list leave the selection as it
//! was and report [`Transition::Ignored`]. Store failures are returned as
//! errors, also without touching the selection.

use tracing::debug;

use super::Inspector;
use crate::core::{RayNode, RayPath};
use crate::geom::PathGeometry;
use crate::store::QueryExecutor;
use crate::util::Result;

/// Outcome of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

/// Where the controller currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoPixelSelected,
    PathsListed { row: i32, col: i32, count: usize },
    PathChosen { path: usize },
    NodeChosen { path: usize, node: usize },
}

#[derive(Debug)]
struct ChosenPath {
    index: usize,
    geometry: PathGeometry,
    node: Option<(usize, RayNode)>,
}

/// Selection state for one debug session.
#[derive(Debug, Default)]
pub struct SelectionController {
    pixel: Option<(i32, i32)>,
    paths: Vec<RayPath>,
    chosen: Option<ChosenPath>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in the pixel -> path -> node chain.
    pub fn state(&self) -> SelectionState {
        match (self.pixel, &self.chosen) {
            (None, _) => SelectionState::NoPixelSelected,
            (Some((row, col)), None) => SelectionState::PathsListed { row, col, count: self.paths.len() },
            (Some(_), Some(c)) => match &c.node {
                None => SelectionState::PathChosen { path: c.index },
                Some((node, _)) => SelectionState::NodeChosen { path: c.index, node: *node },
            },
        }
    }

    /// Load the paths recorded for pixel (`row`, `col`), dropping any chosen path.
    #[tracing::instrument(level = "debug", skip(self, inspector))]
    pub fn set_pixel<E: QueryExecutor>(
        &mut self,
        inspector: &Inspector<E>,
        row: i32,
        col: i32,
    ) -> Result<Transition> {
        let paths = inspector.paths().select_paths(row, col)?;
        debug!(count = paths.len(), "pixel selected");

        self.pixel = Some((row, col));
        self.paths = paths;
        self.chosen = None;
        Ok(Transition::Applied)
    }

    /// Choose path `idx` of the current pixel and rebuild its geometry.
    pub fn choose_path<E: QueryExecutor>(&mut self, inspector: &Inspector<E>, idx: usize) -> Result<Transition> {
        let Some(path) = self.paths.get(idx) else {
            debug!(idx, count = self.paths.len(), "path index out of range");
            return Ok(Transition::Ignored);
        };

        let geometry = inspector.builder().build(inspector.nodes(), path)?;
        self.chosen = Some(ChosenPath { index: idx, geometry, node: None });
        Ok(Transition::Applied)
    }

    /// Resolve node `idx` of the chosen path for the detail view.
    ///
    /// Ignored without a chosen path, for an index past the path's node
    /// count, or when the node id is not in the store.
    pub fn choose_node<E: QueryExecutor>(&mut self, inspector: &Inspector<E>, idx: usize) -> Result<Transition> {
        let Some(id) = self.chosen_path().and_then(|p| p.get_node_id(idx)) else {
            debug!(idx, "node index out of range");
            return Ok(Transition::Ignored);
        };

        let Some(node) = inspector.nodes().get_node(id)? else {
            return Ok(Transition::Ignored);
        };

        if let Some(chosen) = &mut self.chosen {
            chosen.node = Some((idx, node));
        }
        Ok(Transition::Applied)
    }

    /// Forget everything, back to no pixel selected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last pixel applied, if any.
    pub fn pixel(&self) -> Option<(i32, i32)> {
        self.pixel
    }

    /// Paths of the current pixel in store order.
    pub fn paths(&self) -> &[RayPath] {
        &self.paths
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn chosen_path_index(&self) -> Option<usize> {
        self.chosen.as_ref().map(|c| c.index)
    }

    /// The chosen path record.
    pub fn chosen_path(&self) -> Option<&RayPath> {
        self.chosen.as_ref().and_then(|c| self.paths.get(c.index))
    }

    /// Declared node count of the chosen path, 0 when none is chosen.
    pub fn node_count(&self) -> usize {
        self.chosen_path().map_or(0, RayPath::node_count)
    }

    /// Unscaled segments of the chosen path.
    pub fn geometry(&self) -> Option<&PathGeometry> {
        self.chosen.as_ref().map(|c| &c.geometry)
    }

    /// Node resolved by the last successful `choose_node`.
    pub fn chosen_node(&self) -> Option<&RayNode> {
        self.chosen.as_ref().and_then(|c| c.node.as_ref()).map(|(_, n)| n)
    }

    /// Text dump of the chosen node for the detail view.
    pub fn node_detail(&self) -> Option<String> {
        self.chosen_node().map(RayNode::detail)
    }
}
