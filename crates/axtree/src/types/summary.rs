/*!
JSON-safe projections handed to consumers.

Summaries are where attribute sanitization happens - exactly once, when a
snapshot is flattened - so HTTP/CLI/LLM consumers downstream never have to
re-sanitize per endpoint.
*/

use super::{ElementNode, ProcessId};
use serde::Serialize;
use std::time::Duration;

/// Flat, serializable view of one element within the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSummary {
  /// OS role tag.
  pub role: String,

  /// Opaque provider identifier.
  pub identifier: String,

  /// Attributes, already scalarized.
  pub attributes: serde_json::Map<String, serde_json::Value>,

  /// Whether the element was visible at build time.
  pub is_visible: bool,

  /// Whether the element is actionable.
  pub is_interactive: bool,

  /// Short handle assigned to interactive elements during flattening.
  /// Valid only against the flattening that produced it, never across a
  /// rebuild.
  pub highlight_index: Option<u32>,

  /// Supported action names.
  pub actions: Vec<String>,

  /// Number of children materialized under the element.
  pub children_count: usize,

  /// Address of the element within its snapshot.
  pub path: String,

  /// Address of the parent, if any.
  pub parent_path: Option<String>,
}

impl ElementSummary {
  pub(crate) fn from_node(node: &ElementNode, highlight_index: Option<u32>) -> Self {
    Self {
      role: node.role.clone(),
      identifier: node.identifier.clone(),
      attributes: node.attributes.sanitized(),
      is_visible: node.is_visible,
      is_interactive: node.is_interactive,
      highlight_index,
      actions: node.actions.clone(),
      children_count: node.children.len(),
      path: node.accessibility_path.clone(),
      parent_path: node.parent_path.clone(),
    }
  }
}

/// Outcome of a substring search over a flattened snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
  /// Elements whose searchable text contained the query.
  pub matches: Vec<ElementSummary>,

  /// Number of matches.
  pub total_count: usize,

  /// Time the call took, cache hits included.
  pub elapsed: Duration,
}

/// Age of one process's snapshot, for diagnostics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SnapshotAge {
  /// Process id.
  pub pid: ProcessId,
  /// Seconds since the snapshot was built.
  pub age_secs: f64,
}

/// Cache-wide counters, for diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
  /// Processes with a live snapshot.
  pub snapshots: usize,
  /// Processes with a memoized flattened index.
  pub flattened_indexes: usize,
  /// Memoized search results across all processes.
  pub search_entries: usize,
  /// Snapshot ages, sorted by process id.
  pub snapshot_ages: Vec<SnapshotAge>,
}
