/*!
Tree snapshots.

A snapshot is one immutable materialization of a process's UI tree at a
point in time. Snapshots are replaced wholesale on rebuild - there is no
incremental patching, so node identity never survives a rebuild.
*/

use super::{ElementNode, ProcessId};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// How a snapshot was traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  /// Reduced depth/fanout for fast initial discovery.
  Lazy,
  /// Forced or explicit-limit traversal for completeness.
  Full,
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Lazy => f.write_str("lazy"),
      Self::Full => f.write_str("full"),
    }
  }
}

/// One immutable materialization of a process's accessibility tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
  /// Process the tree was read from.
  pub pid: ProcessId,

  /// Root element (normally the application element).
  pub root: ElementNode,

  /// Traversal mode the builder ran in.
  pub mode: BuildMode,

  /// Total number of nodes materialized.
  pub node_count: usize,

  /// Wall-clock time the build took, OS calls included.
  pub build_duration: Duration,

  built_at: Instant,
}

impl TreeSnapshot {
  pub(crate) fn new(
    pid: ProcessId,
    root: ElementNode,
    mode: BuildMode,
    build_duration: Duration,
  ) -> Self {
    let node_count = root.subtree_len();
    Self {
      pid,
      root,
      mode,
      node_count,
      build_duration,
      built_at: Instant::now(),
    }
  }

  /// When the build completed.
  pub fn built_at(&self) -> Instant {
    self.built_at
  }

  /// Age of the snapshot, measured from build completion.
  pub fn age(&self) -> Duration {
    self.built_at.elapsed()
  }
}
