/*!
Tree builder.

Performs one bounded, heuristic-guided walk of a process's live hierarchy
into an owned [`ElementNode`] tree. The walk trades completeness for cost:

- interactive nodes expand while depth budget remains;
- structural containers expand, but only to a tighter sub-depth;
- pure-display roles (rows, cells, tables, static text) are never expanded,
  even with budget remaining;
- everything else expands only near the surface.

Excess children are silently truncated to the fanout limit - documented
lossy behavior, not an error. Per-subtree provider failures are absorbed as
"zero children" / "empty attributes" and logged; only failure to resolve the
root element aborts the build.
*/

use crate::a11y;
use crate::provider::{AccessibilityNode, AccessibilityProvider, ProviderError};
use crate::types::{AttributeMap, AxTreeError, AxTreeResult, BuildMode, ElementNode, ProcessId};

/// Structural containers stop expanding past this depth.
const STRUCTURAL_SUB_DEPTH: usize = 3;

/// Roles outside every allow-list stop expanding past this depth.
const FALLBACK_EXPANSION_DEPTH: usize = 2;

/// Role recorded when the provider cannot name one for the root.
const UNKNOWN_ROLE: &str = "AXUnknown";

/// Per-process traversal knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
  /// Maximum recursion depth from the root.
  pub max_depth: usize,
  /// Maximum children materialized per node; the rest are truncated.
  pub max_children: usize,
}

impl Default for BuilderConfig {
  fn default() -> Self {
    Self {
      max_depth: 4,
      max_children: 50,
    }
  }
}

impl BuilderConfig {
  /// Reduced limits for fast initial discovery.
  pub const fn lazy() -> Self {
    Self {
      max_depth: 3,
      max_children: 25,
    }
  }
}

/// Per-call build options.
///
/// `max_depth` is a one-off override resolved into a per-call config copy,
/// so it can never leak into later builds for the same process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
  /// Rebuild even when a fresh snapshot exists.
  pub force_refresh: bool,
  /// Use the reduced lazy limits instead of the stored config.
  pub lazy: bool,
  /// Explicit depth override for this call only.
  pub max_depth: Option<usize>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self::lazy()
  }
}

impl BuildOptions {
  /// Lazy discovery build (the default).
  pub const fn lazy() -> Self {
    Self {
      force_refresh: false,
      lazy: true,
      max_depth: None,
    }
  }

  /// Full build with the stored per-process limits.
  pub const fn full() -> Self {
    Self {
      force_refresh: false,
      lazy: false,
      max_depth: None,
    }
  }

  /// Rebuild even when a fresh snapshot exists.
  pub const fn forced(mut self) -> Self {
    self.force_refresh = true;
    self
  }

  /// Override the depth budget for this call only.
  pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = Some(max_depth);
    self
  }

  pub(crate) const fn mode(&self) -> BuildMode {
    if self.lazy {
      BuildMode::Lazy
    } else {
      BuildMode::Full
    }
  }

  /// Resolve the effective config for one call. An explicit depth override
  /// wins, then lazy limits, then the stored per-process config.
  pub(crate) fn effective_config(&self, stored: BuilderConfig) -> BuilderConfig {
    if let Some(max_depth) = self.max_depth {
      BuilderConfig {
        max_depth,
        ..stored
      }
    } else if self.lazy {
      BuilderConfig::lazy()
    } else {
      stored
    }
  }
}

/// One bounded walk over a provider hierarchy.
pub(crate) struct TreeBuilder {
  config: BuilderConfig,
  /// When set, the depth budget restarts at this path - used for deeper
  /// on-demand expansion of one subtree.
  anchor: Option<String>,
}

impl TreeBuilder {
  pub(crate) const fn new(config: BuilderConfig) -> Self {
    Self {
      config,
      anchor: None,
    }
  }

  /// Restart the depth budget at `anchor` - deeper on-demand expansion.
  pub(crate) fn anchored(mut self, anchor: Option<String>) -> Self {
    self.anchor = anchor;
    self
  }

  /// Walk the live hierarchy of `pid` into an owned tree.
  pub(crate) fn build<P: AccessibilityProvider>(
    &self,
    provider: &P,
    pid: ProcessId,
  ) -> AxTreeResult<ElementNode> {
    let root = provider.root_element(pid).map_err(|error| match error {
      ProviderError::PermissionDenied => AxTreeError::PermissionDenied,
      ProviderError::ProcessNotFound
      | ProviderError::DeadReference
      | ProviderError::AttributeUnavailable(_)
      | ProviderError::Other(_) => AxTreeError::ProcessNotFound(pid),
    })?;

    let role = match root.role() {
      Ok(role) => role,
      Err(error) => {
        log::debug!("root role unreadable for pid {pid}: {error}");
        UNKNOWN_ROLE.to_owned()
      }
    };
    let path = format!("/{role}");
    Ok(self.assemble(&root, role, path, None, 0))
  }

  fn assemble<N: AccessibilityNode>(
    &self,
    handle: &N,
    role: String,
    path: String,
    parent_path: Option<String>,
    depth: usize,
  ) -> ElementNode {
    // Deeper on-demand expansion: the budget restarts at the anchor.
    let depth = if self.anchor.as_deref() == Some(path.as_str()) {
      0
    } else {
      depth
    };

    let attributes = handle.attributes().unwrap_or_else(|error| {
      log::debug!("attributes unavailable at {path}: {error}");
      AttributeMap::new()
    });
    let actions = handle.actions().unwrap_or_else(|error| {
      log::debug!("actions unavailable at {path}: {error}");
      Vec::new()
    });

    let is_interactive = a11y::derives_interactive(&role, &actions);
    let children = if self.should_expand(&role, is_interactive, depth) {
      self.assemble_children(handle, &path, depth)
    } else {
      Vec::new()
    };

    let mut node = ElementNode::new(
      role,
      handle.identifier(),
      attributes,
      actions,
      handle.is_visible(),
      path,
      parent_path,
    );
    node.children = children;
    node
  }

  fn assemble_children<N: AccessibilityNode>(
    &self,
    parent: &N,
    parent_path: &str,
    depth: usize,
  ) -> Vec<ElementNode> {
    let mut handles = match parent.children() {
      Ok(handles) => handles,
      Err(error) => {
        log::debug!("children unavailable under {parent_path}: {error}");
        return Vec::new();
      }
    };

    if handles.len() > self.config.max_children {
      log::debug!(
        "truncating {} children under {parent_path} to {}",
        handles.len(),
        self.config.max_children
      );
      handles.truncate(self.config.max_children);
    }

    let mut children = Vec::with_capacity(handles.len());
    for handle in &handles {
      let role = match handle.role() {
        Ok(role) => role,
        Err(error) => {
          log::debug!("skipping unreadable child under {parent_path}: {error}");
          continue;
        }
      };
      let index = children.len();
      let path = format!("{parent_path}/{role}[{index}]");
      children.push(self.assemble(handle, role, path, Some(parent_path.to_owned()), depth + 1));
    }
    children
  }

  /// Expansion heuristic, applied regardless of remaining budget.
  fn should_expand(&self, role: &str, is_interactive: bool, depth: usize) -> bool {
    if depth >= self.config.max_depth {
      return false;
    }
    if is_interactive {
      return true;
    }
    if a11y::is_expandable_container(role) {
      return depth < STRUCTURAL_SUB_DEPTH.min(self.config.max_depth);
    }
    if a11y::is_display_only(role) {
      return false;
    }
    depth < FALLBACK_EXPANSION_DEPTH
  }
}
