/*!
Element nodes.

An [`ElementNode`] is an immutable-after-construction record of one
accessibility element: what the OS reported for it at build time, plus the
path that addresses it within its snapshot. Children are owned exclusively
top-down; the parent link is the parent's path, re-resolved lazily, so the
tree never forms a reference cycle.
*/

use super::AttributeMap;
use crate::a11y;

/// One node of a tree snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
  /// OS-supplied role tag, e.g. `AXButton`, `AXWindow`, `AXRow`.
  pub role: String,

  /// Opaque identifier from the provider. Not guaranteed unique or stable.
  pub identifier: String,

  /// Attribute bag (title, value, description, label, placeholder, ...).
  pub attributes: AttributeMap,

  /// Names of the actions the element supports (e.g. `AXPress`).
  pub actions: Vec<String>,

  /// Whether the OS reports the element as visible.
  pub is_visible: bool,

  /// Derived once at construction from role + actions; never changes.
  pub is_interactive: bool,

  /// Root-to-node address, unique within one snapshot.
  /// Shaped like `/AXApplication/AXWindow[0]/AXButton[2]`.
  pub accessibility_path: String,

  /// Path of the parent node. `None` for the root.
  pub parent_path: Option<String>,

  /// Child nodes, in provider order, truncated to the build's fanout limit.
  pub children: Vec<ElementNode>,
}

impl ElementNode {
  /// Construct a childless node, deriving `is_interactive` from the role
  /// and action set.
  pub fn new(
    role: impl Into<String>,
    identifier: impl Into<String>,
    attributes: AttributeMap,
    actions: Vec<String>,
    is_visible: bool,
    accessibility_path: impl Into<String>,
    parent_path: Option<String>,
  ) -> Self {
    let role = role.into();
    let is_interactive = a11y::derives_interactive(&role, &actions);
    Self {
      role,
      identifier: identifier.into(),
      attributes,
      actions,
      is_visible,
      is_interactive,
      accessibility_path: accessibility_path.into(),
      parent_path,
      children: Vec::new(),
    }
  }

  /// Total number of nodes in this subtree, including self.
  pub fn subtree_len(&self) -> usize {
    let mut count = 0;
    let mut stack = vec![self];
    while let Some(node) = stack.pop() {
      count += 1;
      stack.extend(node.children.iter());
    }
    count
  }
}
