/*!
Path resolution.

Paths are the stable handle within one snapshot: depth-first search over the
owned tree, comparing `accessibility_path`. Misses are typed results at the
cache boundary, never faults.
*/

use crate::types::ElementNode;

/// Depth-first search for the node carrying `path`.
pub(crate) fn find_by_path<'a>(node: &'a ElementNode, path: &str) -> Option<&'a ElementNode> {
  if node.accessibility_path == path {
    return Some(node);
  }
  node
    .children
    .iter()
    .find_map(|child| find_by_path(child, path))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::AttributeMap;

  fn node(role: &str, path: &str, children: Vec<ElementNode>) -> ElementNode {
    let mut node = ElementNode::new(
      role,
      "",
      AttributeMap::new(),
      Vec::new(),
      true,
      path,
      None,
    );
    node.children = children;
    node
  }

  fn sample_tree() -> ElementNode {
    node(
      "AXApplication",
      "/AXApplication",
      vec![node(
        "AXWindow",
        "/AXApplication/AXWindow[0]",
        vec![
          node("AXButton", "/AXApplication/AXWindow[0]/AXButton[0]", vec![]),
          node("AXButton", "/AXApplication/AXWindow[0]/AXButton[1]", vec![]),
        ],
      )],
    )
  }

  #[test]
  fn finds_root_and_leaves() {
    let tree = sample_tree();
    assert!(find_by_path(&tree, "/AXApplication").is_some());

    let leaf = find_by_path(&tree, "/AXApplication/AXWindow[0]/AXButton[1]");
    assert_eq!(leaf.map(|n| n.role.as_str()), Some("AXButton"));
  }

  #[test]
  fn misses_return_none() {
    let tree = sample_tree();
    assert!(find_by_path(&tree, "/AXApplication/AXWindow[0]/AXButton[9]").is_none());
    assert!(find_by_path(&tree, "").is_none());
  }
}
