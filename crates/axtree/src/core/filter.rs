/*!
Interactive filter.

Prunes a snapshot to actionable and structural nodes only, for consumers
that cannot afford the full tree (an LLM prompt, a terse CLI listing). Pure
over its inputs: the snapshot is never mutated and identical inputs yield
identical output.

A node is retained when it is directly interactive, is one of the structural
container roles, or has an interactive descendant within a two-level
lookahead; display-only rows/cells/tables are dropped outright unless
interactive. Each retained container's children are capped to bound output
size.
*/

use super::flatten::FlattenedIndex;
use crate::a11y;
use crate::types::{ElementNode, ElementSummary};
use serde::Serialize;

/// Cap on retained children per node.
pub(crate) const MAX_FILTERED_CHILDREN: usize = 50;

/// How deep to look for interactive descendants when deciding retention.
const DESCENDANT_LOOKAHEAD: usize = 2;

/// One node of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveNode {
  /// Summary of the underlying element, highlight index included.
  pub element: ElementSummary,

  /// Retained children. Empty past the depth cutoff.
  pub children: Vec<InteractiveNode>,

  /// False when the depth cutoff stopped expansion here.
  pub is_expanded: bool,
}

/// Build the filtered view of `node`, expanding `max_depth` levels.
pub(crate) fn interactive_view(
  node: &ElementNode,
  index: &FlattenedIndex,
  max_depth: usize,
) -> InteractiveNode {
  view_node(node, index, max_depth, 0)
}

fn view_node(
  node: &ElementNode,
  index: &FlattenedIndex,
  max_depth: usize,
  depth: usize,
) -> InteractiveNode {
  let is_expanded = depth < max_depth;
  let children = if is_expanded {
    retained_children(node)
      .into_iter()
      .map(|child| view_node(child, index, max_depth, depth + 1))
      .collect()
  } else {
    Vec::new()
  };

  InteractiveNode {
    element: summary_for(node, index),
    children,
    is_expanded,
  }
}

fn summary_for(node: &ElementNode, index: &FlattenedIndex) -> ElementSummary {
  index
    .by_path(&node.accessibility_path)
    .cloned()
    .unwrap_or_else(|| ElementSummary::from_node(node, None))
}

fn retained_children(node: &ElementNode) -> Vec<&ElementNode> {
  let mut kept: Vec<&ElementNode> = node.children.iter().filter(|c| should_retain(c)).collect();
  kept.truncate(MAX_FILTERED_CHILDREN);
  kept
}

fn should_retain(node: &ElementNode) -> bool {
  if a11y::is_excluded_display(&node.role) && !node.is_interactive {
    return false;
  }
  if node.is_interactive {
    return true;
  }
  if a11y::is_structural_container(&node.role) {
    return true;
  }
  has_interactive_descendant(node, 0)
}

fn has_interactive_descendant(node: &ElementNode, depth: usize) -> bool {
  if depth >= DESCENDANT_LOOKAHEAD {
    return false;
  }
  node.children.iter().any(|child| {
    if a11y::is_excluded_display(&child.role) && !child.is_interactive {
      return false;
    }
    child.is_interactive || has_interactive_descendant(child, depth + 1)
  })
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

  #[test]
  fn retains_buttons_and_drops_decorative_text() {
    // Container with 3 buttons and one purely decorative static-text subtree.
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![node(
        "AXGroup",
        "/AXWindow/AXGroup[0]",
        vec![
          node("AXButton", "/AXWindow/AXGroup[0]/AXButton[0]", vec![]),
          node("AXButton", "/AXWindow/AXGroup[0]/AXButton[1]", vec![]),
          node("AXButton", "/AXWindow/AXGroup[0]/AXButton[2]", vec![]),
          node("AXStaticText", "/AXWindow/AXGroup[0]/AXStaticText[3]", vec![]),
        ],
      )],
    );

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 5);

    assert_eq!(view.children.len(), 1, "container group survives");
    let group = &view.children[0];
    assert_eq!(group.element.role, "AXGroup");
    assert_eq!(group.children.len(), 3, "decorative text is pruned");
    assert!(group.children.iter().all(|c| c.element.role == "AXButton"));
  }

  #[test]
  fn drops_rows_but_keeps_interactive_rows() {
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![
        node("AXRow", "/AXWindow/AXRow[0]", vec![]),
        ElementNode::new(
          "AXRow",
          "",
          AttributeMap::new(),
          vec!["AXPress".to_owned()],
          true,
          "/AXWindow/AXRow[1]",
          None,
        ),
      ],
    );

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 3);
    assert_eq!(view.children.len(), 1);
    assert!(view.children[0].element.is_interactive);
  }

  #[test]
  fn keeps_plain_nodes_with_nearby_interactive_descendants() {
    // AXUnknown wrapper two levels above a button: inside the lookahead.
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![node(
        "AXUnknown",
        "/AXWindow/AXUnknown[0]",
        vec![node(
          "AXButton",
          "/AXWindow/AXUnknown[0]/AXButton[0]",
          vec![],
        )],
      )],
    );

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 4);
    assert_eq!(view.children.len(), 1);
    assert_eq!(view.children[0].children.len(), 1);
  }

  #[test]
  fn prunes_plain_nodes_beyond_the_lookahead() {
    // Button is three wrapper levels down: outside the 2-level lookahead.
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![node(
        "AXUnknown",
        "/AXWindow/AXUnknown[0]",
        vec![node(
          "AXUnknown",
          "/AXWindow/AXUnknown[0]/AXUnknown[0]",
          vec![node(
            "AXUnknown",
            "/AXWindow/AXUnknown[0]/AXUnknown[0]/AXUnknown[0]",
            vec![node(
              "AXButton",
              "/AXWindow/AXUnknown[0]/AXUnknown[0]/AXUnknown[0]/AXButton[0]",
              vec![],
            )],
          )],
        )],
      )],
    );

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 6);
    assert!(view.children.is_empty());
  }

  #[test]
  fn caps_children_per_container() {
    let buttons: Vec<ElementNode> = (0..60)
      .map(|i| node("AXButton", &format!("/AXWindow/AXButton[{i}]"), vec![]))
      .collect();
    let tree = node("AXWindow", "/AXWindow", buttons);

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 2);
    assert_eq!(view.children.len(), MAX_FILTERED_CHILDREN);
  }

  #[test]
  fn depth_cutoff_marks_unexpanded_nodes() {
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![node(
        "AXGroup",
        "/AXWindow/AXGroup[0]",
        vec![node("AXButton", "/AXWindow/AXGroup[0]/AXButton[0]", vec![])],
      )],
    );

    let index = FlattenedIndex::from_root(&tree);
    let view = interactive_view(&tree, &index, 1);
    assert!(view.is_expanded);
    let group = &view.children[0];
    assert!(!group.is_expanded);
    assert!(group.children.is_empty());
  }

  #[test]
  fn identical_inputs_yield_identical_output() {
    let tree = node(
      "AXWindow",
      "/AXWindow",
      vec![node(
        "AXGroup",
        "/AXWindow/AXGroup[0]",
        vec![node("AXButton", "/AXWindow/AXGroup[0]/AXButton[0]", vec![])],
      )],
    );

    let index = FlattenedIndex::from_root(&tree);
    let first = interactive_view(&tree, &index, 3);
    let second = interactive_view(&tree, &index, 3);
    assert_eq!(first, second);
  }
}
