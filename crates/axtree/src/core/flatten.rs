/*!
Flattened index.

A pre-order projection of one snapshot into [`ElementSummary`] rows, with
lookup maps by path and by highlight index. This is the pass that assigns
highlight indices: interactive nodes get consecutive integers in document
order, unique within the pass and meaningless outside it.

The index is memoized per process and dropped whenever the snapshot is
invalidated, so a highlight index can never silently outlive the tree that
produced it.
*/

use crate::types::{ElementNode, ElementSummary, TreeSnapshot};
use std::collections::HashMap;

/// Ordered summaries of every node in one snapshot.
#[derive(Debug, Clone, Default)]
pub struct FlattenedIndex {
  entries: Vec<ElementSummary>,
  by_path: HashMap<String, usize>,
  by_highlight: HashMap<u32, usize>,
}

impl FlattenedIndex {
  pub(crate) fn from_snapshot(snapshot: &TreeSnapshot) -> Self {
    Self::from_root(&snapshot.root)
  }

  pub(crate) fn from_root(root: &ElementNode) -> Self {
    let mut index = Self::default();
    let mut next_highlight = 0u32;
    index.collect(root, &mut next_highlight);
    index
  }

  fn collect(&mut self, node: &ElementNode, next_highlight: &mut u32) {
    let highlight = if node.is_interactive {
      let assigned = *next_highlight;
      *next_highlight += 1;
      Some(assigned)
    } else {
      None
    };

    let entry = ElementSummary::from_node(node, highlight);
    let slot = self.entries.len();
    if let Some(assigned) = highlight {
      self.by_highlight.insert(assigned, slot);
    }
    self.by_path.insert(entry.path.clone(), slot);
    self.entries.push(entry);

    for child in &node.children {
      self.collect(child, next_highlight);
    }
  }

  /// All summaries, in document (pre-)order.
  pub fn entries(&self) -> &[ElementSummary] {
    &self.entries
  }

  /// Number of summarized nodes.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the index holds no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Look up a summary by accessibility path.
  pub fn by_path(&self, path: &str) -> Option<&ElementSummary> {
    self.by_path.get(path).and_then(|slot| self.entries.get(*slot))
  }

  /// Look up a summary by highlight index.
  pub fn by_highlight(&self, index: u32) -> Option<&ElementSummary> {
    self
      .by_highlight
      .get(&index)
      .and_then(|slot| self.entries.get(*slot))
  }
}
