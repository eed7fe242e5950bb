/*!
Substring search over flattened snapshots.

Each element contributes one searchable string: role, the fixed attribute
set (title, value, description, label, placeholder), and its action names,
space-joined. Matching is plain substring containment, case-folded unless
the caller asked for case sensitivity.

This is a memoization layer, not an inverted index - element counts are in
the hundreds, and results are dropped with the snapshot anyway.
*/

use crate::types::ElementSummary;

/// Attribute keys that contribute to the searchable string.
pub(crate) const SEARCHED_ATTRIBUTES: &[&str] =
  &["title", "value", "description", "label", "placeholder"];

/// Normalized cache key for one search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SearchKey {
  query: String,
  case_sensitive: bool,
}

impl SearchKey {
  /// Normalize the raw query: trim, and case-fold unless sensitive.
  pub(crate) fn new(query: &str, case_sensitive: bool) -> Self {
    let trimmed = query.trim();
    let query = if case_sensitive {
      trimmed.to_owned()
    } else {
      trimmed.to_lowercase()
    };
    Self {
      query,
      case_sensitive,
    }
  }

  /// The normalized query text.
  pub(crate) fn query(&self) -> &str {
    &self.query
  }

  /// Does the element's searchable text contain the query?
  pub(crate) fn matches(&self, summary: &ElementSummary) -> bool {
    searchable_text(summary, self.case_sensitive).contains(&self.query)
  }
}

/// The per-element string searches run against.
pub(crate) fn searchable_text(summary: &ElementSummary, case_sensitive: bool) -> String {
  let mut parts: Vec<String> = vec![summary.role.clone()];

  for key in SEARCHED_ATTRIBUTES {
    if let Some(value) = summary.attributes.get(*key) {
      let text = scalar_text(value);
      if !text.trim().is_empty() {
        parts.push(text);
      }
    }
  }

  parts.extend(summary.actions.iter().cloned());

  let joined = parts.join(" ");
  if case_sensitive {
    joined
  } else {
    joined.to_lowercase()
  }
}

fn scalar_text(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
