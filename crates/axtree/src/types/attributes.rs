/*!
Element attributes.

Attributes are the string-keyed heterogeneous bag the OS reports per element
(title, value, description, label, placeholder, ...). They stay typed inside
the crate; [`AttributeMap::sanitized`] is the single scalarize projection
applied at the serialization boundary, never ad hoc per consumer.
*/

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Typed attribute value as retrieved from the accessibility layer.
///
/// Scalars survive serialization as themselves; everything else is coerced
/// to its string form exactly once, in [`AttrValue::scalarize`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
  /// Text content (titles, labels, placeholder strings).
  Text(String),

  /// Integral value (row counts, indices).
  Integer(i64),

  /// Floating-point value (slider positions, progress).
  Number(f64),

  /// Boolean state (enabled, selected).
  Flag(bool),

  /// Ordered collection of values.
  List(Vec<AttrValue>),

  /// A value the provider could only describe as text (opaque OS objects).
  Opaque(String),
}

impl AttrValue {
  /// Get as string slice if this is a Text value.
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      Self::Integer(_) | Self::Number(_) | Self::Flag(_) | Self::List(_) | Self::Opaque(_) => None,
    }
  }

  /// Get as i64 if this is an Integer value.
  pub const fn as_integer(&self) -> Option<i64> {
    match self {
      Self::Integer(n) => Some(*n),
      Self::Text(_) | Self::Number(_) | Self::Flag(_) | Self::List(_) | Self::Opaque(_) => None,
    }
  }

  /// Get as f64 if this is a Number value.
  pub const fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      Self::Text(_) | Self::Integer(_) | Self::Flag(_) | Self::List(_) | Self::Opaque(_) => None,
    }
  }

  /// Get as bool if this is a Flag value.
  pub const fn as_flag(&self) -> Option<bool> {
    match self {
      Self::Flag(b) => Some(*b),
      Self::Text(_) | Self::Integer(_) | Self::Number(_) | Self::List(_) | Self::Opaque(_) => None,
    }
  }

  /// Project to a JSON-safe scalar.
  ///
  /// Scalars map to their JSON counterparts; lists, opaque values, and
  /// non-finite floats are coerced to their string form.
  pub fn scalarize(&self) -> serde_json::Value {
    match self {
      Self::Text(s) => serde_json::Value::String(s.clone()),
      Self::Integer(n) => serde_json::Value::Number((*n).into()),
      Self::Number(n) => serde_json::Number::from_f64(*n)
        .map_or_else(|| serde_json::Value::String(self.to_string()), serde_json::Value::Number),
      Self::Flag(b) => serde_json::Value::Bool(*b),
      Self::List(_) | Self::Opaque(_) => serde_json::Value::String(self.to_string()),
    }
  }
}

impl fmt::Display for AttrValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) | Self::Opaque(s) => f.write_str(s),
      Self::Integer(n) => write!(f, "{n}"),
      Self::Number(n) => write!(f, "{n}"),
      Self::Flag(b) => write!(f, "{b}"),
      Self::List(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{item}")?;
        }
        f.write_str("]")
      }
    }
  }
}

impl From<&str> for AttrValue {
  fn from(s: &str) -> Self {
    Self::Text(s.to_owned())
  }
}

impl From<String> for AttrValue {
  fn from(s: String) -> Self {
    Self::Text(s)
  }
}

impl From<i64> for AttrValue {
  fn from(n: i64) -> Self {
    Self::Integer(n)
  }
}

impl From<i32> for AttrValue {
  fn from(n: i32) -> Self {
    Self::Integer(i64::from(n))
  }
}

impl From<f64> for AttrValue {
  fn from(n: f64) -> Self {
    Self::Number(n)
  }
}

impl From<bool> for AttrValue {
  fn from(b: bool) -> Self {
    Self::Flag(b)
  }
}

impl From<Vec<AttrValue>> for AttrValue {
  fn from(items: Vec<AttrValue>) -> Self {
    Self::List(items)
  }
}

/// String-keyed attribute container for one element.
///
/// Keys use the OS vocabulary ("title", "value", "description", ...).
/// Ordered so snapshots and summaries serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
  entries: BTreeMap<String, AttrValue>,
}

impl AttributeMap {
  /// Create an empty map.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace an attribute.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
    self.entries.insert(key.into(), value.into());
  }

  /// Get an attribute by key.
  pub fn get(&self, key: &str) -> Option<&AttrValue> {
    self.entries.get(key)
  }

  /// Get an attribute's text content, if it is a Text value.
  pub fn text(&self, key: &str) -> Option<&str> {
    self.entries.get(key).and_then(AttrValue::as_text)
  }

  /// Number of attributes.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the map holds no attributes.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate over `(key, value)` pairs in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// The one scalarize projection: every value becomes a JSON scalar.
  ///
  /// Applied when summaries are built, so downstream consumers never see a
  /// non-serializable attribute.
  pub fn sanitized(&self) -> serde_json::Map<String, serde_json::Value> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.clone(), value.scalarize()))
      .collect()
  }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttributeMap {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = Self::new();
    for (key, value) in iter {
      map.insert(key, value);
    }
    map
  }
}

impl Serialize for AttributeMap {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.sanitized().serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_accessor() {
    let mut map = AttributeMap::new();
    map.insert("title", "Save");
    assert_eq!(map.text("title"), Some("Save"));
    assert_eq!(map.text("value"), None);
  }

  #[test]
  fn scalars_survive_scalarize() {
    assert_eq!(
      AttrValue::Text("hi".into()).scalarize(),
      serde_json::json!("hi")
    );
    assert_eq!(AttrValue::Integer(3).scalarize(), serde_json::json!(3));
    assert_eq!(AttrValue::Flag(true).scalarize(), serde_json::json!(true));
    assert_eq!(AttrValue::Number(1.5).scalarize(), serde_json::json!(1.5));
  }

  #[test]
  fn non_scalars_become_strings() {
    let list = AttrValue::List(vec![AttrValue::from("a"), AttrValue::from(2i64)]);
    assert_eq!(list.scalarize(), serde_json::json!("[a, 2]"));

    let opaque = AttrValue::Opaque("<AXValue 0x7f>".into());
    assert_eq!(opaque.scalarize(), serde_json::json!("<AXValue 0x7f>"));
  }

  #[test]
  fn non_finite_numbers_become_strings() {
    let nan = AttrValue::Number(f64::NAN).scalarize();
    assert!(nan.is_string());
    let inf = AttrValue::Number(f64::INFINITY).scalarize();
    assert_eq!(inf, serde_json::json!("inf"));
  }

  #[test]
  fn sanitized_covers_every_entry() {
    let map: AttributeMap = [
      ("title", AttrValue::from("OK")),
      ("rows", AttrValue::from(12i64)),
      ("tags", AttrValue::List(vec![AttrValue::from("x")])),
    ]
    .into_iter()
    .collect();

    let clean = map.sanitized();
    assert_eq!(clean.len(), 3);
    assert!(clean.values().all(|v| !v.is_array() && !v.is_object()));
  }

  #[test]
  fn from_iterator_collects() {
    let map: AttributeMap = [("a", 1i64), ("b", 2i64)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("b").and_then(AttrValue::as_integer), Some(2));
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// Text values roundtrip through as_text.
    #[test]
    fn text_roundtrip(s in ".*") {
      let v = AttrValue::from(s.clone());
      prop_assert_eq!(v.as_text(), Some(s.as_str()));
    }

    /// Scalarize never produces arrays or objects.
    #[test]
    fn scalarize_is_scalar(n in any::<i64>(), b in any::<bool>(), s in ".*") {
      for value in [AttrValue::from(n), AttrValue::from(b), AttrValue::from(s), AttrValue::List(vec![AttrValue::from(n)])] {
        let json = value.scalarize();
        prop_assert!(!json.is_array());
        prop_assert!(!json.is_object());
      }
    }

    /// Integer values roundtrip through scalarize.
    #[test]
    fn integer_roundtrip(n in any::<i64>()) {
      prop_assert_eq!(AttrValue::from(n).scalarize(), serde_json::json!(n));
    }
  }
}
