/*!
Scripted in-memory accessibility hierarchy for integration tests.

`FakeProvider` plays the role of the OS accessibility layer: trees are
declared with [`node`], installed per pid, and can be rigged to fail
per-node calls the way a live hierarchy does.
*/

#![allow(dead_code)]

use axtree::provider::{AccessibilityNode, AccessibilityProvider, ProviderError};
use axtree::{AttrValue, AttributeMap, ProcessId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Declarative spec for one fake element.
#[derive(Debug, Clone)]
pub struct NodeSpec {
  role: String,
  identifier: String,
  attributes: AttributeMap,
  actions: Vec<String>,
  visible: bool,
  children: Vec<NodeSpec>,
  fail_children: bool,
  fail_attributes: bool,
  fail_role: bool,
}

/// Start a node spec for `role`.
pub fn node(role: &str) -> NodeSpec {
  NodeSpec {
    role: role.to_owned(),
    identifier: String::new(),
    attributes: AttributeMap::new(),
    actions: Vec::new(),
    visible: true,
    children: Vec::new(),
    fail_children: false,
    fail_attributes: false,
    fail_role: false,
  }
}

impl NodeSpec {
  pub fn id(mut self, identifier: &str) -> Self {
    self.identifier = identifier.to_owned();
    self
  }

  pub fn title(mut self, title: &str) -> Self {
    self.attributes.insert("title", title);
    self
  }

  pub fn description(mut self, description: &str) -> Self {
    self.attributes.insert("description", description);
    self
  }

  pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
    self.attributes.insert(key, value);
    self
  }

  pub fn action(mut self, action: &str) -> Self {
    self.actions.push(action.to_owned());
    self
  }

  pub fn child(mut self, child: NodeSpec) -> Self {
    self.children.push(child);
    self
  }

  pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
    self.children.extend(children);
    self
  }

  pub fn hidden(mut self) -> Self {
    self.visible = false;
    self
  }

  /// Child enumeration fails with a dead reference.
  pub fn fail_children(mut self) -> Self {
    self.fail_children = true;
    self
  }

  /// Attribute retrieval fails.
  pub fn fail_attributes(mut self) -> Self {
    self.fail_attributes = true;
    self
  }

  /// Role retrieval fails.
  pub fn fail_role(mut self) -> Self {
    self.fail_role = true;
    self
  }
}

/// Live handle over a spec subtree.
#[derive(Debug, Clone)]
pub struct FakeNode {
  spec: Arc<NodeSpec>,
}

impl AccessibilityNode for FakeNode {
  fn role(&self) -> Result<String, ProviderError> {
    if self.spec.fail_role {
      return Err(ProviderError::DeadReference);
    }
    Ok(self.spec.role.clone())
  }

  fn identifier(&self) -> String {
    self.spec.identifier.clone()
  }

  fn attributes(&self) -> Result<AttributeMap, ProviderError> {
    if self.spec.fail_attributes {
      return Err(ProviderError::AttributeUnavailable("scripted failure".into()));
    }
    Ok(self.spec.attributes.clone())
  }

  fn actions(&self) -> Result<Vec<String>, ProviderError> {
    Ok(self.spec.actions.clone())
  }

  fn is_visible(&self) -> bool {
    self.spec.visible
  }

  fn children(&self) -> Result<Vec<Self>, ProviderError> {
    if self.spec.fail_children {
      return Err(ProviderError::DeadReference);
    }
    Ok(
      self
        .spec
        .children
        .iter()
        .cloned()
        .map(|spec| FakeNode {
          spec: Arc::new(spec),
        })
        .collect(),
    )
  }
}

/// Scripted provider: install one root spec per pid.
#[derive(Debug, Default)]
pub struct FakeProvider {
  roots: Mutex<HashMap<u32, NodeSpec>>,
  resolutions: AtomicUsize,
  delay: Mutex<Duration>,
}

impl FakeProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Install (or replace) the hierarchy for a process.
  pub fn install(&self, pid: ProcessId, root: NodeSpec) {
    self.roots.lock().unwrap().insert(pid.0, root);
  }

  /// Remove the hierarchy for a process.
  pub fn remove(&self, pid: ProcessId) {
    self.roots.lock().unwrap().remove(&pid.0);
  }

  /// Make every root resolution block for `delay` - simulates slow OS calls.
  pub fn set_resolution_delay(&self, delay: Duration) {
    *self.delay.lock().unwrap() = delay;
  }

  /// How many times the root element was resolved (i.e. builds started).
  pub fn root_resolutions(&self) -> usize {
    self.resolutions.load(Ordering::SeqCst)
  }
}

impl AccessibilityProvider for FakeProvider {
  type Node = FakeNode;

  fn root_element(&self, pid: ProcessId) -> Result<Self::Node, ProviderError> {
    self.resolutions.fetch_add(1, Ordering::SeqCst);
    let delay = *self.delay.lock().unwrap();
    if !delay.is_zero() {
      std::thread::sleep(delay);
    }
    self
      .roots
      .lock()
      .unwrap()
      .get(&pid.0)
      .cloned()
      .map(|spec| FakeNode {
        spec: Arc::new(spec),
      })
      .ok_or(ProviderError::ProcessNotFound)
  }
}
