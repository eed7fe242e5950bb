/*!
OS accessibility boundary.

These traits define the contract between the cache and whatever supplies
live accessibility data - a platform binding in production, a scripted
hierarchy in tests. Core code only uses these traits, never a platform API
directly.

Every per-node call is fallible with a recoverable [`ProviderError`]; the
builder absorbs those as "no children" / "empty attributes". Only
[`AccessibilityProvider::root_element`] failures abort a build.
*/

use crate::types::{AttributeMap, ProcessId};
use std::sync::Arc;

/// A recoverable failure from the accessibility layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
  /// The target process does not exist or exposes no root element.
  #[error("process not found")]
  ProcessNotFound,

  /// The accessibility grant is missing for this client.
  #[error("accessibility permission denied")]
  PermissionDenied,

  /// The element reference died between retrieval and use.
  #[error("element reference is no longer valid")]
  DeadReference,

  /// A single attribute could not be read.
  #[error("attribute unavailable: {0}")]
  AttributeUnavailable(String),

  /// Anything else the platform reports.
  #[error("{0}")]
  Other(String),
}

/// Entry point into a process's live accessibility hierarchy.
///
/// Implementations perform blocking OS calls; the cache always invokes them
/// from a dedicated worker, never under its lock.
pub trait AccessibilityProvider: Send + Sync {
  /// Live element handle type for this provider.
  type Node: AccessibilityNode;

  /// Resolve the root (application) element of a process.
  fn root_element(&self, pid: ProcessId) -> Result<Self::Node, ProviderError>;
}

/// Per-element retrieval primitives.
pub trait AccessibilityNode {
  /// OS role tag for the element.
  fn role(&self) -> Result<String, ProviderError>;

  /// Opaque identifier. May be empty; the cache never relies on it.
  fn identifier(&self) -> String;

  /// Attribute bag for the element.
  fn attributes(&self) -> Result<AttributeMap, ProviderError>;

  /// Supported action names.
  fn actions(&self) -> Result<Vec<String>, ProviderError>;

  /// Whether the OS reports the element as visible.
  fn is_visible(&self) -> bool;

  /// Child handles, in OS order.
  fn children(&self) -> Result<Vec<Self>, ProviderError>
  where
    Self: Sized;
}

impl<P: AccessibilityProvider> AccessibilityProvider for Arc<P> {
  type Node = P::Node;

  fn root_element(&self, pid: ProcessId) -> Result<Self::Node, ProviderError> {
    (**self).root_element(pid)
  }
}
