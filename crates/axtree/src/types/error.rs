/*! Error types for cache and lookup operations. */

use super::ProcessId;

/// Errors surfaced by tree builds and element lookups.
///
/// Per-subtree traversal problems never appear here - the builder absorbs
/// them as missing children or empty attributes. Only whole-build failures
/// and typed lookup misses reach callers.
///
/// `Clone` because build outcomes fan out to every caller coalesced onto the
/// same in-flight build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AxTreeError {
  /// Accessibility access to the target is not granted at all.
  #[error("Accessibility permissions not granted")]
  PermissionDenied,

  /// The root element of the process could not be resolved.
  #[error("Process not found: {0}")]
  ProcessNotFound(ProcessId),

  /// A path lookup against the current snapshot missed.
  #[error("Element not found: {0}")]
  ElementNotFound(String),

  /// A highlight index is not valid against the current flattening.
  /// The caller must re-read (rebuild or re-search) and retry.
  #[error("Highlight index {index} is stale for process {pid}")]
  StaleIndex {
    /// Process the lookup targeted.
    pid: ProcessId,
    /// The index that no longer resolves.
    index: u32,
  },

  /// A build worker failed outside the provider boundary.
  #[error("Internal error: {0}")]
  Internal(String),
}

/// Result type for cache operations.
pub type AxTreeResult<T> = Result<T, AxTreeError>;
