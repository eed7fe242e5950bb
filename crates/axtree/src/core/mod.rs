/*!
The tree cache service.

[`AxTree`] owns all per-process state: the latest snapshot, the memoized
flattened index, search results, and traversal limits. One instance is
constructed per automation session with an injected provider - there is no
global registry.

# Concurrency discipline

One coarse `parking_lot::Mutex` guards the tables; request rates are
human/LLM-paced, so finer granularity buys nothing. The (potentially slow,
OS-bound) build itself runs on a blocking worker outside the lock - only the
pointer swap is locked, so readers never observe a half-built tree.

Concurrent builds for the same process coalesce onto one in-flight build:
later callers await the same outcome instead of racing the provider.

# Example

```ignore
use axtree::{AxTree, BuildOptions, ProcessId};

let tree = AxTree::new(provider);
let pid = ProcessId(4242);

let snapshot = tree.build_tree(pid, BuildOptions::default()).await?;
let results = tree.search(pid, "Save", false).await?;
let target = tree.find_by_highlight_index(pid, 3)?;

// ... external action invoker presses the element ...

tree.invalidate(pid); // next read reflects reality
```
*/

pub(crate) mod builder;
pub(crate) mod filter;
pub(crate) mod flatten;
pub(crate) mod locate;
pub(crate) mod search;

use builder::{BuildOptions, BuilderConfig, TreeBuilder};
use filter::InteractiveNode;
use flatten::FlattenedIndex;
use search::SearchKey;

use crate::provider::AccessibilityProvider;
use crate::types::{
  AxTreeError, AxTreeResult, BuildMode, CacheStats, ElementNode, ElementSummary, ProcessId,
  SearchResults, SnapshotAge, TreeSnapshot,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Default freshness window: snapshots younger than this are returned
/// unchanged unless the caller forces a rebuild.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5);

/// Depth budget for deeper on-demand expansion of one subtree.
const EXPAND_BUILD_DEPTH: usize = 8;

/// View depth returned from an expansion.
const EXPAND_VIEW_DEPTH: usize = 3;

type BuildOutcome = AxTreeResult<Arc<TreeSnapshot>>;

struct InFlightBuild {
  /// Guards installation: a `cleanup`/`invalidate` that raced the build
  /// bumps the entry generation so a finished build cannot resurrect state.
  generation: u64,
  rx: watch::Receiver<Option<BuildOutcome>>,
}

/// Everything the cache tracks for one process.
struct ProcessEntry {
  snapshot: Option<Arc<TreeSnapshot>>,
  flattened: Option<Arc<FlattenedIndex>>,
  search: HashMap<SearchKey, Arc<Vec<ElementSummary>>>,
  limits: BuilderConfig,
  in_flight: Option<InFlightBuild>,
  generation: u64,
}

impl ProcessEntry {
  fn new(limits: BuilderConfig) -> Self {
    Self {
      snapshot: None,
      flattened: None,
      search: HashMap::new(),
      limits,
      in_flight: None,
      generation: 0,
    }
  }

  /// Memoize the flattened index for the current snapshot.
  fn ensure_flattened(&mut self, snapshot: &Arc<TreeSnapshot>) -> Arc<FlattenedIndex> {
    if let Some(index) = &self.flattened {
      return Arc::clone(index);
    }
    let index = Arc::new(FlattenedIndex::from_snapshot(snapshot));
    self.flattened = Some(Arc::clone(&index));
    index
  }

  /// Drop everything derived from the snapshot.
  fn drop_derived(&mut self) {
    self.flattened = None;
    self.search.clear();
  }
}

struct CacheState {
  processes: HashMap<ProcessId, ProcessEntry>,
}

/// Per-session accessibility tree cache over an injected provider.
///
/// Clone is cheap (Arc bumps) - share freely across tasks.
pub struct AxTree<P: AccessibilityProvider + 'static> {
  provider: Arc<P>,
  state: Arc<Mutex<CacheState>>,
  freshness: Duration,
  default_limits: BuilderConfig,
}

impl<P: AccessibilityProvider + 'static> Clone for AxTree<P> {
  fn clone(&self) -> Self {
    Self {
      provider: Arc::clone(&self.provider),
      state: Arc::clone(&self.state),
      freshness: self.freshness,
      default_limits: self.default_limits,
    }
  }
}

impl<P: AccessibilityProvider + 'static> std::fmt::Debug for AxTree<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AxTree").finish_non_exhaustive()
  }
}

/// Builder for configuring an [`AxTree`] instance.
#[derive(Debug)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct AxTreeBuilder<P: AccessibilityProvider + 'static> {
  provider: P,
  freshness: Duration,
  limits: BuilderConfig,
}

impl<P: AccessibilityProvider + 'static> AxTreeBuilder<P> {
  /// Set the freshness window for cached snapshots.
  pub fn freshness(mut self, window: Duration) -> Self {
    self.freshness = window;
    self
  }

  /// Set the default traversal limits applied to new processes.
  pub fn traversal_limits(mut self, limits: BuilderConfig) -> Self {
    self.limits = limits;
    self
  }

  /// Build the cache instance.
  pub fn build(self) -> AxTree<P> {
    AxTree {
      provider: Arc::new(self.provider),
      state: Arc::new(Mutex::new(CacheState {
        processes: HashMap::new(),
      })),
      freshness: self.freshness,
      default_limits: self.limits,
    }
  }
}

impl<P: AccessibilityProvider + 'static> AxTree<P> {
  /// Create a cache with the default freshness window and limits.
  pub fn new(provider: P) -> Self {
    Self::builder(provider).build()
  }

  /// Create a builder for a customized cache.
  pub fn builder(provider: P) -> AxTreeBuilder<P> {
    AxTreeBuilder {
      provider,
      freshness: DEFAULT_FRESHNESS,
      limits: BuilderConfig::default(),
    }
  }

  /// Get the current snapshot for `pid`, or build one.
  ///
  /// Unforced calls inside the freshness window return the cached snapshot
  /// unchanged. Otherwise a build runs on a blocking worker; concurrent
  /// callers for the same process share that one build.
  pub async fn build_tree(
    &self,
    pid: ProcessId,
    opts: BuildOptions,
  ) -> AxTreeResult<Arc<TreeSnapshot>> {
    self.get_or_build(pid, opts, None).await
  }

  async fn get_or_build(
    &self,
    pid: ProcessId,
    opts: BuildOptions,
    anchor: Option<String>,
  ) -> AxTreeResult<Arc<TreeSnapshot>> {
    let mut rx = {
      let mut state = self.state.lock();
      let entry = state
        .processes
        .entry(pid)
        .or_insert_with(|| ProcessEntry::new(self.default_limits));

      if !opts.force_refresh {
        if let Some(snapshot) = &entry.snapshot {
          let age = snapshot.age();
          if age < self.freshness {
            log::debug!("using cached tree for pid {pid} (age {age:?})");
            return Ok(Arc::clone(snapshot));
          }
        }
      }

      match &entry.in_flight {
        Some(build) => build.rx.clone(),
        None => {
          entry.generation += 1;
          let generation = entry.generation;
          let (tx, rx) = watch::channel(None);
          entry.in_flight = Some(InFlightBuild {
            generation,
            rx: rx.clone(),
          });
          let config = opts.effective_config(entry.limits);
          self.spawn_build(pid, config, opts.mode(), anchor, generation, tx);
          rx
        }
      }
    };

    let outcome = rx
      .wait_for(|outcome| outcome.is_some())
      .await
      .map_err(|_| AxTreeError::Internal(format!("tree build for pid {pid} was interrupted")))?
      .clone();

    match outcome {
      Some(result) => result,
      None => Err(AxTreeError::Internal(format!(
        "tree build for pid {pid} produced no outcome"
      ))),
    }
  }

  fn spawn_build(
    &self,
    pid: ProcessId,
    config: BuilderConfig,
    mode: BuildMode,
    anchor: Option<String>,
    generation: u64,
    tx: watch::Sender<Option<BuildOutcome>>,
  ) {
    let provider = Arc::clone(&self.provider);
    let state = Arc::clone(&self.state);
    log::info!(
      "building {mode} tree for pid {pid} (max_depth {}, max_children {})",
      config.max_depth,
      config.max_children
    );

    tokio::spawn(async move {
      let started = Instant::now();
      let built = tokio::task::spawn_blocking(move || {
        TreeBuilder::new(config)
          .anchored(anchor)
          .build(provider.as_ref(), pid)
      })
      .await;

      let outcome: BuildOutcome = match built {
        Ok(Ok(root)) => {
          let snapshot = Arc::new(TreeSnapshot::new(pid, root, mode, started.elapsed()));
          log::info!(
            "built {mode} tree for pid {pid}: {} nodes in {:?}",
            snapshot.node_count,
            snapshot.build_duration
          );
          Ok(snapshot)
        }
        Ok(Err(error)) => {
          log::warn!("tree build failed for pid {pid}: {error}");
          Err(error)
        }
        Err(join_error) => Err(AxTreeError::Internal(format!(
          "tree build task for pid {pid} failed: {join_error}"
        ))),
      };

      {
        let mut state = state.lock();
        if let Some(entry) = state.processes.get_mut(&pid) {
          let still_current = entry
            .in_flight
            .as_ref()
            .is_some_and(|build| build.generation == generation);
          if still_current {
            entry.in_flight = None;
            if let Ok(snapshot) = &outcome {
              entry.snapshot = Some(Arc::clone(snapshot));
              entry.drop_derived();
            }
          }
        }
      }

      drop(tx.send(Some(outcome)));
    });
  }

  /// The memoized flattened index of the current snapshot, building one
  /// first if needed.
  pub async fn flattened(&self, pid: ProcessId) -> AxTreeResult<Arc<FlattenedIndex>> {
    let snapshot = self.build_tree(pid, BuildOptions::default()).await?;
    let (_, index) = self.snapshot_with_index(pid, snapshot);
    Ok(index)
  }

  /// Flattened summaries filtered to interactive elements.
  pub async fn interactive_elements(&self, pid: ProcessId) -> AxTreeResult<Vec<ElementSummary>> {
    let index = self.flattened(pid).await?;
    Ok(
      index
        .entries()
        .iter()
        .filter(|summary| summary.is_interactive)
        .cloned()
        .collect(),
    )
  }

  /// The interactive view of the current snapshot, expanded `max_depth`
  /// levels. Builds a snapshot first if needed.
  pub async fn interactive_view(
    &self,
    pid: ProcessId,
    max_depth: usize,
  ) -> AxTreeResult<InteractiveNode> {
    let snapshot = self.build_tree(pid, BuildOptions::default()).await?;
    let (snapshot, index) = self.snapshot_with_index(pid, snapshot);
    Ok(filter::interactive_view(&snapshot.root, &index, max_depth))
  }

  /// Substring search over the current snapshot, memoized per query.
  pub async fn search(
    &self,
    pid: ProcessId,
    query: &str,
    case_sensitive: bool,
  ) -> AxTreeResult<SearchResults> {
    let started = Instant::now();
    let key = SearchKey::new(query, case_sensitive);

    {
      let state = self.state.lock();
      if let Some(hits) = state
        .processes
        .get(&pid)
        .and_then(|entry| entry.search.get(&key))
      {
        log::debug!("search cache hit for pid {pid}: {} matches", hits.len());
        return Ok(SearchResults {
          matches: hits.as_ref().clone(),
          total_count: hits.len(),
          elapsed: started.elapsed(),
        });
      }
    }

    let index = self.flattened(pid).await?;
    let matches: Vec<ElementSummary> = index
      .entries()
      .iter()
      .filter(|summary| key.matches(summary))
      .cloned()
      .collect();
    log::debug!(
      "search '{}' for pid {pid} matched {} of {} elements",
      key.query(),
      matches.len(),
      index.len()
    );

    let hits = Arc::new(matches);
    {
      let mut state = self.state.lock();
      if let Some(entry) = state.processes.get_mut(&pid) {
        entry.search.insert(key, Arc::clone(&hits));
      }
    }

    Ok(SearchResults {
      matches: hits.as_ref().clone(),
      total_count: hits.len(),
      elapsed: started.elapsed(),
    })
  }

  /// Resolve a path against the current snapshot.
  pub fn find_by_path(&self, pid: ProcessId, path: &str) -> AxTreeResult<ElementSummary> {
    let (snapshot, index) = self
      .current_with_index(pid)
      .ok_or_else(|| AxTreeError::ElementNotFound(path.to_owned()))?;
    let node = locate::find_by_path(&snapshot.root, path)
      .ok_or_else(|| AxTreeError::ElementNotFound(path.to_owned()))?;
    Ok(
      index
        .by_path(&node.accessibility_path)
        .cloned()
        .unwrap_or_else(|| ElementSummary::from_node(node, None)),
    )
  }

  /// Resolve a highlight index against the current flattening, then
  /// re-resolve to the live node via its path.
  ///
  /// Indices are valid only against the flattening that produced them; a
  /// miss after a rebuild is a [`AxTreeError::StaleIndex`] and the caller
  /// must re-read and retry.
  pub fn find_by_highlight_index(&self, pid: ProcessId, index: u32) -> AxTreeResult<ElementSummary> {
    let (snapshot, flattened) = self
      .current_with_index(pid)
      .ok_or(AxTreeError::StaleIndex { pid, index })?;
    let summary = flattened
      .by_highlight(index)
      .ok_or(AxTreeError::StaleIndex { pid, index })?;

    match locate::find_by_path(&snapshot.root, &summary.path) {
      Some(_) => Ok(summary.clone()),
      None => Err(AxTreeError::ElementNotFound(summary.path.clone())),
    }
  }

  /// Run a closure against the live node at `path` - the hook an external
  /// action invoker uses to dispatch against resolved elements.
  pub fn with_element<R>(
    &self,
    pid: ProcessId,
    path: &str,
    f: impl FnOnce(&ElementNode) -> R,
  ) -> AxTreeResult<R> {
    let snapshot = self
      .snapshot(pid)
      .ok_or_else(|| AxTreeError::ElementNotFound(path.to_owned()))?;
    let node = locate::find_by_path(&snapshot.root, path)
      .ok_or_else(|| AxTreeError::ElementNotFound(path.to_owned()))?;
    Ok(f(node))
  }

  /// Deeper on-demand expansion of one subtree.
  ///
  /// Forces a full rebuild whose depth budget restarts at `path`, then
  /// returns the interactive view of that subtree. The depth override lives
  /// only for this call.
  pub async fn expand_element(
    &self,
    pid: ProcessId,
    path: &str,
  ) -> AxTreeResult<InteractiveNode> {
    let opts = BuildOptions::full()
      .forced()
      .with_max_depth(EXPAND_BUILD_DEPTH);
    let snapshot = self.get_or_build(pid, opts, Some(path.to_owned())).await?;
    let (snapshot, index) = self.snapshot_with_index(pid, snapshot);
    let node = locate::find_by_path(&snapshot.root, path)
      .ok_or_else(|| AxTreeError::ElementNotFound(path.to_owned()))?;
    Ok(filter::interactive_view(node, &index, EXPAND_VIEW_DEPTH))
  }

  /// The current snapshot for `pid`, if any. Never triggers a build.
  pub fn snapshot(&self, pid: ProcessId) -> Option<Arc<TreeSnapshot>> {
    self
      .state
      .lock()
      .processes
      .get(&pid)
      .and_then(|entry| entry.snapshot.clone())
  }

  /// Drop the snapshot and everything derived from it.
  ///
  /// Called after an externally-performed mutating action so the next read
  /// reflects reality. A build already in flight will complete for its
  /// waiters but will not be installed.
  pub fn invalidate(&self, pid: ProcessId) {
    let mut state = self.state.lock();
    if let Some(entry) = state.processes.get_mut(&pid) {
      entry.snapshot = None;
      entry.drop_derived();
      entry.generation += 1;
      entry.in_flight = None;
      log::debug!("invalidated cache for pid {pid}");
    }
  }

  /// Release all per-process state, traversal limits included.
  ///
  /// Called when automation of a process ends.
  pub fn cleanup(&self, pid: ProcessId) {
    let mut state = self.state.lock();
    if state.processes.remove(&pid).is_some() {
      log::debug!("released state for pid {pid}");
    }
  }

  /// Release state for every tracked process.
  pub fn clear(&self) {
    self.state.lock().processes.clear();
  }

  /// Persistently override the traversal limits for one process.
  pub fn set_traversal_limits(&self, pid: ProcessId, limits: BuilderConfig) {
    let mut state = self.state.lock();
    state
      .processes
      .entry(pid)
      .or_insert_with(|| ProcessEntry::new(self.default_limits))
      .limits = limits;
  }

  /// Cache-wide counters for diagnostics.
  pub fn stats(&self) -> CacheStats {
    let state = self.state.lock();
    let mut stats = CacheStats::default();
    for (pid, entry) in &state.processes {
      if let Some(snapshot) = &entry.snapshot {
        stats.snapshots += 1;
        stats.snapshot_ages.push(SnapshotAge {
          pid: *pid,
          age_secs: snapshot.age().as_secs_f64(),
        });
      }
      if entry.flattened.is_some() {
        stats.flattened_indexes += 1;
      }
      stats.search_entries += entry.search.len();
    }
    stats.snapshot_ages.sort_by_key(|age| age.pid);
    stats
  }

  /// Current snapshot + memoized index, if the process has a snapshot.
  fn current_with_index(
    &self,
    pid: ProcessId,
  ) -> Option<(Arc<TreeSnapshot>, Arc<FlattenedIndex>)> {
    let mut state = self.state.lock();
    let entry = state.processes.get_mut(&pid)?;
    let snapshot = entry.snapshot.clone()?;
    let index = entry.ensure_flattened(&snapshot);
    Some((snapshot, index))
  }

  /// Like [`Self::current_with_index`], but falls back to the snapshot the
  /// caller just built if the entry vanished underneath it (cleanup race).
  fn snapshot_with_index(
    &self,
    pid: ProcessId,
    fallback: Arc<TreeSnapshot>,
  ) -> (Arc<TreeSnapshot>, Arc<FlattenedIndex>) {
    match self.current_with_index(pid) {
      Some(pair) => pair,
      None => {
        let index = Arc::new(FlattenedIndex::from_snapshot(&fallback));
        (fallback, index)
      }
    }
  }
}
