/*!
axtree - accessibility tree snapshot cache for UI automation.

Materializes bounded snapshots of a target process's UI hierarchy through
an injected accessibility provider, keeps a per-process cache of the latest
snapshot fresh, derives flattened/interactive indexes from it, and resolves
stable handles (paths, highlight indices) back to live nodes for action
dispatch.

```ignore
use axtree::{AxTree, BuildOptions, ProcessId};

// One cache per automation session, over a platform provider.
let tree = AxTree::new(provider);
let pid = ProcessId(4242);

// Lazy discovery build (cached for the freshness window).
let snapshot = tree.build_tree(pid, BuildOptions::default()).await?;

// Query the snapshot without touching the OS again.
let results = tree.search(pid, "OK", false).await?;
let target = tree.find_by_highlight_index(pid, 3)?;
tree.with_element(pid, &target.path, |node| invoker.press(node))?;

// The action mutated the UI - drop the snapshot so the next read is fresh.
tree.invalidate(pid);
```

Coherency is best-effort and lazily invalidated: snapshots are replaced
wholesale, node identity never survives a rebuild, and highlight indices are
valid only against the flattening that produced them.
*/

pub mod a11y;
mod core;
pub mod provider;
mod types;

pub use crate::core::builder::{BuildOptions, BuilderConfig};
pub use crate::core::filter::InteractiveNode;
pub use crate::core::flatten::FlattenedIndex;
pub use crate::core::{AxTree, AxTreeBuilder, DEFAULT_FRESHNESS};
pub use types::*;
