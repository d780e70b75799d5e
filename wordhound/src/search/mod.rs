/// This module implements the concurrent traversal-and-search engine.
///
/// # Fan-out / fan-in
///
/// A directory search runs as a fan-out of independent units of work —
/// one traversal unit plus one scan unit per candidate file — over a
/// bounded worker pool, fanning results back in over a channel:
///
/// ```text
///                    +-> scan a.txt --+
/// traversal --------->-> scan b.txt --->--> results channel --> outcome
///   (walks, spawns)  +-> scan c.txt --+
/// ```
///
/// The pool caps how many files are open at once; scheduling more units
/// than threads just queues them.
///
/// # Knowing when everything is done
///
/// The classic shape of this problem is a counter incremented before
/// each unit is scheduled and decremented exactly once when it
/// finishes; draining stops when the counter hits zero and nothing can
/// still be added. Incrementing *inside* the unit instead would race: a
/// moment after the first unit finished, the counter could read zero
/// while the traversal was still discovering files.
///
/// Here the counter is not a number but sender ownership. Every unit
/// holds clones of the channel senders, cloned *before* the unit is
/// handed to the pool, and drops them exactly once when it exits — on
/// the error paths too, since the drop is tied to scope rather than to
/// a statement that has to be remembered. The traversal unit owns the
/// original senders the whole time it is scheduling children, so the
/// channel cannot disconnect early, and the aggregator's drain loop
/// terminates precisely when the last unit finishes. The coordinator
/// itself keeps no sender; if it did, the drain would never end.
///
/// # Ordering
///
/// Results arrive in completion order and none is implied across files.
/// Within one file, matches are ascending by line number because each
/// scan reads its file sequentially. Nothing else is shared: the walker
/// hands each unit its own path, the matcher is immutable, and the only
/// mutable state is the channel plus one atomic counter of scheduled
/// scans.
pub mod engine;
pub mod matcher;
pub mod scanner;
pub mod walker;

pub use engine::search;
pub use matcher::TermMatcher;
pub use scanner::FileScanner;
pub use walker::TreeWalker;
