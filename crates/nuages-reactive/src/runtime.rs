//! Reactive Runtime - Dependency Graph and Observer Stack
//!
//! One `Runtime` lives in thread-local storage per thread. Signals register
//! themselves in its dependency graph; effects push themselves onto its
//! observer stack while they run, so any signal read during execution is
//! recorded as a dependency. When a signal changes, its subscribers are
//! queued and executed on the next flush.
//!
//! Access always goes through [`with_runtime`] (or [`try_with_runtime`] in
//! drop paths, where thread-local storage may already be torn down).

use core::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Unique identifier for a node (signal or effect) in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
	/// Allocates a fresh id from the thread-local runtime.
	pub fn new() -> Self {
		with_runtime(|rt| rt.allocate_id())
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// The kind of node an observer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	Signal,
	Effect,
}

/// An entry on the observer stack: the computation currently executing.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
	pub id: NodeId,
	pub node_type: NodeType,
}

/// Per-signal bookkeeping: which observers re-run when it changes.
#[derive(Debug, Default)]
pub struct DependencyNode {
	pub subscribers: Vec<NodeId>,
}

/// The thread-local reactive runtime.
pub struct Runtime {
	next_id: Cell<u64>,
	/// Signal id -> subscribed observers.
	pub dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Stack of currently executing observers; the top one records dependencies.
	observer_stack: RefCell<Vec<Observer>>,
	/// Observers scheduled for re-execution, in scheduling order, deduplicated.
	pub pending_updates: RefCell<Vec<NodeId>>,
}

impl Runtime {
	fn new() -> Self {
		Self {
			next_id: Cell::new(0),
			dependency_graph: RefCell::new(BTreeMap::new()),
			observer_stack: RefCell::new(Vec::new()),
			pending_updates: RefCell::new(Vec::new()),
		}
	}

	pub(crate) fn allocate_id(&self) -> NodeId {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		NodeId(id)
	}

	/// Records the signal as a dependency of the currently executing observer.
	///
	/// No-op when nothing is observing.
	pub fn track_dependency(&self, signal_id: NodeId) {
		let Some(observer) = self.observer_stack.borrow().last().copied() else {
			return;
		};

		let mut graph = self.dependency_graph.borrow_mut();
		let node = graph.entry(signal_id).or_default();
		if !node.subscribers.contains(&observer.id) {
			node.subscribers.push(observer.id);
		}
	}

	/// Queues every subscriber of the signal for re-execution.
	pub fn notify_change(&self, signal_id: NodeId) {
		let graph = self.dependency_graph.borrow();
		let Some(node) = graph.get(&signal_id) else {
			return;
		};

		let mut pending = self.pending_updates.borrow_mut();
		for subscriber in &node.subscribers {
			if !pending.contains(subscriber) {
				pending.push(*subscriber);
			}
		}
	}

	/// Removes the observer from every signal's subscriber list.
	///
	/// Called before an effect re-runs so its dependency set is rebuilt from
	/// scratch on each execution.
	pub fn clear_dependencies(&self, observer_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();
		for node in graph.values_mut() {
			node.subscribers.retain(|id| *id != observer_id);
		}
	}

	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	pub fn pop_observer(&self) {
		self.observer_stack.borrow_mut().pop();
	}

	/// Whether any observer is currently executing.
	pub fn has_observer(&self) -> bool {
		!self.observer_stack.borrow().is_empty()
	}

	/// Removes a node entirely: its graph entry, its subscriptions, and any
	/// pending update.
	pub fn remove_node(&self, id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();
		graph.remove(&id);
		for node in graph.values_mut() {
			node.subscribers.retain(|sub| *sub != id);
		}
		drop(graph);

		self.pending_updates.borrow_mut().retain(|sub| *sub != id);
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Runs a closure with the thread-local runtime.
pub fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
	RUNTIME.with(f)
}

/// Like [`with_runtime`], but returns `None` if thread-local storage has been
/// destroyed. Used from `Drop` implementations.
pub fn try_with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> Option<R> {
	RUNTIME.try_with(f).ok()
}
