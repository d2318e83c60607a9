//! Effect - Reactive Side Effects
//!
//! An `Effect` is a closure that re-runs whenever any signal it read during
//! its previous execution changes. Dependencies are rebuilt from scratch on
//! every run, so conditional reads behave correctly.
//!
//! Effects are the retry mechanism of the whole toolkit: a suspended consumer
//! is an effect that read a pending resource's completion signal and will be
//! re-invoked, from the top, when that signal fires.
//!
//! ## Example
//!
//! ```ignore
//! let count = Signal::new(0);
//!
//! let _effect = Effect::new(move || {
//!     println!("count is {}", count.get());
//! });
//!
//! count.set(42);
//! with_runtime(|rt| rt.flush()); // prints "count is 42"
//! ```

use core::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::runtime::{NodeId, NodeType, Observer, try_with_runtime, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

// Closures live outside the Effect handle so the runtime can re-execute them
// by id. Each closure sits behind its own Rc<RefCell<..>>: execution takes a
// clone and releases the map borrow first, so an effect may dispose itself or
// create sibling effects while running.
thread_local! {
	static EFFECT_FUNCTIONS: RefCell<BTreeMap<NodeId, Rc<RefCell<EffectFn>>>> =
		const { RefCell::new(BTreeMap::new()) };
}

/// A reactive side effect.
///
/// Runs once at construction and again after every change to a signal it
/// read, on the next runtime flush. Dropping (or [`dispose`](Effect::dispose)-ing)
/// the handle unregisters it.
pub struct Effect {
	id: NodeId,
	disposed: Rc<RefCell<bool>>,
}

impl Effect {
	/// Creates an effect and executes it immediately.
	pub fn new<F>(mut f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();
		let disposed = Rc::new(RefCell::new(false));

		let disposed_flag = disposed.clone();
		EFFECT_FUNCTIONS.with(|storage| {
			storage.borrow_mut().insert(
				id,
				Rc::new(RefCell::new(Box::new(move || {
					if !*disposed_flag.borrow() {
						f();
					}
				}) as EffectFn)),
			);
		});

		Self::execute(id);

		Self { id, disposed }
	}

	/// Executes an effect by id, rebuilding its dependency set.
	///
	/// Called at construction and by [`Runtime::flush`](crate::runtime::Runtime::flush).
	pub(crate) fn execute(effect_id: NodeId) {
		let Some(function) =
			EFFECT_FUNCTIONS.with(|storage| storage.borrow().get(&effect_id).cloned())
		else {
			return;
		};

		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer {
				id: effect_id,
				node_type: NodeType::Effect,
			});
		});

		// A re-entrant execution of the same effect would deadlock the
		// RefCell; skip it instead.
		if let Ok(mut f) = function.try_borrow_mut() {
			f();
		} else {
			tracing::warn!(?effect_id, "skipped re-entrant effect execution");
		}

		with_runtime(|rt| rt.pop_observer());
	}

	/// The effect's node id (for tests).
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Unregisters the effect. It will never run again.
	pub fn dispose(&self) {
		*self.disposed.borrow_mut() = true;

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		let _ = EFFECT_FUNCTIONS.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl crate::runtime::Runtime {
	/// Executes every scheduled effect, looping until the queue is quiescent
	/// so cascaded updates settle within a single flush.
	pub fn flush(&self) {
		const MAX_ROUNDS: usize = 1000;

		for _ in 0..MAX_ROUNDS {
			let pending = core::mem::take(&mut *self.pending_updates.borrow_mut());
			if pending.is_empty() {
				return;
			}
			for node_id in pending {
				Effect::execute(node_id);
			}
		}
		tracing::warn!("flush aborted after {MAX_ROUNDS} rounds; effects keep rescheduling each other");
	}
}
