//! Signal - Fine-grained Reactive State Cell
//!
//! `Signal<T>` holds a value and records who read it. Reads inside an
//! [`Effect`](crate::Effect) register that effect as a subscriber; writes
//! queue every subscriber for re-execution on the next runtime flush.
//!
//! ## Example
//!
//! ```ignore
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//!
//! count.set(42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::runtime::{NodeId, try_with_runtime, with_runtime};

/// A reactive value with automatic dependency tracking.
///
/// `Signal<T>` is a `NodeId` plus an `Rc<RefCell<T>>`: cheap to clone, and
/// all clones observe the same underlying value. The type is single-threaded
/// by design; it is neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
}

impl<T: 'static> Signal<T> {
	/// Creates a new signal holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
		}
	}

	/// Returns the current value, recording a dependency on this signal if an
	/// observer is executing.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Returns the current value without recording a dependency.
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrows the current value for the duration of `f`, recording a
	/// dependency. Useful when `T` is expensive to clone.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		with_runtime(|rt| rt.track_dependency(self.id));
		f(&self.value.borrow())
	}

	/// Borrows the current value for the duration of `f` without recording a
	/// dependency.
	pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Replaces the value and queues every subscriber for re-execution.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		with_runtime(|rt| rt.notify_change(self.id));
	}

	/// Mutates the value in place, notifying subscribers once.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		with_runtime(|rt| rt.notify_change(self.id));
	}

	/// The signal's node id. Mainly for the runtime and tests.
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		// Only the last clone removes the node from the dependency graph.
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &self.get_untracked())
			.finish()
	}
}
