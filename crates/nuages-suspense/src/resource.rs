//! Resource - Suspense-compatible Async Operation Adapter
//!
//! A [`Resource<T, E>`] wraps one asynchronous operation's eventual outcome
//! behind a synchronous-looking [`read`](Resource::read) accessor. The
//! operation is started exactly once, when the resource is constructed;
//! `read` never re-triggers it.
//!
//! `read` returns an explicit tagged state instead of throwing anything:
//!
//! - [`ResourceState::Pending`] carries the [`RetrySignal`] a supervisor
//!   subscribes to in order to re-invoke the consumer once the operation
//!   settles. Calling `read` inside an [`Effect`](nuages_reactive::Effect)
//!   subscribes automatically.
//! - [`ResourceState::Ready`] yields the value, side-effect free, on every
//!   call after fulfillment.
//! - [`ResourceState::Failed`] surfaces the operation's own rejection reason
//!   verbatim, to be handled by the nearest supervising boundary.
//!
//! ## Example
//!
//! ```ignore
//! let greeting = Resource::new(|completer| {
//!     clock::schedule(300, move || completer.fulfill("Marioli".to_string()));
//! });
//!
//! assert!(matches!(greeting.read(), ResourceState::Pending(_)));
//! clock::advance(301);
//! assert!(matches!(greeting.read(), ResourceState::Ready(_)));
//! ```

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use nuages_reactive::{Signal, clock, with_runtime};
use thiserror::Error;

/// Where a resource is in its lifecycle. Transitions are monotonic:
/// `Pending` moves to exactly one of `Ready` or `Failed`, once, and never
/// reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
	Pending,
	Ready,
	Failed,
}

impl SlotStatus {
	pub fn is_pending(self) -> bool {
		matches!(self, SlotStatus::Pending)
	}

	/// Settled means the operation finished, successfully or not. A failed
	/// slot is displayable content (its boundary's failure fallback).
	pub fn is_settled(self) -> bool {
		!self.is_pending()
	}
}

/// Failure reasons used by the built-in fetch helpers and the demos.
/// Operations are free to use any `E: Clone` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	#[error("request timed out after {0} time-units")]
	Timeout(u64),
	#[error("upstream failure: {0}")]
	Upstream(String),
}

/// The completion signal of one resource. A supervisor that cannot rely on
/// automatic tracking subscribes by calling [`watch`](RetrySignal::watch)
/// inside its own effect.
#[derive(Clone, Debug)]
pub struct RetrySignal {
	completion: Signal<SlotStatus>,
}

impl RetrySignal {
	/// Reads the current status, recording a dependency so the calling
	/// observer re-runs when the resource settles.
	pub fn watch(&self) -> SlotStatus {
		self.completion.get()
	}
}

/// Type-erased view of one resource, used where the value type does not
/// matter: bundle slot listings, navigation gates, reveal-order composition.
#[derive(Clone, Debug)]
pub struct SlotHandle {
	name: &'static str,
	completion: Signal<SlotStatus>,
}

impl SlotHandle {
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Current status, without subscribing.
	pub fn status(&self) -> SlotStatus {
		self.completion.get_untracked()
	}

	/// Current status, subscribing the calling observer to changes.
	pub fn watch(&self) -> SlotStatus {
		self.completion.get()
	}
}

/// What [`Resource::read`] hands back to the consumer.
#[derive(Debug, Clone)]
pub enum ResourceState<T, E> {
	/// Not settled yet; retry once the carried signal fires.
	Pending(RetrySignal),
	Ready(T),
	Failed(E),
}

impl<T, E> ResourceState<T, E> {
	pub fn is_pending(&self) -> bool {
		matches!(self, ResourceState::Pending(_))
	}

	pub fn is_ready(&self) -> bool {
		matches!(self, ResourceState::Ready(_))
	}

	/// The value, if ready.
	pub fn ready(self) -> Option<T> {
		match self {
			ResourceState::Ready(value) => Some(value),
			_ => None,
		}
	}

	/// Maps the ready value, passing the other states through.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResourceState<U, E> {
		match self {
			ResourceState::Ready(value) => ResourceState::Ready(f(value)),
			ResourceState::Pending(signal) => ResourceState::Pending(signal),
			ResourceState::Failed(error) => ResourceState::Failed(error),
		}
	}
}

struct Inner<T, E> {
	// Written exactly once, by the Completer. None while pending.
	outcome: RefCell<Option<Result<T, E>>>,
	completion: Signal<SlotStatus>,
}

/// One-shot writer handed to the asynchronous operation. Not `Clone`, and
/// both terminal calls consume it: at most one transition out of `Pending`
/// can ever happen.
pub struct Completer<T: 'static, E: 'static> {
	inner: Rc<Inner<T, E>>,
}

impl<T, E> Completer<T, E> {
	pub fn fulfill(self, value: T) {
		self.settle(Ok(value));
	}

	pub fn reject(self, error: E) {
		self.settle(Err(error));
	}

	fn settle(self, outcome: Result<T, E>) {
		let status = match &outcome {
			Ok(_) => SlotStatus::Ready,
			Err(_) => SlotStatus::Failed,
		};
		*self.inner.outcome.borrow_mut() = Some(outcome);
		self.inner.completion.set(status);
		tracing::debug!(?status, at = clock::now(), "resource settled");
	}
}

/// A synchronous-looking wrapper over an in-flight asynchronous operation.
///
/// Cloning shares the same underlying slot; the operation still runs once.
pub struct Resource<T: 'static, E: 'static = FetchError> {
	inner: Rc<Inner<T, E>>,
}

impl<T, E> Clone for Resource<T, E> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T, E> Resource<T, E> {
	/// Initiates the operation and returns the pending resource.
	///
	/// `start` runs synchronously, right here, exactly once; anything slow it
	/// wants to do must be scheduled (see [`clock::schedule`]) with the
	/// [`Completer`] moved into the callback.
	pub fn new(start: impl FnOnce(Completer<T, E>)) -> Self {
		let inner = Rc::new(Inner {
			outcome: RefCell::new(None),
			completion: Signal::new(SlotStatus::Pending),
		});
		let resource = Self {
			inner: inner.clone(),
		};
		start(Completer { inner });
		resource
	}

	/// A resource that was fulfilled before anyone could observe it pending.
	pub fn ready(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				outcome: RefCell::new(Some(Ok(value))),
				completion: Signal::new(SlotStatus::Ready),
			}),
		}
	}

	/// Reads the resource.
	///
	/// Idempotent and side-effect free once settled: every call after
	/// fulfillment returns an equal `Ready`, every call after rejection an
	/// equal `Failed`. While pending, the read subscribes the current
	/// observer (if any) to the completion signal.
	pub fn read(&self) -> ResourceState<T, E>
	where
		T: Clone,
		E: Clone,
	{
		let status = self.inner.completion.get();
		match &*self.inner.outcome.borrow() {
			None => {
				debug_assert!(status.is_pending());
				if !with_runtime(|rt| rt.has_observer()) {
					tracing::warn!(
						"pending resource read outside any suspense boundary; the caller will never be retried"
					);
				}
				ResourceState::Pending(self.retry_signal())
			}
			Some(Ok(value)) => ResourceState::Ready(value.clone()),
			Some(Err(error)) => ResourceState::Failed(error.clone()),
		}
	}

	/// Current status, without subscribing.
	pub fn status(&self) -> SlotStatus {
		self.inner.completion.get_untracked()
	}

	pub fn retry_signal(&self) -> RetrySignal {
		RetrySignal {
			completion: self.inner.completion.clone(),
		}
	}

	/// A named, type-erased handle for bundle listings and composition.
	pub fn handle(&self, name: &'static str) -> SlotHandle {
		SlotHandle {
			name,
			completion: self.inner.completion.clone(),
		}
	}
}

impl<T, E> fmt::Debug for Resource<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Resource")
			.field("status", &self.status())
			.finish()
	}
}

/// A resource that fulfills with `value` after `delay` time-units.
pub fn resolve_after<T: 'static>(delay: u64, value: T) -> Resource<T> {
	Resource::new(|completer| {
		clock::schedule(delay, move || completer.fulfill(value));
	})
}

/// A resource that rejects with `error` after `delay` time-units.
pub fn reject_after<T: 'static>(delay: u64, error: FetchError) -> Resource<T> {
	Resource::new(|completer| {
		clock::schedule(delay, move || completer.reject(error));
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use nuages_reactive::Effect;
	use serial_test::serial;
	use std::cell::Cell;

	#[test]
	#[serial]
	fn test_operation_starts_exactly_once_at_construction() {
		clock::reset();
		let starts = Rc::new(Cell::new(0));

		let starts_clone = starts.clone();
		let resource: Resource<&str> = Resource::new(move |completer| {
			starts_clone.set(starts_clone.get() + 1);
			clock::schedule(100, move || completer.fulfill("done"));
		});

		// Reads before and after settlement never restart the operation.
		let _ = resource.read();
		let _ = resource.read();
		clock::advance(100);
		let _ = resource.read();
		let _ = resource.read();

		assert_eq!(starts.get(), 1);
	}

	#[test]
	#[serial]
	fn test_read_pending_then_ready() {
		clock::reset();
		let resource = resolve_after(300, "Marioli".to_string());

		assert!(matches!(resource.read(), ResourceState::Pending(_)));
		assert_eq!(resource.status(), SlotStatus::Pending);

		clock::advance(301);
		assert_eq!(resource.read().ready(), Some("Marioli".to_string()));
		assert_eq!(resource.status(), SlotStatus::Ready);
	}

	#[test]
	#[serial]
	fn test_read_is_idempotent_after_settlement() {
		clock::reset();
		let resource = resolve_after(10, 7_i32);
		clock::advance(10);

		for _ in 0..3 {
			assert_eq!(resource.read().ready(), Some(7));
		}

		let failing: Resource<i32> = reject_after(10, FetchError::Upstream("boom".into()));
		clock::advance(10);
		for _ in 0..3 {
			match failing.read() {
				ResourceState::Failed(error) => {
					assert_eq!(error, FetchError::Upstream("boom".into()));
				}
				other => panic!("expected Failed, got {other:?}"),
			}
		}
	}

	#[test]
	#[serial]
	fn test_status_is_monotonic() {
		clock::reset();
		let resource = resolve_after(50, ());

		clock::advance(50);
		assert_eq!(resource.status(), SlotStatus::Ready);

		// Nothing that happens later can move a settled resource.
		clock::advance(10_000);
		assert_eq!(resource.status(), SlotStatus::Ready);
	}

	#[test]
	#[serial]
	fn test_read_inside_effect_retries_on_completion() {
		clock::reset();
		let resource = resolve_after(200, "value".to_string());
		let observed = Rc::new(RefCell::new(Vec::new()));

		let resource_clone = resource.clone();
		let observed_clone = observed.clone();
		let _supervisor = Effect::new(move || {
			let label = match resource_clone.read() {
				ResourceState::Pending(_) => "pending".to_string(),
				ResourceState::Ready(value) => value,
				ResourceState::Failed(error) => error.to_string(),
			};
			observed_clone.borrow_mut().push(label);
		});

		assert_eq!(*observed.borrow(), vec!["pending".to_string()]);

		clock::advance(200);
		assert_eq!(
			*observed.borrow(),
			vec!["pending".to_string(), "value".to_string()]
		);
	}

	#[test]
	#[serial]
	fn test_retry_signal_watch_subscribes_explicitly() {
		clock::reset();
		let resource = resolve_after(100, 1_u8);
		let ResourceState::Pending(retry) = resource.read() else {
			panic!("expected pending");
		};

		let wakeups = Rc::new(Cell::new(0));
		let wakeups_clone = wakeups.clone();
		let _supervisor = Effect::new(move || {
			let _ = retry.watch();
			wakeups_clone.set(wakeups_clone.get() + 1);
		});

		assert_eq!(wakeups.get(), 1);
		clock::advance(100);
		assert_eq!(wakeups.get(), 2);
	}

	#[test]
	#[serial]
	fn test_ready_resource_never_suspends() {
		clock::reset();
		let resource: Resource<i32> = Resource::ready(9);
		assert_eq!(resource.status(), SlotStatus::Ready);
		assert_eq!(resource.read().ready(), Some(9));
	}

	#[test]
	#[serial]
	fn test_handle_reports_status() {
		clock::reset();
		let resource = resolve_after(40, ());
		let handle = resource.handle("slot");

		assert_eq!(handle.name(), "slot");
		assert!(handle.status().is_pending());

		clock::advance(40);
		assert!(handle.status().is_settled());
	}
}
