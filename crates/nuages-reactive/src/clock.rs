//! Virtual Clock - Deterministic Timer Queue
//!
//! All asynchrony in this toolkit is a callback scheduled on this queue.
//! Time only moves when [`advance`] is called: due timers fire in
//! (due-time, insertion) order, the clock lands on each timer's due time
//! while its callback runs, and the reactive runtime is flushed after every
//! firing so completions cascade deterministically.
//!
//! Timestamps are plain `u64` time-units (the demos treat them as
//! milliseconds). There is no wall-clock anywhere; tests and demos drive the
//! clock by hand.
//!
//! ## Example
//!
//! ```ignore
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! clock::schedule(300, move || flag.set(true));
//!
//! clock::advance(299);
//! assert!(!fired.get());
//! clock::advance(1);
//! assert!(fired.get());
//! ```

use core::cell::RefCell;
use std::collections::BTreeMap;

use crate::runtime::with_runtime;

/// Handle for a scheduled timer; pass to [`cancel`] to revoke it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId {
	due: u64,
	seq: u64,
}

type TimerFn = Box<dyn FnOnce() + 'static>;

#[derive(Default)]
struct TimerQueue {
	now: u64,
	next_seq: u64,
	// Keyed by (due, seq): iteration order is firing order.
	timers: BTreeMap<(u64, u64), TimerFn>,
}

thread_local! {
	static TIMERS: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
}

/// The current virtual time.
pub fn now() -> u64 {
	TIMERS.with(|q| q.borrow().now)
}

/// Schedules `f` to run `delay` time-units from now.
pub fn schedule(delay: u64, f: impl FnOnce() + 'static) -> TimerId {
	TIMERS.with(|q| {
		let mut queue = q.borrow_mut();
		let id = TimerId {
			due: queue.now + delay,
			seq: queue.next_seq,
		};
		queue.next_seq += 1;
		queue.timers.insert((id.due, id.seq), Box::new(f));
		tracing::trace!(due = id.due, "timer scheduled");
		id
	})
}

/// Revokes a timer. Returns `false` when it already fired or was cancelled.
pub fn cancel(id: TimerId) -> bool {
	TIMERS.with(|q| q.borrow_mut().timers.remove(&(id.due, id.seq)).is_some())
}

/// The due time of the earliest pending timer, if any.
pub fn next_due() -> Option<u64> {
	TIMERS.with(|q| q.borrow().timers.keys().next().map(|(due, _)| *due))
}

/// Moves the clock forward by `delta`, firing every timer that comes due.
///
/// Callbacks observe [`now`] as their own due time and may schedule or
/// cancel further timers, including ones due within the same window.
pub fn advance(delta: u64) {
	let target = now() + delta;

	loop {
		let next = TIMERS.with(|q| {
			let mut queue = q.borrow_mut();
			let key = *queue.timers.keys().next()?;
			if key.0 > target {
				return None;
			}
			let f = queue.timers.remove(&key)?;
			queue.now = key.0;
			Some(f)
		});

		// The queue borrow is released before the callback runs, so the
		// callback may re-enter schedule/cancel.
		match next {
			Some(callback) => {
				callback();
				with_runtime(|rt| rt.flush());
			}
			None => break,
		}
	}

	TIMERS.with(|q| q.borrow_mut().now = target);
}

/// Advances until no timers remain. Callers are responsible for making sure
/// the timer graph terminates.
pub fn advance_until_idle() {
	while let Some(due) = next_due() {
		let delta = due.saturating_sub(now());
		advance(delta);
	}
}

/// Drops all pending timers and rewinds the clock to zero. Test support.
pub fn reset() {
	TIMERS.with(|q| {
		let mut queue = q.borrow_mut();
		queue.timers.clear();
		queue.now = 0;
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;
	use std::rc::Rc;

	use serial_test::serial;

	#[test]
	#[serial]
	fn test_timer_fires_at_due_time() {
		reset();
		let fired = Rc::new(Cell::new(false));

		let flag = fired.clone();
		schedule(300, move || flag.set(true));

		advance(299);
		assert!(!fired.get());
		assert_eq!(now(), 299);

		advance(1);
		assert!(fired.get());
		assert_eq!(now(), 300);
	}

	#[test]
	#[serial]
	fn test_timers_fire_in_due_then_insertion_order() {
		reset();
		let order = Rc::new(RefCell::new(Vec::new()));

		for (delay, label) in [(200, "b"), (100, "a"), (200, "c")] {
			let order = order.clone();
			schedule(delay, move || order.borrow_mut().push(label));
		}

		advance(500);
		assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
	}

	#[test]
	#[serial]
	fn test_cancel_revokes_timer() {
		reset();
		let fired = Rc::new(Cell::new(false));

		let flag = fired.clone();
		let id = schedule(100, move || flag.set(true));

		assert!(cancel(id));
		advance(200);
		assert!(!fired.get());
		// Second cancel is a no-op.
		assert!(!cancel(id));
	}

	#[test]
	#[serial]
	fn test_callback_observes_its_own_due_time() {
		reset();
		let observed = Rc::new(Cell::new(0));

		let seen = observed.clone();
		schedule(150, move || seen.set(now()));

		advance(1000);
		assert_eq!(observed.get(), 150);
		assert_eq!(now(), 1000);
	}

	#[test]
	#[serial]
	fn test_callback_may_schedule_within_window() {
		reset();
		let order = Rc::new(RefCell::new(Vec::new()));

		let outer = order.clone();
		schedule(100, move || {
			outer.borrow_mut().push("first");
			let inner = outer.clone();
			schedule(50, move || inner.borrow_mut().push("second"));
		});

		advance(200);
		assert_eq!(*order.borrow(), vec!["first", "second"]);
		assert_eq!(now(), 200);
	}

	#[test]
	#[serial]
	fn test_advance_until_idle_drains_chains() {
		reset();
		let count = Rc::new(Cell::new(0));

		fn chain(count: Rc<Cell<u32>>) {
			schedule(10, move || {
				count.set(count.get() + 1);
				if count.get() < 5 {
					chain(count.clone());
				}
			});
		}

		chain(count.clone());
		advance_until_idle();
		assert_eq!(count.get(), 5);
		assert_eq!(now(), 50);
	}
}
