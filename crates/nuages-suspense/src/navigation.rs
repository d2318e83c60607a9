//! Navigator - Resource Lifecycle Across Navigations
//!
//! The navigator owns two pieces of state: the *active* entry (logical view
//! plus the bundle fetched for it) and the *displayed* entry (what consumers
//! should render right now). On every navigation it builds a fresh bundle
//! and swaps the active entry in a single signal update, so the identifying
//! key and the bundle can never be observed out of step.
//!
//! How fast `displayed` follows `active` is the [`SwapPolicy`]:
//!
//! - `Immediate`: displayed follows in the same update. Every boundary under
//!   the new view suspends on its own.
//! - `Transition`: the previous view keeps rendering and a `pending` flag is
//!   raised until the new bundle's cheapest slot settles, or a deadline
//!   elapses, whichever comes first.
//! - `Deferred`: consumers are handed the retained previous bundle together
//!   with a `stale` flag; boundaries are never blocked, only the bundle
//!   reference lags.
//!
//! Nothing is ever cancelled: superseded bundles keep resolving and their
//! results are discarded, which is safe because gates and deadline timers
//! are epoch-guarded.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use nuages_reactive::clock::TimerId;
use nuages_reactive::{Effect, Signal, clock};

use crate::bundle::Bundle;

/// How `displayed` follows `active` after a navigation. Deadlines are in
/// time-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPolicy {
	Immediate,
	Transition { deadline: u64 },
	Deferred { deadline: u64 },
}

/// Where the navigator currently is. Derived state, cycled indefinitely:
/// `Idle` -> (`Transitioning` | `Stale`) -> `Idle` -> ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Transitioning,
	Stale,
}

/// One navigation's worth of state: the logical view and the bundle fetched
/// for it. Lives in a single signal so the pair swaps atomically.
pub struct Entry<V, B> {
	pub view: V,
	pub bundle: Rc<B>,
}

impl<V: Clone, B> Clone for Entry<V, B> {
	fn clone(&self) -> Self {
		Self {
			view: self.view.clone(),
			bundle: self.bundle.clone(),
		}
	}
}

impl<V: fmt::Debug, B: Bundle> fmt::Debug for Entry<V, B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Entry")
			.field("view", &self.view)
			.field("key", &self.bundle.key())
			.finish()
	}
}

struct SwapState {
	epoch: u64,
	watcher: Option<Effect>,
	timer: Option<TimerId>,
}

struct NavCore<V: 'static, B: Bundle> {
	active: Signal<Entry<V, B>>,
	displayed: Signal<Entry<V, B>>,
	pending: Signal<bool>,
	stale: Signal<bool>,
	policy: SwapPolicy,
	build: Box<dyn Fn(B::Key) -> B>,
	swap: RefCell<SwapState>,
}

impl<V: Clone + 'static, B: Bundle> NavCore<V, B> {
	fn converged(&self) -> bool {
		self.displayed
			.with_untracked(|d| self.active.with_untracked(|a| Rc::ptr_eq(&d.bundle, &a.bundle)))
	}

	/// Makes `displayed` catch up with `active`, clears the flags, and tears
	/// down the gate. Ignored when `epoch` belongs to a superseded
	/// navigation.
	fn commit(&self, epoch: u64) {
		let mut swap = self.swap.borrow_mut();
		if swap.epoch != epoch {
			return;
		}
		if let Some(timer) = swap.timer.take() {
			clock::cancel(timer);
		}
		let watcher = swap.watcher.take();
		drop(swap);
		// May be the effect currently executing; dropping it here is safe.
		drop(watcher);

		self.displayed.set(self.active.get_untracked());
		self.pending.set(false);
		self.stale.set(false);
		tracing::debug!(at = clock::now(), "bundle swap committed");
	}

	/// Watches every slot of the new bundle and arms the deadline timer;
	/// whichever condition is met first commits the swap.
	fn install_gate(core: &Rc<Self>, epoch: u64, bundle: &Rc<B>, deadline: u64) {
		let slots = bundle.slots();
		let weak = Rc::downgrade(core);
		let watcher = Effect::new(move || {
			let settled = slots.iter().any(|slot| slot.watch().is_settled());
			if settled
				&& let Some(core) = weak.upgrade()
			{
				core.commit(epoch);
			}
		});

		let weak = Rc::downgrade(core);
		let timer = clock::schedule(deadline, move || {
			if let Some(core) = weak.upgrade() {
				tracing::debug!(at = clock::now(), "swap deadline elapsed");
				core.commit(epoch);
			}
		});

		// The watcher ran once already and may have committed (a slot can be
		// settled at construction time); only arm the gate if it did not.
		let mut swap = core.swap.borrow_mut();
		if swap.epoch == epoch && !core.converged() {
			swap.watcher = Some(watcher);
			swap.timer = Some(timer);
		} else {
			drop(swap);
			clock::cancel(timer);
		}
	}
}

/// The navigation / resource-lifecycle controller.
///
/// Constructed with a bundle factory and an initial view + key; the initial
/// bundle is built right here, never pulled from process-wide state.
pub struct Navigator<V: 'static, B: Bundle> {
	core: Rc<NavCore<V, B>>,
}

impl<V, B> Navigator<V, B>
where
	V: Clone + fmt::Debug + 'static,
	B: Bundle,
{
	pub fn new(
		policy: SwapPolicy,
		initial_view: V,
		initial_key: B::Key,
		build: impl Fn(B::Key) -> B + 'static,
	) -> Self {
		let bundle = Rc::new(build(initial_key));
		let entry = Entry {
			view: initial_view,
			bundle,
		};
		let core = Rc::new(NavCore {
			active: Signal::new(entry.clone()),
			displayed: Signal::new(entry),
			pending: Signal::new(false),
			stale: Signal::new(false),
			policy,
			build: Box::new(build),
			swap: RefCell::new(SwapState {
				epoch: 0,
				watcher: None,
				timer: None,
			}),
		});
		Self { core }
	}

	/// Navigates: builds the bundle for `key`, swaps view and bundle
	/// together in one observable update, then applies the swap policy.
	///
	/// A navigation issued while a previous one is still in its window
	/// supersedes it; the earlier gate and deadline become no-ops.
	pub fn navigate(&self, view: V, key: B::Key) {
		let core = &self.core;

		let epoch = {
			let mut swap = core.swap.borrow_mut();
			swap.epoch += 1;
			if let Some(timer) = swap.timer.take() {
				clock::cancel(timer);
			}
			swap.watcher = None;
			swap.epoch
		};

		let bundle = Rc::new((core.build)(key));
		tracing::debug!(view = ?view, key = ?bundle.key(), at = clock::now(), "navigating");
		core.active.set(Entry {
			view,
			bundle: bundle.clone(),
		});

		match core.policy {
			SwapPolicy::Immediate => core.commit(epoch),
			SwapPolicy::Transition { deadline } => {
				core.pending.set(true);
				NavCore::install_gate(core, epoch, &bundle, deadline);
			}
			SwapPolicy::Deferred { deadline } => {
				core.stale.set(true);
				NavCore::install_gate(core, epoch, &bundle, deadline);
			}
		}
	}

	/// The entry consumers should render: possibly a retained previous one.
	pub fn displayed(&self) -> Signal<Entry<V, B>> {
		self.core.displayed.clone()
	}

	/// The entry belonging to the latest navigation.
	pub fn active(&self) -> Signal<Entry<V, B>> {
		self.core.active.clone()
	}

	/// True while a `Transition`-policy swap is withheld.
	pub fn pending(&self) -> Signal<bool> {
		self.core.pending.clone()
	}

	/// True exactly while the displayed bundle differs from the active one
	/// under the `Deferred` policy.
	pub fn stale(&self) -> Signal<bool> {
		self.core.stale.clone()
	}

	pub fn displayed_entry(&self) -> Entry<V, B> {
		self.core.displayed.get_untracked()
	}

	pub fn active_entry(&self) -> Entry<V, B> {
		self.core.active.get_untracked()
	}

	pub fn phase(&self) -> Phase {
		if self.core.converged() {
			Phase::Idle
		} else if self.core.pending.get_untracked() {
			Phase::Transitioning
		} else {
			Phase::Stale
		}
	}
}
