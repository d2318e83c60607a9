//! Boundary - Suspend/Error Supervisor for One Region
//!
//! A [`SuspenseBoundary`] wraps one consumer: a closure that reads resources
//! and produces a rendered value. The closure runs inside an effect, so a
//! pending read subscribes the boundary to the resource's completion signal
//! and the consumer is re-invoked *from scratch* once it fires - retried,
//! never resumed mid-way.
//!
//! Failure stays local: a `Failed` read becomes this boundary's failure
//! fallback and nothing else. Sibling boundaries keep rendering their own
//! fallback-or-data, and there is no built-in retry - navigating again (a
//! normal new bundle) is the only recovery path.

use nuages_reactive::{Effect, Signal};

use crate::resource::ResourceState;

/// What a supervised region renders right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryView<R, E> {
	Content(R),
	/// The consumer suspended; show the designated loading fallback.
	Fallback,
	/// The consumer's resource failed; show the designated failure fallback.
	Failed(E),
}

impl<R, E> BoundaryView<R, E> {
	pub fn is_content(&self) -> bool {
		matches!(self, BoundaryView::Content(_))
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, BoundaryView::Fallback)
	}
}

/// Supervises one consumer closure, holding the region's current view.
pub struct SuspenseBoundary<R: Clone + 'static, E: Clone + 'static> {
	view: Signal<BoundaryView<R, E>>,
	_watcher: Effect,
}

impl<R: Clone + 'static, E: Clone + 'static> SuspenseBoundary<R, E> {
	/// Runs `consume` immediately and again whenever a resource it read
	/// settles or changes.
	pub fn new(mut consume: impl FnMut() -> ResourceState<R, E> + 'static) -> Self {
		let view = Signal::new(BoundaryView::Fallback);

		let published = view.clone();
		let watcher = Effect::new(move || {
			let next = match consume() {
				ResourceState::Ready(value) => BoundaryView::Content(value),
				// read() already subscribed us to the retry signal.
				ResourceState::Pending(_) => BoundaryView::Fallback,
				ResourceState::Failed(error) => {
					tracing::debug!("boundary captured a slot failure");
					BoundaryView::Failed(error)
				}
			};
			published.set(next);
		});

		Self {
			view,
			_watcher: watcher,
		}
	}

	/// The region's view. Subscribe by reading it inside an effect.
	pub fn view(&self) -> Signal<BoundaryView<R, E>> {
		self.view.clone()
	}

	/// The current view, without subscribing.
	pub fn snapshot(&self) -> BoundaryView<R, E> {
		self.view.get_untracked()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::{FetchError, reject_after, resolve_after};
	use nuages_reactive::clock;
	use serial_test::serial;

	#[test]
	#[serial]
	fn test_boundary_shows_fallback_then_content() {
		clock::reset();
		let resource = resolve_after(300, "Marioli".to_string());

		let boundary = SuspenseBoundary::new(move || resource.read());
		assert_eq!(boundary.snapshot(), BoundaryView::Fallback);

		clock::advance(299);
		assert_eq!(boundary.snapshot(), BoundaryView::Fallback);

		clock::advance(2);
		assert_eq!(
			boundary.snapshot(),
			BoundaryView::Content("Marioli".to_string())
		);
	}

	#[test]
	#[serial]
	fn test_boundary_maps_consumer_output() {
		clock::reset();
		let resource = resolve_after(100, 39_i32);

		let boundary = SuspenseBoundary::new(move || resource.read().map(|n| n + 3));
		clock::advance(100);
		assert_eq!(boundary.snapshot(), BoundaryView::Content(42));
	}

	#[test]
	#[serial]
	fn test_failure_stays_local_to_its_boundary() {
		clock::reset();
		let healthy = resolve_after(200, "comments".to_string());
		let broken: crate::Resource<String> =
			reject_after(100, FetchError::Upstream("responses down".into()));

		let healthy_boundary = SuspenseBoundary::new(move || healthy.read());
		let broken_boundary = SuspenseBoundary::new(move || broken.read());

		clock::advance(100);
		assert_eq!(
			broken_boundary.snapshot(),
			BoundaryView::Failed(FetchError::Upstream("responses down".into()))
		);
		// The sibling keeps loading, undisturbed.
		assert_eq!(healthy_boundary.snapshot(), BoundaryView::Fallback);

		clock::advance(100);
		assert_eq!(
			healthy_boundary.snapshot(),
			BoundaryView::Content("comments".to_string())
		);
	}
}
