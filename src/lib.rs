//! nuages - Concurrent Rendering and Data Suspension, Simulated
//!
//! A toolkit for the awkward window between starting a fetch and having
//! something worth rendering: suspense-compatible resources, bundles that
//! swap atomically on navigation, transition and deferred-value policies,
//! and reveal-order composition - all on a single-threaded reactive
//! substrate with a deterministic virtual clock.
//!
//! The facade re-exports the member crates:
//!
//! - [`reactive`]: signals, effects, the runtime, and the virtual clock
//! - [`suspense`]: resources, bundles, the navigator, reveal groups, and
//!   boundaries
//!
//! Runnable walkthroughs live in `demos/` (`cargo run --example review_feed`,
//! `plus_three`, `reveal_order`).

pub use nuages_reactive as reactive;
pub use nuages_suspense as suspense;

/// The types most programs want in scope.
pub mod prelude {
	pub use nuages_reactive::clock;
	pub use nuages_reactive::{Effect, Signal, with_runtime};
	pub use nuages_suspense::{
		BoundaryView, Bundle, Completer, Entry, FetchError, Navigator, Phase, Presentation,
		Resource, ResourceState, RetrySignal, RevealGroup, RevealOrder, SlotHandle, SlotStatus,
		SuspenseBoundary, SwapPolicy, Tail,
	};
}
