//! nuages-suspense - Data Suspension for Single-threaded Reactive UIs
//!
//! The pieces a concurrent-rendering UI needs between "a fetch was started"
//! and "the data is on screen":
//!
//! - [`resource`]: [`Resource<T, E>`] - wraps one asynchronous operation
//!   behind a synchronous [`read`](Resource::read) with an explicit
//!   pending / ready / failed state and a retry signal
//! - [`bundle`]: [`Bundle`] - a fixed-shape group of independently-resolving
//!   slots keyed by one identifier
//! - [`navigation`]: [`Navigator`] - swaps bundles wholesale on navigation,
//!   under an immediate, transition (pending flag + deadline), or deferred
//!   (stale flag) policy
//! - [`reveal`]: [`RevealGroup`] - forwards/backwards/together reveal-order
//!   composition over sibling boundaries
//! - [`boundary`]: [`SuspenseBoundary`] - the supervisor that retries a
//!   suspended consumer and contains a failed one
//!
//! Rendering, DOM work, and styling stay outside: every type here exposes
//! plain signals for an external renderer to consume.

pub mod boundary;
pub mod bundle;
pub mod navigation;
pub mod resource;
pub mod reveal;

pub use boundary::{BoundaryView, SuspenseBoundary};
pub use bundle::{Bundle, all_settled, any_settled};
pub use navigation::{Entry, Navigator, Phase, SwapPolicy};
pub use resource::{
	Completer, FetchError, Resource, ResourceState, RetrySignal, SlotHandle, SlotStatus,
	reject_after, resolve_after,
};
pub use reveal::{Presentation, RevealGroup, RevealOrder, Tail, presentations};
