//! nuages-reactive - Single-threaded Reactive Substrate
//!
//! The foundation the suspension toolkit is built on: a fine-grained reactive
//! system in the Leptos/Solid.js tradition, plus a deterministic virtual clock.
//!
//! ## Modules
//!
//! - [`runtime`]: Thread-local dependency graph, observer stack, update queue
//! - [`signal`]: [`Signal<T>`] - reactive state cell with automatic dependency tracking
//! - [`effect`]: [`Effect`] - side effect re-run when tracked signals change
//! - [`clock`]: Virtual time - timers fire deterministically under [`clock::advance`]
//!
//! All state is thread-local. There is no parallelism anywhere in this crate,
//! only interleaved completion ordering of scheduled callbacks.

pub mod clock;
pub mod effect;
pub mod runtime;
pub mod signal;

pub use effect::Effect;
pub use runtime::{NodeId, Runtime, try_with_runtime, with_runtime};
pub use signal::Signal;
