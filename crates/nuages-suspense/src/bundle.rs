//! Bundle - Fixed-shape Group of Independently-resolving Slots
//!
//! A bundle is one page's worth of resources, keyed by a stable identifier:
//! every slot is initiated in the bundle's constructor, concurrently and
//! independently, and the bundle is immutable from then on. Navigation never
//! mutates a bundle; it builds a new one and supersedes the old.
//!
//! Implementors hold their slots as typed [`Resource`](crate::Resource)
//! fields and expose them type-erased through [`slots`](Bundle::slots) for
//! the navigation gate and reveal-order composition:
//!
//! ```ignore
//! struct ReviewBundle {
//!     id: u32,
//!     reviewer: Resource<Reviewer>,
//!     comments: Resource<Vec<Comment>>,
//! }
//!
//! impl Bundle for ReviewBundle {
//!     type Key = u32;
//!
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn slots(&self) -> Vec<SlotHandle> {
//!         vec![self.reviewer.handle("reviewer"), self.comments.handle("comments")]
//!     }
//! }
//! ```

use core::fmt;

use crate::resource::SlotHandle;

/// A fixed set of named resources fetched together for one identifying key.
pub trait Bundle: 'static {
	/// The stable identifier the bundle was built for (a subject id, an
	/// input value). Navigation swaps key and bundle together, atomically.
	type Key: Clone + PartialEq + fmt::Debug + 'static;

	fn key(&self) -> Self::Key;

	/// Type-erased handles for every slot, in declaration order.
	fn slots(&self) -> Vec<SlotHandle>;
}

/// Whether at least one slot has left `Pending`.
///
/// This is the navigator's default gating condition: the cheapest-to-satisfy
/// slot has something displayable (data, or a failure its boundary renders).
pub fn any_settled(slots: &[SlotHandle]) -> bool {
	slots.iter().any(|slot| slot.status().is_settled())
}

/// Whether every slot has left `Pending`.
pub fn all_settled(slots: &[SlotHandle]) -> bool {
	slots.iter().all(|slot| slot.status().is_settled())
}
