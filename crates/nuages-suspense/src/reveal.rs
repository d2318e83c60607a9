//! Reveal Order - Coordinated Reveal of Sibling Boundaries
//!
//! Sibling boundaries resolve in whatever order their resources happen to
//! settle. A [`RevealGroup`] imposes a visible order on top of that: data
//! keeps arriving in the background, but what each child *shows* follows the
//! configured [`RevealOrder`] and [`Tail`] mode.
//!
//! The policy itself is the pure function [`presentations`]; the group is a
//! thin reactive wrapper that re-publishes it whenever any child settles.

use nuages_reactive::{Effect, Signal};

use crate::resource::{SlotHandle, SlotStatus};

/// The relative visible-reveal sequencing of sibling boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOrder {
	/// Reveal strictly in declaration order; a settled child is withheld
	/// while an earlier sibling is still pending.
	Forwards,
	/// The mirror image: reveal from the last child backwards.
	Backwards,
	/// Reveal everything at once, only when every child is settled.
	Together,
}

/// What the not-yet-revealed children show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
	/// Every unrevealed child shows its own fallback.
	Every,
	/// Only the next child in reveal order shows a fallback; the rest show
	/// nothing.
	Collapsed,
}

/// What one child should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
	/// The child's own content (data, or its failure fallback for a failed
	/// slot).
	Content,
	Fallback,
	Hidden,
}

/// Computes each child's presentation from the slot statuses.
///
/// Statuses arrive in declaration order. `Together` ignores `tail`: until
/// the last child settles, every child shows its fallback.
pub fn presentations(statuses: &[SlotStatus], order: RevealOrder, tail: Tail) -> Vec<Presentation> {
	match order {
		RevealOrder::Together => {
			if statuses.iter().all(|status| status.is_settled()) {
				vec![Presentation::Content; statuses.len()]
			} else {
				vec![Presentation::Fallback; statuses.len()]
			}
		}
		RevealOrder::Forwards => sequential(statuses.iter().copied(), tail),
		RevealOrder::Backwards => {
			let mut reversed = sequential(statuses.iter().rev().copied(), tail);
			reversed.reverse();
			reversed
		}
	}
}

// Reveal the settled prefix; the first pending child blocks everything after
// it, settled or not.
fn sequential(statuses: impl Iterator<Item = SlotStatus>, tail: Tail) -> Vec<Presentation> {
	let mut blocked = false;
	statuses
		.map(|status| {
			if blocked {
				match tail {
					Tail::Every => Presentation::Fallback,
					Tail::Collapsed => Presentation::Hidden,
				}
			} else if status.is_settled() {
				Presentation::Content
			} else {
				blocked = true;
				Presentation::Fallback
			}
		})
		.collect()
}

/// Reactive reveal-order composition over a fixed set of children.
pub struct RevealGroup {
	children: Vec<SlotHandle>,
	output: Signal<Vec<Presentation>>,
	_watcher: Effect,
}

impl RevealGroup {
	/// Builds the group and computes the initial presentations immediately.
	pub fn new(children: Vec<SlotHandle>, order: RevealOrder, tail: Tail) -> Self {
		let output = Signal::new(Vec::new());

		let watched = children.clone();
		let published = output.clone();
		let watcher = Effect::new(move || {
			let statuses: Vec<SlotStatus> = watched.iter().map(|slot| slot.watch()).collect();
			published.set(presentations(&statuses, order, tail));
		});

		Self {
			children,
			output,
			_watcher: watcher,
		}
	}

	/// The per-child presentations, in declaration order. Subscribe by
	/// reading it inside an effect.
	pub fn output(&self) -> Signal<Vec<Presentation>> {
		self.output.clone()
	}

	/// The current presentation of the child registered under `name`.
	pub fn presentation_of(&self, name: &str) -> Option<Presentation> {
		let index = self.children.iter().position(|slot| slot.name() == name)?;
		self.output.with_untracked(|presentations| presentations.get(index).copied())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::resolve_after;
	use nuages_reactive::clock;
	use rstest::rstest;
	use serial_test::serial;

	use Presentation::{Content, Fallback, Hidden};
	use SlotStatus::{Failed, Pending, Ready};

	#[rstest]
	#[case(&[Ready, Pending, Pending], &[Content, Fallback, Fallback])]
	#[case(&[Pending, Ready, Ready], &[Fallback, Fallback, Fallback])]
	#[case(&[Ready, Ready, Ready], &[Content, Content, Content])]
	#[case(&[Failed, Pending, Ready], &[Content, Fallback, Fallback])]
	fn test_forwards_with_every_tail(
		#[case] statuses: &[SlotStatus],
		#[case] expected: &[Presentation],
	) {
		assert_eq!(
			presentations(statuses, RevealOrder::Forwards, Tail::Every),
			expected
		);
	}

	#[rstest]
	#[case(&[Ready, Pending, Ready], &[Content, Fallback, Hidden])]
	#[case(&[Pending, Pending, Pending], &[Fallback, Hidden, Hidden])]
	fn test_forwards_with_collapsed_tail(
		#[case] statuses: &[SlotStatus],
		#[case] expected: &[Presentation],
	) {
		assert_eq!(
			presentations(statuses, RevealOrder::Forwards, Tail::Collapsed),
			expected
		);
	}

	#[rstest]
	#[case(&[Pending, Pending, Ready], &[Fallback, Fallback, Content])]
	#[case(&[Ready, Pending, Ready], &[Fallback, Fallback, Content])]
	fn test_backwards_mirrors_forwards(
		#[case] statuses: &[SlotStatus],
		#[case] expected: &[Presentation],
	) {
		assert_eq!(
			presentations(statuses, RevealOrder::Backwards, Tail::Every),
			expected
		);
	}

	#[rstest]
	#[case(&[Ready, Pending], &[Fallback, Fallback])]
	#[case(&[Ready, Failed], &[Content, Content])]
	fn test_together_is_all_or_nothing(
		#[case] statuses: &[SlotStatus],
		#[case] expected: &[Presentation],
	) {
		assert_eq!(
			presentations(statuses, RevealOrder::Together, Tail::Every),
			expected
		);
	}

	#[test]
	#[serial]
	fn test_group_withholds_early_resolver_under_forwards() {
		clock::reset();
		// B settles before A, but A is declared first.
		let a = resolve_after(100, "a");
		let b = resolve_after(50, "b");
		let group = RevealGroup::new(
			vec![a.handle("a"), b.handle("b")],
			RevealOrder::Forwards,
			Tail::Every,
		);

		clock::advance(50);
		// B's data arrived; its reveal is still withheld behind A.
		assert_eq!(group.presentation_of("a"), Some(Fallback));
		assert_eq!(group.presentation_of("b"), Some(Fallback));

		clock::advance(50);
		// A settled; both reveal in the same instant.
		assert_eq!(group.presentation_of("a"), Some(Content));
		assert_eq!(group.presentation_of("b"), Some(Content));
	}

	#[test]
	#[serial]
	fn test_group_together_reveals_nothing_early() {
		clock::reset();
		let a = resolve_after(100, "a");
		let b = resolve_after(50, "b");
		let group = RevealGroup::new(
			vec![a.handle("a"), b.handle("b")],
			RevealOrder::Together,
			Tail::Every,
		);

		clock::advance(99);
		assert_eq!(
			group.output().get_untracked(),
			vec![Fallback, Fallback]
		);

		clock::advance(1);
		assert_eq!(group.output().get_untracked(), vec![Content, Content]);
	}
}
