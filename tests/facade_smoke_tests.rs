//! End-to-end smoke test through the facade prelude

use nuages::prelude::*;
use serial_test::serial;

struct ProfileBundle {
	id: u32,
	greeting: Resource<String>,
}

impl ProfileBundle {
	fn fetch(id: u32) -> Self {
		Self {
			id,
			greeting: Resource::new(|completer| {
				clock::schedule(300, move || completer.fulfill(format!("hello, {id}")));
			}),
		}
	}
}

impl Bundle for ProfileBundle {
	type Key = u32;

	fn key(&self) -> u32 {
		self.id
	}

	fn slots(&self) -> Vec<SlotHandle> {
		vec![self.greeting.handle("greeting")]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
	Profile,
}

#[test]
#[serial]
fn test_prelude_covers_a_full_page_load() {
	clock::reset();

	let nav = Navigator::new(
		SwapPolicy::Transition { deadline: 3_000 },
		View::Profile,
		1,
		ProfileBundle::fetch,
	);

	let displayed = nav.displayed();
	let boundary = SuspenseBoundary::new(move || {
		displayed.with(|entry| entry.bundle.greeting.read())
	});

	assert_eq!(boundary.snapshot(), BoundaryView::Fallback);

	clock::advance(300);
	assert_eq!(
		boundary.snapshot(),
		BoundaryView::Content("hello, 1".to_string())
	);

	nav.navigate(View::Profile, 2);
	assert_eq!(nav.phase(), Phase::Transitioning);
	clock::advance(300);
	assert_eq!(
		boundary.snapshot(),
		BoundaryView::Content("hello, 2".to_string())
	);
	assert_eq!(nav.phase(), Phase::Idle);
}
