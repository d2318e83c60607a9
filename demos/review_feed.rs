//! Reviewer feed walkthrough: three independently-resolving slots behind
//! nested boundaries, navigated under the transition policy.
//!
//! Run with `cargo run --example review_feed`.

use nuages::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Reviewer {
	id: u32,
	name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Comment {
	author: String,
	body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CommentResponse {
	author: String,
	body: String,
}

struct ReviewBundle {
	id: u32,
	reviewer: Resource<Reviewer>,
	comments: Resource<Vec<Comment>>,
	responses: Resource<Vec<CommentResponse>>,
}

// Slot latencies per subject. Subject 9 is pathologically slow: its fastest
// slot lands well past the navigator's deadline.
fn latencies(id: u32) -> (u64, u64, u64) {
	match id {
		9 => (5_000, 6_000, 7_000),
		_ => (300, 800, 1_500),
	}
}

fn reviewer_name(id: u32) -> &'static str {
	match id {
		3 => "Marioli",
		5 => "Ada",
		9 => "Slow Joe",
		_ => "Anonymous",
	}
}

fn fetch_review_data(id: u32) -> ReviewBundle {
	let (reviewer_at, comments_at, responses_at) = latencies(id);
	ReviewBundle {
		id,
		reviewer: nuages::suspense::resolve_after(
			reviewer_at,
			Reviewer {
				id,
				name: reviewer_name(id).to_string(),
			},
		),
		comments: nuages::suspense::resolve_after(
			comments_at,
			vec![Comment {
				author: format!("fan-of-{id}"),
				body: "Sharp review, would read again.".to_string(),
			}],
		),
		responses: nuages::suspense::resolve_after(
			responses_at,
			vec![CommentResponse {
				author: reviewer_name(id).to_string(),
				body: "Thanks! More coming soon.".to_string(),
			}],
		),
	}
}

impl Bundle for ReviewBundle {
	type Key = u32;

	fn key(&self) -> u32 {
		self.id
	}

	fn slots(&self) -> Vec<SlotHandle> {
		vec![
			self.reviewer.handle("reviewer"),
			self.comments.handle("comments"),
			self.responses.handle("responses"),
		]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
	Profile,
}

fn cell<T: Serialize>(view: &BoundaryView<T, FetchError>) -> String {
	match view {
		BoundaryView::Content(value) => {
			serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
		}
		BoundaryView::Fallback => "(loading…)".to_string(),
		BoundaryView::Failed(error) => format!("(failed: {error})"),
	}
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info".into()),
		)
		.init();

	let nav = Navigator::new(
		SwapPolicy::Transition { deadline: 3_000 },
		View::Profile,
		3,
		fetch_review_data,
	);

	// Each boundary reads through the *displayed* entry, so it re-renders
	// both when its slot settles and when the navigator commits a swap.
	let displayed = nav.displayed();
	let reviewer_boundary = SuspenseBoundary::new({
		let displayed = displayed.clone();
		move || displayed.with(|entry| entry.bundle.reviewer.read())
	});
	let comments_boundary = SuspenseBoundary::new({
		let displayed = displayed.clone();
		move || displayed.with(|entry| entry.bundle.comments.read())
	});
	let responses_boundary = SuspenseBoundary::new({
		let displayed = displayed.clone();
		move || displayed.with(|entry| entry.bundle.responses.read())
	});

	let frame = |label: &str| {
		println!(
			"t={:>5} subject={} pending={} | reviewer {} | comments {} | responses {}",
			clock::now(),
			nav.displayed_entry().bundle.key(),
			nav.pending().get_untracked(),
			cell(&reviewer_boundary.snapshot()),
			cell(&comments_boundary.snapshot()),
			cell(&responses_boundary.snapshot()),
		);
		if !label.is_empty() {
			println!("       ^ {label}");
		}
	};

	println!("-- initial load of subject 3 --");
	frame("all three slots fetching");
	for step in [300, 500, 700] {
		clock::advance(step);
		frame("");
	}

	println!("-- navigate to subject 5 (transition policy, deadline 3000) --");
	nav.navigate(View::Profile, 5);
	frame("previous subject stays up, pending flag raised");
	clock::advance(300);
	frame("subject 5's cheapest slot settled: swap committed");
	clock::advance(1_200);
	frame("");

	println!("-- navigate to subject 9 (fastest slot at 5000: deadline wins) --");
	nav.navigate(View::Profile, 9);
	clock::advance(2_999);
	frame("still showing subject 5 just before the deadline");
	clock::advance(1);
	frame("deadline forced the swap; slots still loading past it");
	clock::advance(4_000);
	frame("late data filled in as it arrived");
}
