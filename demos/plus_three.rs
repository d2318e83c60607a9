//! The "+3 calculator": a synchronously-echoed input next to a slow,
//! deferred-value result.
//!
//! The echo is high-priority state - a plain signal written outside any
//! policy, so it never lags the input event. The result is low-priority: the
//! navigator retains the previous result bundle with a stale flag until the
//! new one is ready.
//!
//! Run with `cargo run --example plus_three`.

use nuages::prelude::*;
use nuages::suspense::resolve_after;

struct SumBundle {
	input: u32,
	sum: Resource<u32>,
}

// The "server" takes half a second to add three.
fn fetch_sum(input: u32) -> SumBundle {
	SumBundle {
		input,
		sum: resolve_after(500, input + 3),
	}
}

impl Bundle for SumBundle {
	type Key = u32;

	fn key(&self) -> u32 {
		self.input
	}

	fn slots(&self) -> Vec<SlotHandle> {
		vec![self.sum.handle("sum")]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
	Calculator,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info".into()),
		)
		.init();

	// High-priority: the raw input echo, updated synchronously on every
	// keystroke, never wrapped in any policy.
	let echo = Signal::new(1_u32);

	let nav = Navigator::new(
		SwapPolicy::Deferred { deadline: 2_000 },
		View::Calculator,
		1,
		fetch_sum,
	);

	let displayed = nav.displayed();
	let result_boundary = SuspenseBoundary::new({
		let displayed = displayed.clone();
		move || displayed.with(|entry| entry.bundle.sum.read())
	});

	let frame = |note: &str| {
		let result = match result_boundary.snapshot() {
			BoundaryView::Content(sum) => sum.to_string(),
			BoundaryView::Fallback => "…".to_string(),
			BoundaryView::Failed(error) => format!("error: {error}"),
		};
		println!(
			"t={:>5} input={} result(for {})={} stale={} {}",
			clock::now(),
			echo.get_untracked(),
			nav.displayed_entry().bundle.input,
			result,
			nav.stale().get_untracked(),
			note,
		);
	};

	clock::advance(500); // initial sum for input 1 arrives
	frame("warm start");

	let type_digit = |digit: u32| {
		// The echo updates first, synchronously; the fetch rides behind it.
		echo.set(digit);
		nav.navigate(View::Calculator, digit);
	};

	println!("-- type 4 --");
	type_digit(4);
	frame("echo moved instantly; old result shown stale");
	clock::advance(499);
	frame("still the retained value");
	clock::advance(1);
	frame("new result converged, stale flag dropped");

	println!("-- type 7, then 8 before 7's result lands --");
	type_digit(7);
	clock::advance(200);
	frame("7 still in flight");
	type_digit(8);
	frame("8 superseded 7; the 7 fetch keeps running and is discarded");
	clock::advance(500);
	frame("result for 8; 7's late arrival changed nothing");
}
