//! Reveal-order walkthrough: the same three staggered slots composed under
//! every ordering policy.
//!
//! The slots settle at t=300 (header), t=800 (body), t=150 (footer) - the
//! footer's data arrives first, and each policy decides what that is worth.
//!
//! Run with `cargo run --example reveal_order`.

use nuages::prelude::*;
use nuages::suspense::resolve_after;

fn make_group(order: RevealOrder, tail: Tail) -> (RevealGroup, Vec<Resource<&'static str>>) {
	let header = resolve_after(300, "header");
	let body = resolve_after(800, "body");
	let footer = resolve_after(150, "footer");

	let group = RevealGroup::new(
		vec![
			header.handle("header"),
			body.handle("body"),
			footer.handle("footer"),
		],
		order,
		tail,
	);
	(group, vec![header, body, footer])
}

fn glyph(presentation: Presentation) -> &'static str {
	match presentation {
		Presentation::Content => "content",
		Presentation::Fallback => "spinner",
		Presentation::Hidden => "   -   ",
	}
}

fn run(label: &str, order: RevealOrder, tail: Tail) {
	println!("-- {label} --");
	let start = clock::now();
	let (group, _slots) = make_group(order, tail);

	let frame = |group: &RevealGroup, start: u64| {
		let row: Vec<&str> = group
			.output()
			.get_untracked()
			.into_iter()
			.map(glyph)
			.collect();
		println!(
			"t={:>4} [header {} | body {} | footer {}]",
			clock::now() - start,
			row[0],
			row[1],
			row[2],
		);
	};

	frame(&group, start);
	for step in [150, 150, 500] {
		clock::advance(step);
		frame(&group, start);
	}
	println!();
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info".into()),
		)
		.init();

	// The footer resolves first in every run; watch who gets to show it.
	run(
		"forwards, every fallback",
		RevealOrder::Forwards,
		Tail::Every,
	);
	run(
		"forwards, collapsed tail",
		RevealOrder::Forwards,
		Tail::Collapsed,
	);
	run(
		"backwards, every fallback",
		RevealOrder::Backwards,
		Tail::Every,
	);
	run("together", RevealOrder::Together, Tail::Every);
}
