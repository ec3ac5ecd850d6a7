// SPDX-License-Identifier: Apache-2.0

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use byteway::{Segment, SEGMENT_SIZE};

fn data() -> Vec<u8> {
	(0..SEGMENT_SIZE).map(|i| i as u8).collect()
}

fn alloc_segment(c: &mut Criterion) {
	c.bench_function("alloc_segment", |b| b.iter(Segment::new));
}

fn push_slice(c: &mut Criterion) {
	let data = data();
	c.bench_function("push_slice", |b| b.iter_batched(
		Segment::new,
		|mut seg| assert_eq!(seg.push_slice(&data), SEGMENT_SIZE),
		BatchSize::PerIteration,
	));
}

fn pop_into_slice(c: &mut Criterion) {
	let data = data();
	let mut target = vec![0u8; SEGMENT_SIZE];

	c.bench_function("pop_into_slice", |b| b.iter_batched(
		|| {
			let mut seg = Segment::new();
			seg.push_slice(&data);
			seg
		},
		|mut seg| assert_eq!(seg.pop_into_slice(&mut target), SEGMENT_SIZE),
		BatchSize::PerIteration,
	));
}

fn share_and_split(c: &mut Criterion) {
	let data = data();
	let mut group = c.benchmark_group("share");

	group.bench_function("share_all", |b| b.iter_batched(
		|| {
			let mut seg = Segment::new();
			seg.push_slice(&data);
			seg
		},
		|mut seg| seg.share_all(),
		BatchSize::PerIteration,
	));

	group.bench_function("split_half", |b| b.iter_batched(
		|| {
			let mut seg = Segment::new();
			seg.push_slice(&data);
			seg
		},
		|mut seg| seg.split(SEGMENT_SIZE / 2),
		BatchSize::PerIteration,
	));
	group.finish();
}

criterion_group!(benches, alloc_segment, push_slice, pop_into_slice, share_and_split);
criterion_main!(benches);
