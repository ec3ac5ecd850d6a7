// SPDX-License-Identifier: Apache-2.0

use criterion::{Criterion, criterion_group, criterion_main};
use byteway::{Pool, PoolConfig};

fn take_and_recycle(c: &mut Criterion) {
	let pool = Pool::new(PoolConfig::default());
	c.bench_function("take_and_recycle", |b| b.iter(|| {
		let seg = pool.take();
		pool.recycle(seg);
	}));
}

fn shared_pool_contention(c: &mut Criterion) {
	use std::sync::Arc;
	use std::thread;

	let pool = Arc::new(Pool::new(PoolConfig::default()));
	c.bench_function("shared_pool_contention", |b| b.iter(|| {
		thread::scope(|scope| {
			for _ in 0..4 {
				let pool = Arc::clone(&pool);
				scope.spawn(move || {
					for _ in 0..256 {
						let seg = pool.take();
						pool.recycle(seg);
					}
				});
			}
		});
	}));
}

criterion_group!(benches, take_and_recycle, shared_pool_contention);
criterion_main!(benches);
