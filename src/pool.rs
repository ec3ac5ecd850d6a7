// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A process-wide, lock-free, thread-sharded recycler of [`Segment`]s, with an
//! optional second tier.
//!
//! Each thread is assigned a shard the first time it touches the pool, and
//! keeps using that shard for the rest of its lifetime. Shards are
//! [`crossbeam_queue::SegQueue`]s, a lock-free MPMC queue, so take/recycle
//! never block a thread that picked a contended shard; they just see a
//! (temporarily) empty queue and fall back accordingly.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use crossbeam_queue::SegQueue;
use once_cell::sync::Lazy;
use crate::segment::{Segment, SIZE};

/// Tuning knobs for a [`Pool`]. `Default` sizes the first tier from
/// [`std::thread::available_parallelism`], matching the specification's
/// "least power of two ≥ 2 × hardware concurrency" rule. The second tier is
/// disabled by default; enabling it gives recycled segments a second home
/// once the first tier's shards are full, at the cost of a linear scan.
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct PoolConfig {
	/// Number of first-tier shards. Rounded up to a power of two.
	pub l1_shards: usize,
	/// Maximum resident bytes per first-tier shard.
	pub l1_max_bytes: usize,
	/// Number of second-tier shards. Rounded up to a power of two.
	pub l2_shards: usize,
	/// Maximum resident bytes per second-tier shard.
	pub l2_max_bytes: usize,
	/// Whether the second tier is consulted at all.
	pub l2_enabled: bool,
}

/// Default per-shard byte ceiling: 64 KiB, eight segments at the default
/// segment size.
pub const DEFAULT_L1_MAX_BYTES: usize = 64 * 1024;

impl Default for PoolConfig {
	fn default() -> Self {
		let cpus = std::thread::available_parallelism()
			.map(|n| n.get())
			.unwrap_or(1);
		let l1_shards = (2 * cpus).next_power_of_two();
		Self {
			l1_shards,
			l1_max_bytes: DEFAULT_L1_MAX_BYTES,
			l2_shards: (l1_shards / 2).max(1),
			l2_max_bytes: DEFAULT_L1_MAX_BYTES,
			l2_enabled: false,
		}
	}
}

struct Shard {
	queue: SegQueue<Segment>,
	bytes: AtomicUsize,
}

impl Shard {
	fn new() -> Self {
		Self { queue: SegQueue::new(), bytes: AtomicUsize::new(0) }
	}
}

/// The segment recycler. Construct one with [`Pool::new`] for an isolated
/// pool (useful in tests), or use [`Pool::shared`] for the process-wide
/// default instance every [`Buffer`](crate::buffer::Buffer) uses unless told
/// otherwise.
pub struct Pool {
	l1: Vec<Shard>,
	l2: Vec<Shard>,
	l1_max_bytes: usize,
	l2_max_bytes: usize,
	l2_enabled: bool,
}

thread_local! {
	static SHARD_HINT: Cell<Option<usize>> = const { Cell::new(None) };
}

static NEXT_SHARD: AtomicUsize = AtomicUsize::new(0);

static SHARED_POOL: Lazy<Arc<Pool>> = Lazy::new(|| Arc::new(Pool::new(PoolConfig::default())));

impl Pool {
	/// Builds a pool with the given configuration.
	pub fn new(config: PoolConfig) -> Self {
		let l1_shards = config.l1_shards.max(1).next_power_of_two();
		let l2_shards = config.l2_shards.max(1).next_power_of_two();
		Self {
			l1: (0..l1_shards).map(|_| Shard::new()).collect(),
			l2: (0..l2_shards).map(|_| Shard::new()).collect(),
			l1_max_bytes: config.l1_max_bytes,
			l2_max_bytes: config.l2_max_bytes,
			l2_enabled: config.l2_enabled,
		}
	}

	/// The process-wide default pool, lazily constructed from
	/// [`PoolConfig::default`].
	pub fn shared() -> Arc<Pool> { Arc::clone(&SHARED_POOL) }

	fn shard_index(&self, shards: &[Shard]) -> usize {
		let hint = SHARD_HINT.with(|cell| {
			if let Some(i) = cell.get() {
				i
			} else {
				let i = NEXT_SHARD.fetch_add(1, Ordering::Relaxed);
				cell.set(Some(i));
				i
			}
		});
		hint & (shards.len() - 1)
	}

	/// Takes a segment from the pool, allocating a fresh one if this
	/// thread's shard (and, if enabled, every L2 shard) is empty. Always
	/// succeeds; the happy path is wait-free, the fallback under contention
	/// is lock-free (the queue retries internally).
	pub fn take(&self) -> Segment {
		let idx = self.shard_index(&self.l1);
		if let Some(seg) = self.l1[idx].queue.pop() {
			self.l1[idx].bytes.fetch_sub(SIZE, Ordering::AcqRel);
			return seg;
		}

		if self.l2_enabled {
			for shard in &self.l2 {
				if let Some(seg) = shard.queue.pop() {
					shard.bytes.fetch_sub(SIZE, Ordering::AcqRel);
					return seg;
				}
			}
		}

		#[cfg(feature = "tracing")]
		tracing::trace!("segment pool miss, allocating fresh segment");

		Segment::new()
	}

	/// Takes `count` segments from the pool.
	pub fn take_count(&self, count: usize) -> Vec<Segment> {
		(0..count).map(|_| self.take()).collect()
	}

	/// Returns a segment to the pool. If the segment's storage is still
	/// aliased elsewhere ([`Segment::release`] reports shared), it is
	/// dropped instead of recycled — pooling it would let a future writer
	/// corrupt bytes a peer is still reading. Otherwise it is reset and
	/// pushed onto this thread's L1 shard, overflowing into L2 (if enabled)
	/// or being dropped once that shard is at `l1_max_bytes`.
	pub fn recycle(&self, mut segment: Segment) {
		if segment.release() {
			return;
		}

		segment.reset();

		let idx = self.shard_index(&self.l1);
		let shard = &self.l1[idx];
		if shard.bytes.load(Ordering::Acquire) + SIZE <= self.l1_max_bytes {
			shard.bytes.fetch_add(SIZE, Ordering::AcqRel);
			shard.queue.push(segment);
			return;
		}

		if self.l2_enabled {
			for shard in &self.l2 {
				if shard.bytes.load(Ordering::Acquire) + SIZE <= self.l2_max_bytes {
					shard.bytes.fetch_add(SIZE, Ordering::AcqRel);
					shard.queue.push(segment);
					return;
				}
			}
		}

		#[cfg(feature = "tracing")]
		tracing::trace!("segment pool full, dropping segment");
	}

	/// Returns many segments to the pool.
	pub fn recycle_all(&self, segments: impl IntoIterator<Item = Segment>) {
		for segment in segments {
			self.recycle(segment);
		}
	}

	/// The number of bytes currently resident on the calling thread's L1
	/// shard. Exposed for tests and diagnostics (see the pool bookkeeping
	/// scenario in the specification).
	pub fn shard_byte_count(&self) -> usize {
		let idx = self.shard_index(&self.l1);
		self.l1[idx].bytes.load(Ordering::Acquire)
	}
}
