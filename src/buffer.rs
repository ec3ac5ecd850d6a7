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

//! The segmented, pooled buffer at the center of the crate: an ordered list
//! of [`Segment`]s that is simultaneously a source and a sink of bytes.
//!
//! Typed numeric and string primitives live in [`read`](self::read) and
//! [`write`](self::write); this module holds the segment bookkeeping they sit
//! on top of.

pub mod read;
pub mod write;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use crate::byte_string::ByteString;
use crate::error::{Error, Result};
use crate::pool::Pool;
use crate::segment::Segment;

/// The central data structure: an ordered, doubly-linked-in-spirit list of
/// segments, realized here as a `VecDeque` with a cached byte count. Acts as
/// both a [`RawSource`](crate::raw::RawSource) and a
/// [`RawSink`](crate::raw::RawSink).
///
/// A buffer is not safe for concurrent use; see the crate's concurrency
/// notes. It may, however, be moved to another thread between uses.
pub struct Buffer {
	pub(crate) pool: Arc<Pool>,
	pub(crate) segments: VecDeque<Segment>,
	size: usize,
}

impl Buffer {
	/// Creates an empty buffer drawing segments from the process-wide shared
	/// pool.
	pub fn new() -> Self {
		Self::with_pool(Pool::shared())
	}

	/// Creates an empty buffer drawing segments from `pool` instead of the
	/// process-wide default. Mainly useful in tests that want isolated pool
	/// bookkeeping.
	pub fn with_pool(pool: Arc<Pool>) -> Self {
		Self { pool, segments: VecDeque::new(), size: 0 }
	}

	/// The number of readable bytes currently buffered.
	pub fn len(&self) -> usize { self.size }

	/// `true` if no bytes are buffered.
	pub fn is_empty(&self) -> bool { self.size == 0 }

	/// Alias for [`Buffer::is_empty`], matching the adapters' vocabulary.
	pub fn exhausted(&self) -> bool { self.is_empty() }

	/// `size` minus the tail segment's partial bytes: the number of bytes
	/// that can be moved to another buffer by segment-move alone.
	pub fn complete_segment_byte_count(&self) -> usize {
		match self.segments.back() {
			Some(tail) if !tail.is_empty() => self.size - tail.len(),
			_ => self.size,
		}
	}

	/// Recycles every segment, leaving the buffer empty.
	pub fn clear(&mut self) {
		for seg in self.segments.drain(..) {
			self.pool.recycle(seg);
		}
		self.size = 0;
	}

	/// A non-consuming, zero-copy snapshot of the buffer's current content as
	/// a fresh `Buffer`. Writing to either buffer afterward never disturbs
	/// the other's readable bytes (further appends allocate fresh segments;
	/// see [`Buffer::writable_segment`]).
	pub fn peek(&mut self) -> Buffer {
		let mut copy = Buffer::with_pool(Arc::clone(&self.pool));
		let len = self.size;
		if len > 0 {
			copy.segments = self.share_range(0, len);
			copy.size = len;
		}
		copy
	}

	/// An immutable byte-string snapshot of the whole buffer, built from a
	/// shared-segment copy.
	pub fn snapshot(&mut self) -> ByteString {
		self.snapshot_len(self.size)
	}

	/// An immutable byte-string snapshot of the first `byte_count` bytes.
	pub fn snapshot_len(&mut self, byte_count: usize) -> ByteString {
		assert!(byte_count <= self.size, "snapshot length out of range");
		ByteString::from_segments(self.share_range(0, byte_count), byte_count)
	}

	/// Scans for `byte` in `[from, to)`, segment by segment, returning its
	/// index or `None` if absent. Does not consume any bytes.
	pub fn index_of(&self, byte: u8, from: usize, to: usize) -> Option<usize> {
		let to = to.min(self.size);
		if from >= to {
			return None;
		}

		let mut offset = 0;
		for seg in &self.segments {
			let seg_len = seg.len();
			let seg_start = offset;
			let seg_end = offset + seg_len;
			offset = seg_end;

			if seg_end <= from || seg_start >= to {
				continue;
			}

			let lo = from.saturating_sub(seg_start);
			let hi = (to - seg_start).min(seg_len);
			if let Some(i) = seg.data()[lo..hi].iter().position(|&b| b == byte) {
				return Some(seg_start + lo + i);
			}
		}

		None
	}

	/// Non-consuming copy of `[start_index, end_index)` into `target`'s tail
	/// as shared-segment views. `target` must not be `self`.
	pub fn copy_to(&mut self, target: &mut Buffer, start_index: usize, end_index: usize) -> Result<()> {
		if std::ptr::eq(self, target) {
			return Err(Error::invalid_argument("cannot copy a buffer into itself"));
		}
		assert!(end_index <= self.size && start_index <= end_index, "copy range out of bounds");

		let len = end_index - start_index;
		if len == 0 {
			return Ok(());
		}

		let shared = self.share_range(start_index, end_index);
		target.size += len;
		target.segments.extend(shared);
		Ok(())
	}

	/// Returns shared-segment views covering `[start, end)`, marking the
	/// overlapping source segments shared as a side effect. Does not change
	/// `self.size` or remove any segment from `self.segments`.
	fn share_range(&mut self, start: usize, end: usize) -> VecDeque<Segment> {
		let mut out = VecDeque::new();
		if start >= end {
			return out;
		}

		let mut offset = 0;
		for seg in self.segments.make_contiguous().iter_mut() {
			let seg_len = seg.len();
			let seg_start = offset;
			let seg_end = offset + seg_len;
			offset = seg_end;

			if seg_end <= start || seg_start >= end {
				continue;
			}

			let lo = start.saturating_sub(seg_start);
			let hi = (end - seg_start).min(seg_len);

			let mut view = seg.share_all();
			// `share_all` aliases the whole readable window; narrow both ends.
			view.consume(lo);
			if hi - lo < view.len() {
				view = view.split(hi - lo);
			}
			out.push_back(view);
		}

		out
	}

	/// Moves all bytes from `source` into `self`. Whole segments are moved by
	/// ownership transfer (O(1)); a boundary segment never arises since the
	/// whole source is consumed. Fails if `source` is `self`.
	pub fn transfer_from(&mut self, source: &mut Buffer) -> Result<usize> {
		if std::ptr::eq(self, source) {
			return Err(Error::invalid_argument("cannot transfer a buffer into itself"));
		}

		let moved = source.size;
		self.size += moved;
		self.segments.append(&mut source.segments);
		source.size = 0;
		Ok(moved)
	}

	/// Moves a `byte_count`-byte prefix from `source` into `self`. Fails with
	/// end-of-stream if `source` is exhausted first; whatever was moved
	/// before the failure stays moved. Fails if `source` is `self`.
	pub fn write_from(&mut self, source: &mut Buffer, byte_count: usize) -> Result<()> {
		if std::ptr::eq(self, source) {
			return Err(Error::invalid_argument("cannot transfer a buffer into itself"));
		}

		let mut remaining = byte_count;
		while remaining > 0 {
			let Some(mut head) = source.segments.pop_front() else {
				return Err(Error::eos());
			};
			source.size -= head.len();

			if head.len() <= remaining {
				remaining -= head.len();
				self.push_tail_segment(head);
			} else {
				let prefix = head.split(remaining);
				source.size += head.len();
				source.segments.push_front(head);
				remaining = 0;
				self.push_tail_segment(prefix);
			}
		}

		source.tidy();
		Ok(())
	}

	/// Appends an already-built segment to the tail without attempting to
	/// merge it into the existing tail. Used by the segment-move transfers.
	fn push_tail_segment(&mut self, seg: Segment) {
		self.size += seg.len();
		self.segments.push_back(seg);
	}

	/// Returns a mutable reference to a tail segment with at least
	/// `min_capacity` remaining, appending a fresh one from the pool if the
	/// current tail has no room, is shared, or doesn't exist.
	pub(crate) fn writable_segment(&mut self, min_capacity: usize) -> &mut Segment {
		let needs_fresh = match self.segments.back() {
			Some(tail) => tail.is_shared() || tail.remaining() < min_capacity,
			None => true,
		};

		if needs_fresh {
			self.segments.push_back(self.pool.take());
		}

		self.segments.back_mut().expect("just pushed a segment")
	}

	/// Call after any write that used [`Buffer::writable_segment`]; `n` is
	/// the number of bytes actually appended.
	pub(crate) fn account_write(&mut self, n: usize) {
		self.size += n;
	}

	/// Call after any read that consumed `n` bytes from the head; recycles
	/// emptied segments and compacts a lightly-filled new head into its
	/// predecessor.
	pub(crate) fn account_read(&mut self, n: usize) {
		self.size -= n;
		self.tidy();
	}

	fn tidy(&mut self) {
		while matches!(self.segments.front(), Some(s) if s.is_empty()) {
			let seg = self.segments.pop_front().unwrap();
			self.pool.recycle(seg);
		}
		self.compact_head();
	}

	/// Merges the second segment into the head when both are under half
	/// full, keeping the chain short after partial reads.
	fn compact_head(&mut self) {
		if self.segments.len() < 2 {
			return;
		}

		let merged = {
			let slice = self.segments.make_contiguous();
			let (first, rest) = slice.split_at_mut(1);
			rest[0].compact_into(&mut first[0])
		};

		if merged {
			let seg = self.segments.remove(1).expect("checked len >= 2 above");
			self.pool.recycle(seg);
		}
	}

	/// The head segment, if any. Used by the typed read helpers.
	pub(crate) fn head_mut(&mut self) -> Option<&mut Segment> {
		self.segments.front_mut()
	}

	/// Fails with end-of-stream unless at least `n` bytes are buffered.
	pub(crate) fn require(&self, n: usize) -> Result<()> {
		if self.size < n {
			Err(Error::eos())
		} else {
			Ok(())
		}
	}

	/// The first unread byte, without consuming it. `None` only when empty
	/// (a non-empty buffer always has a non-empty head segment, per the
	/// no-empty-segments invariant).
	pub(crate) fn peek_byte(&self) -> Option<u8> {
		self.segments.front().map(|seg| seg.data()[0])
	}

	/// Discards `byte_count` bytes from the head, without returning them.
	pub fn skip(&mut self, byte_count: usize) -> Result<()> {
		self.require(byte_count)?;
		let mut remaining = byte_count;
		while remaining > 0 {
			let seg = self.segments.front_mut().expect("require guarantees data");
			let n = remaining.min(seg.len());
			seg.consume(n);
			self.account_read(n);
			remaining -= n;
		}
		Ok(())
	}
}

impl Default for Buffer {
	fn default() -> Self { Self::new() }
}

impl Drop for Buffer {
	fn drop(&mut self) {
		for seg in self.segments.drain(..) {
			self.pool.recycle(seg);
		}
	}
}

const HEX_DUMP_LIMIT: usize = 64;

impl fmt::Display for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.size == 0 {
			return write!(f, "Buffer(size=0)");
		}

		write!(f, "Buffer(size={} hex=", self.size)?;

		let mut written = 0;
		'segments: for seg in &self.segments {
			for &byte in seg.data() {
				if written == HEX_DUMP_LIMIT {
					f.write_str("\u{2026}")?;
					break 'segments;
				}
				write!(f, "{byte:02x}")?;
				written += 1;
			}
		}

		write!(f, ")")
	}
}

impl fmt::Debug for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pool::PoolConfig;

	fn test_buffer() -> Buffer {
		Buffer::with_pool(Arc::new(Pool::new(PoolConfig::default())))
	}

	#[test]
	fn empty_display_has_no_hex() {
		assert_eq!(test_buffer().to_string(), "Buffer(size=0)");
	}

	#[test]
	fn hex_dump_short_buffer() {
		let mut buf = test_buffer();
		let n = buf.writable_segment(16).push_slice(b"a\r\nb\nc\rd\\e");
		buf.account_write(n);
		assert_eq!(buf.to_string(), "Buffer(size=10 hex=610d0a620a630d645c65)");
	}

	#[test]
	fn hex_dump_truncates_after_64_bytes() {
		let mut buf = test_buffer();
		let zeros = vec![0u8; 66];
		let n = buf.writable_segment(66).push_slice(&zeros);
		buf.account_write(n);
		let text = buf.to_string();
		assert!(text.ends_with('\u{2026}'));
		assert_eq!(text.matches("00").count(), 64);
	}

	#[test]
	fn transfer_from_moves_whole_segments() {
		let mut src = test_buffer();
		let n = src.writable_segment(5).push_slice(b"hello");
		src.account_write(n);

		let mut dst = test_buffer();
		dst.transfer_from(&mut src).unwrap();

		assert!(src.is_empty());
		assert_eq!(dst.len(), 5);
	}

	#[test]
	fn copy_to_leaves_source_unchanged() {
		let mut src = test_buffer();
		let n = src.writable_segment(11).push_slice(b"hello world");
		src.account_write(n);

		let mut dst = test_buffer();
		src.copy_to(&mut dst, 0, 5).unwrap();

		assert_eq!(src.len(), 11);
		assert_eq!(dst.len(), 5);
	}

	#[test]
	fn index_of_finds_byte_across_segments() {
		let mut buf = test_buffer();
		let n = buf.writable_segment(5).push_slice(b"hello");
		buf.account_write(n);
		assert_eq!(buf.index_of(b'l', 0, 5), Some(2));
		assert_eq!(buf.index_of(b'z', 0, 5), None);
	}
}
