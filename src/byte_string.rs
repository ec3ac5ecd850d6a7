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

//! Immutable byte strings produced by [`Buffer::snapshot`](crate::buffer::Buffer::snapshot).
//!
//! A `ByteString` is a chain of shared (copy-on-write) segments captured at a
//! point in time; it never observes later writes to the buffer it came from.

use std::collections::VecDeque;
use std::fmt;
use crate::segment::Segment;

/// An immutable view of bytes shared with the buffer that produced it.
pub struct ByteString {
	segments: VecDeque<Segment>,
	len: usize,
}

impl ByteString {
	pub(crate) fn from_segments(segments: VecDeque<Segment>, len: usize) -> Self {
		Self { segments, len }
	}

	/// The number of bytes held.
	pub fn len(&self) -> usize { self.len }

	/// `true` if no bytes are held.
	pub fn is_empty(&self) -> bool { self.len == 0 }

	/// Copies the bytes out into an owned `Vec`.
	pub fn to_vec(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.len);
		for seg in &self.segments {
			out.extend_from_slice(seg.data());
		}
		out
	}

	/// Lowercase hex encoding of the whole byte string.
	pub fn to_hex(&self) -> String {
		let bytes = self.to_vec();
		base16ct::lower::encode_string(&bytes)
	}
}

impl PartialEq for ByteString {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len && self.to_vec() == other.to_vec()
	}
}

impl Eq for ByteString {}

impl fmt::Debug for ByteString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ByteString(len={} hex={})", self.len, self.to_hex())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::buffer::Buffer;

	#[test]
	fn snapshot_captures_current_bytes_only() {
		let mut buf = Buffer::new();
		buf.writable_segment(5).push_slice(b"hello");
		buf.account_write(5);

		let snap = buf.snapshot();
		assert_eq!(snap.to_vec(), b"hello");

		buf.writable_segment(6).push_slice(b" world");
		buf.account_write(6);

		assert_eq!(snap.to_vec(), b"hello");
	}
}
