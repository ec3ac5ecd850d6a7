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

//! A non-consuming view over a [`BufferedSource`]'s upcoming bytes.
//!
//! The specification's invalidation rule ("fail if the upstream has
//! advanced past the snapshot") is enforced here by the borrow checker
//! instead of a runtime generation counter: a [`PeekSource`] holds an
//! exclusive `&mut` borrow of its upstream for its whole lifetime, so the
//! upstream simply cannot be read through any other handle while a peek is
//! alive — a compile-time guarantee strictly stronger than the runtime
//! check the specification describes. Reads go through
//! [`Buffer::copy_to`](crate::buffer::Buffer::copy_to), which never advances
//! the upstream buffer's own head, so once the peek is dropped the upstream
//! resumes exactly where it left off.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::buffered_source::BufferedSource;
use crate::raw::RawSource;

/// Returned by [`BufferedSource::peek`](crate::buffered_source::BufferedSource::peek).
pub struct PeekSource<'a, S> {
	upstream: &'a mut BufferedSource<S>,
	offset: usize,
}

impl<'a, S: RawSource> PeekSource<'a, S> {
	pub(crate) fn new(upstream: &'a mut BufferedSource<S>) -> Self {
		Self { upstream, offset: 0 }
	}

	/// Pulls upstream until at least `byte_count` bytes are available ahead
	/// of this peek's current position, or upstream is exhausted.
	pub fn request(&mut self, byte_count: usize) -> Result<bool> {
		self.upstream.request(self.offset + byte_count)
	}

	/// As [`PeekSource::request`], but fails with end-of-stream.
	pub fn require(&mut self, byte_count: usize) -> Result<()> {
		if self.request(byte_count)? {
			Ok(())
		} else {
			Err(Error::eos())
		}
	}

	fn snapshot_range(&mut self, byte_count: usize) -> Result<Buffer> {
		self.require(byte_count)?;
		let mut tmp = Buffer::new();
		self.upstream
			.buffer
			.copy_to(&mut tmp, self.offset, self.offset + byte_count)?;
		self.offset += byte_count;
		Ok(tmp)
	}

	/// Reads up to `byte_count` bytes into `sink`, advancing this peek's
	/// position but never the upstream's.
	pub fn read_at_most_to(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>> {
		if byte_count == 0 {
			return Ok(Some(0));
		}

		self.request(1)?;
		let available = self.upstream.buffer.len().saturating_sub(self.offset);
		if available == 0 {
			return Ok(None);
		}

		let n = byte_count.min(available);
		let mut tmp = self.snapshot_range(n)?;
		sink.transfer_from(&mut tmp)?;
		Ok(Some(n))
	}

	/// Reads a single byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		let mut tmp = self.snapshot_range(1)?;
		tmp.read_u8()
	}

	/// UTF-8 decodes exactly `byte_count` bytes.
	pub fn read_string(&mut self, byte_count: usize) -> Result<String> {
		let mut tmp = self.snapshot_range(byte_count)?;
		tmp.read_string(byte_count)
	}
}

#[cfg(test)]
mod tests {
	use crate::buffered_source::BufferedSource;
	use crate::raw::IoSource;

	#[test]
	fn peek_never_advances_upstream() {
		let mut source = BufferedSource::new(IoSource::new(&b"abcdefghi"[..]));
		assert_eq!(source.read_string(3).unwrap(), "abc");

		{
			let mut peek = source.peek();
			assert_eq!(peek.read_string(3).unwrap(), "def");
			assert_eq!(peek.read_string(3).unwrap(), "ghi");
			assert!(!peek.request(1).unwrap());
		}

		assert_eq!(source.read_string(3).unwrap(), "def");
	}

	#[test]
	fn independent_peeks_start_from_the_same_position() {
		let mut source = BufferedSource::new(IoSource::new(&b"hello"[..]));
		{
			let mut peek = source.peek();
			assert_eq!(peek.read_string(5).unwrap(), "hello");
		}
		{
			let mut peek = source.peek();
			assert_eq!(peek.read_string(5).unwrap(), "hello");
		}
		assert_eq!(source.read_string(5).unwrap(), "hello");
	}
}
