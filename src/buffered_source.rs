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

//! Layers a [`Buffer`] in front of a raw source, pulling upstream only when
//! the internal buffer cannot satisfy a request.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::peek::PeekSource;
use crate::raw::{Closeable, RawSink, RawSource};

/// A buffered view over an upstream [`RawSource`], providing every typed
/// decoder plus the pull-on-demand primitives (`request`/`require`).
pub struct BufferedSource<S> {
	pub(crate) source: S,
	pub(crate) buffer: Buffer,
	closed: bool,
}

impl<S: RawSource> BufferedSource<S> {
	/// Wraps `source`, drawing the internal buffer's segments from the
	/// process-wide shared pool.
	pub fn new(source: S) -> Self {
		Self { source, buffer: Buffer::new(), closed: false }
	}

	fn check_open(&self) -> Result<()> {
		if self.closed {
			Err(Error::closed())
		} else {
			Ok(())
		}
	}

	/// Pulls from upstream, one segment per call, until the internal buffer
	/// holds at least `byte_count` bytes or upstream is exhausted. Returns
	/// whether the condition was met.
	pub fn request(&mut self, byte_count: usize) -> Result<bool> {
		self.check_open()?;
		while self.buffer.len() < byte_count {
			let pulled = self.source.read_at_most_to(&mut self.buffer, crate::segment::SIZE)?;
			if pulled.is_none() {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// As [`BufferedSource::request`], but fails with end-of-stream instead
	/// of returning `false`.
	pub fn require(&mut self, byte_count: usize) -> Result<()> {
		if self.request(byte_count)? {
			Ok(())
		} else {
			Err(Error::eos())
		}
	}

	/// Reads up to `byte_count` bytes into `sink`. If the internal buffer is
	/// empty, pulls exactly one segment from upstream first. Returns `None`
	/// on upstream end-of-input with nothing buffered.
	pub fn read_at_most_to(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>> {
		self.check_open()?;
		if byte_count == 0 {
			return Ok(Some(0));
		}

		if self.buffer.is_empty() {
			let pulled = self.source.read_at_most_to(&mut self.buffer, crate::segment::SIZE)?;
			if pulled.is_none() {
				return Ok(None);
			}
		}

		let n = byte_count.min(self.buffer.len());
		sink.write_from(&mut self.buffer, n)?;
		Ok(Some(n))
	}

	/// Writes the internal buffer to `sink`, then repeatedly pulls one
	/// segment from upstream and writes it too, until upstream is
	/// exhausted. Returns the total bytes written.
	pub fn transfer_to(&mut self, sink: &mut impl RawSink) -> Result<usize> {
		self.check_open()?;
		let mut total = self.buffer.len();
		sink.write(&mut self.buffer, total)?;

		loop {
			match self.source.read_at_most_to(&mut self.buffer, crate::segment::SIZE)? {
				None => break,
				Some(_) => {
					let n = self.buffer.len();
					sink.write(&mut self.buffer, n)?;
					total += n;
				}
			}
		}

		Ok(total)
	}

	/// Discards `byte_count` bytes: first from the internal buffer, then by
	/// reading and discarding segment-sized chunks from upstream. Fails with
	/// end-of-stream if upstream runs out first.
	pub fn skip(&mut self, mut byte_count: usize) -> Result<()> {
		self.check_open()?;
		let from_buffer = byte_count.min(self.buffer.len());
		self.buffer.skip(from_buffer)?;
		byte_count -= from_buffer;

		while byte_count > 0 {
			let pulled = self.source.read_at_most_to(&mut self.buffer, crate::segment::SIZE)?;
			if pulled.is_none() {
				return Err(Error::eos());
			}
			let n = byte_count.min(self.buffer.len());
			self.buffer.skip(n)?;
			byte_count -= n;
		}

		Ok(())
	}

	/// Returns a non-consuming view over this source's upcoming bytes.
	/// Borrows `self` exclusively for the peek's lifetime, so the upstream
	/// cannot be touched while a peek is alive — see [`PeekSource`].
	pub fn peek(&mut self) -> PeekSource<'_, S> {
		PeekSource::new(self)
	}

	/// Attempts to match the longest of `options` at the head of this
	/// source, consuming the match and returning its index, or consuming
	/// nothing and returning `None`.
	pub fn select(&mut self, options: &Options) -> Result<Option<usize>> {
		options.select(self)
	}

	/// Closes the adapter: idempotent, closes upstream exactly once.
	/// Subsequent typed operations fail with *illegal-state*.
	pub fn close(&mut self) -> Result<()>
	where
		S: Closeable,
	{
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.source.close()
	}
}

macro_rules! gen_typed_reads {
	($($read:ident -> $ty:ty, $n:literal);+ $(;)?) => {
		impl<S: RawSource> BufferedSource<S> {
			$(
			#[doc = concat!("Requires `", stringify!($n), "` bytes, then decodes a `", stringify!($ty), "`.")]
			pub fn $read(&mut self) -> Result<$ty> {
				self.require($n)?;
				self.buffer.$read()
			}
			)+
		}
	};
}

gen_typed_reads! {
	read_u8 -> u8, 1;
	read_i8 -> i8, 1;
	read_u16 -> u16, 2;
	read_u16_le -> u16, 2;
	read_i16 -> i16, 2;
	read_i16_le -> i16, 2;
	read_u32 -> u32, 4;
	read_u32_le -> u32, 4;
	read_i32 -> i32, 4;
	read_i32_le -> i32, 4;
	read_u64 -> u64, 8;
	read_u64_le -> u64, 8;
	read_i64 -> i64, 8;
	read_i64_le -> i64, 8;
	read_f32 -> f32, 4;
	read_f32_le -> f32, 4;
	read_f64 -> f64, 8;
	read_f64_le -> f64, 8;
}

impl<S: RawSource> BufferedSource<S> {
	/// UTF-8 decodes exactly `byte_count` bytes, pulling upstream as needed.
	pub fn read_string(&mut self, byte_count: usize) -> Result<String> {
		self.require(byte_count)?;
		self.buffer.read_string(byte_count)
	}

	/// Reads exactly `dst.len()` bytes, pulling upstream as needed.
	pub fn read_into_slice_exact(&mut self, dst: &mut [u8]) -> Result<()> {
		self.require(dst.len())?;
		self.buffer.read_into_slice_exact(dst)
	}

	/// Reads a line terminated by `\n`, pulling upstream until a terminator
	/// is found or upstream is exhausted.
	pub fn read_utf8_line(&mut self) -> Result<Option<String>> {
		loop {
			if self.buffer.index_of(b'\n', 0, self.buffer.len()).is_some() {
				return self.buffer.read_utf8_line();
			}
			if !self.request(self.buffer.len() + 1)? {
				return self.buffer.read_utf8_line();
			}
		}
	}

	/// As [`BufferedSource::read_utf8_line`], but fails with end-of-stream
	/// if no terminator appears within `limit` bytes of upstream.
	pub fn read_utf8_line_strict(&mut self, limit: Option<usize>) -> Result<String> {
		loop {
			let scanned = self.buffer.len();
			if self.buffer.index_of(b'\n', 0, scanned).is_some() {
				return self.buffer.read_utf8_line_strict(limit);
			}
			if let Some(l) = limit {
				if scanned >= l {
					return Err(Error::eos());
				}
			}
			if !self.request(scanned + 1)? {
				return Err(Error::eos());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::raw::IoSource;

	#[test]
	fn request_pulls_until_satisfied() {
		let mut source = BufferedSource::new(IoSource::new(&b"hello world"[..]));
		assert!(source.request(11).unwrap());
		assert_eq!(source.read_string(11).unwrap(), "hello world");
	}

	#[test]
	fn require_fails_on_early_eof() {
		let mut source = BufferedSource::new(IoSource::new(&b"hi"[..]));
		assert!(source.require(10).is_err());
	}

	#[test]
	fn skip_drains_buffer_then_upstream() {
		let mut source = BufferedSource::new(IoSource::new(&b"abcdefghij"[..]));
		source.request(3).unwrap();
		source.skip(5).unwrap();
		assert_eq!(source.read_string(5).unwrap(), "fghij");
	}

	#[test]
	fn line_reading_across_upstream_pulls() {
		let mut source = BufferedSource::new(IoSource::new(&b"first line\nsecond line\n"[..]));
		assert_eq!(source.read_utf8_line().unwrap().as_deref(), Some("first line"));
		assert_eq!(source.read_utf8_line().unwrap().as_deref(), Some("second line"));
	}

	#[test]
	fn strict_line_reading_fails_without_terminator() {
		let mut source = BufferedSource::new(IoSource::new(&b"no newline here"[..]));
		assert!(source.read_utf8_line_strict(None).is_err());
	}

	#[test]
	fn zero_byte_read_never_pulls_upstream() {
		struct PanicsOnRead;
		impl std::io::Read for PanicsOnRead {
			fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
				panic!("upstream must not be consulted for a zero-byte read")
			}
		}

		let mut source = BufferedSource::new(IoSource::new(PanicsOnRead));
		let mut sink = Buffer::new();
		assert_eq!(source.read_at_most_to(&mut sink, 0).unwrap(), Some(0));
	}
}
