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

//! Layers a [`Buffer`] in front of a raw sink, batching small writes into
//! whole-segment flushes downstream.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::raw::{Closeable, RawSink, RawSource};

/// A buffered view over a downstream [`RawSink`]. Typed writes accumulate in
/// the internal buffer; [`BufferedSink::emit_complete_segments`] pushes only
/// whole segments downstream, [`BufferedSink::emit`] pushes everything.
pub struct BufferedSink<W> {
	pub(crate) sink: W,
	pub(crate) buffer: Buffer,
	closed: bool,
}

impl<W: RawSink> BufferedSink<W> {
	/// Wraps `sink`, drawing the internal buffer's segments from the
	/// process-wide shared pool.
	pub fn new(sink: W) -> Self {
		Self { sink, buffer: Buffer::new(), closed: false }
	}

	fn check_open(&self) -> Result<()> {
		if self.closed {
			Err(Error::closed())
		} else {
			Ok(())
		}
	}

	/// Consumes `byte_count` bytes from `source`'s head into the internal
	/// buffer, then pushes whole segments downstream.
	pub fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<()> {
		self.check_open()?;
		self.buffer.write_from(source, byte_count)?;
		self.emit_complete_segments()
	}

	/// Pushes every currently-complete segment downstream, keeping only a
	/// partially-filled tail buffered.
	pub fn emit_complete_segments(&mut self) -> Result<()> {
		self.check_open()?;
		let n = self.buffer.complete_segment_byte_count();
		if n > 0 {
			self.sink.write(&mut self.buffer, n)?;
		}
		Ok(())
	}

	/// Pushes every buffered byte downstream, including a partial tail
	/// segment.
	pub fn emit(&mut self) -> Result<()> {
		self.check_open()?;
		let n = self.buffer.len();
		if n > 0 {
			self.sink.write(&mut self.buffer, n)?;
		}
		Ok(())
	}

	/// Emits everything buffered, then flushes downstream.
	pub fn flush(&mut self) -> Result<()> {
		self.check_open()?;
		self.emit()?;
		self.sink.flush()
	}

	/// Reads everything from `source` into the internal buffer, returning the
	/// total bytes moved.
	pub fn transfer_from(&mut self, source: &mut impl RawSource) -> Result<usize> {
		self.check_open()?;
		let mut total = 0;
		loop {
			match source.read_at_most_to(&mut self.buffer, crate::segment::SIZE)? {
				None => break,
				Some(n) => total += n,
			}
		}
		Ok(total)
	}

	/// Emits everything buffered and closes the downstream sink. Idempotent;
	/// the close is attempted even if emitting fails, and the first error
	/// encountered (from either step) is the one returned.
	pub fn close(&mut self) -> Result<()>
	where
		W: Closeable,
	{
		if self.closed {
			return Ok(());
		}
		self.closed = true;

		let emit_result = self.emit();
		let close_result = self.sink.close();
		emit_result.and(close_result)
	}
}

macro_rules! gen_typed_writes {
	($($write:ident($($arg:ident: $ty:ty),+));+ $(;)?) => {
		impl<W: RawSink> BufferedSink<W> {
			$(
			#[doc = concat!("Buffers a call to [`Buffer::", stringify!($write), "`](crate::buffer::Buffer::", stringify!($write), "), then pushes whole segments downstream.")]
			pub fn $write(&mut self, $($arg: $ty),+) -> Result<()> {
				self.check_open()?;
				self.buffer.$write($($arg),+);
				self.emit_complete_segments()
			}
			)+
		}
	};
}

gen_typed_writes! {
	write_u8(value: u8);
	write_i8(value: i8);
	write_u16(value: u16);
	write_u16_le(value: u16);
	write_i16(value: i16);
	write_i16_le(value: i16);
	write_u32(value: u32);
	write_u32_le(value: u32);
	write_i32(value: i32);
	write_i32_le(value: i32);
	write_u64(value: u64);
	write_u64_le(value: u64);
	write_i64(value: i64);
	write_i64_le(value: i64);
	write_f32(value: f32);
	write_f32_le(value: f32);
	write_f64(value: f64);
	write_f64_le(value: f64);
	write_decimal_long(value: i64);
	write_hex_unsigned_long(value: u64);
	write_slice(src: &[u8]);
}

impl<W: RawSink> BufferedSink<W> {
	/// Buffers the full UTF-8 encoding of `s`, then pushes whole segments
	/// downstream.
	pub fn write_string(&mut self, s: &str) -> Result<()> {
		self.check_open()?;
		self.buffer.write_string(s);
		self.emit_complete_segments()
	}

	/// Buffers a single encoded Unicode code point, then pushes whole
	/// segments downstream.
	pub fn write_code_point(&mut self, code_point: u32) -> Result<()> {
		self.check_open()?;
		self.buffer.write_code_point(code_point)?;
		self.emit_complete_segments()
	}
}
