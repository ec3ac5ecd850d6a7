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

//! The one-method interfaces at the I/O boundary, plus the minimal
//! `Processor`/`Transform` abstractions external collaborators (CRC, hash,
//! compressors) build on.
//!
//! `std`'s own `Read`/`Write` are deliberately not reused as the boundary
//! trait: a raw source fills a [`Buffer`] directly, skipping the
//! byte-slice round trip `Read` requires. [`IoSource`]/[`IoSink`] bridge the
//! two worlds for callers who only have a `std::io` type to offer.

use std::io::{Read, Write};
use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Closes a raw collaborator. Kept separate from [`RawSource`]/[`RawSink`]
/// (which stay exactly the one/two-method contracts they're specified as)
/// since not every raw collaborator needs closing — but the buffered
/// adapters do need an idempotent close hook to satisfy their own
/// resource-lifecycle contract, so they require it as a second bound.
pub trait Closeable {
	fn close(&mut self) -> Result<()>;
}

/// A single-method source of bytes: fills a sink buffer with *up to*
/// `byte_count` bytes, or reports end-of-input.
///
/// `byte_count == 0` must be a no-op — the source must not be consulted at
/// all (`Ok(Some(0))` without touching the underlying collaborator).
pub trait RawSource {
	/// Reads up to `byte_count` bytes into `sink`. Returns `Ok(None)` on
	/// end-of-input with nothing read, or `Ok(Some(n))` with `n` the number
	/// of bytes appended to `sink` (`n == 0` only when `byte_count == 0`).
	fn read_at_most_to(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>>;
}

/// A single-method sink of bytes.
pub trait RawSink {
	/// Consumes exactly `byte_count` bytes from the head of `source`.
	fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<()>;
	/// Forces any internal buffering downstream.
	fn flush(&mut self) -> Result<()>;
}

impl RawSource for Buffer {
	fn read_at_most_to(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>> {
		if byte_count == 0 {
			return Ok(Some(0));
		}
		if self.is_empty() {
			return Ok(None);
		}

		let n = byte_count.min(self.len());
		sink.write_from(self, n)?;
		Ok(Some(n))
	}
}

impl RawSink for Buffer {
	fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<()> {
		self.write_from(source, byte_count)
	}

	fn flush(&mut self) -> Result<()> { Ok(()) }
}

impl Closeable for Buffer {
	fn close(&mut self) -> Result<()> {
		self.clear();
		Ok(())
	}
}

/// Observes bytes flowing through a buffer without consuming them — the
/// shape shared by CRCs and hashes. `compute` finalizes and resets; `current`
/// inspects the running state without resetting.
pub trait Processor<T> {
	/// Folds `byte_count` bytes starting at the head of `source` into the
	/// running state, without advancing `source`.
	fn process(&mut self, source: &Buffer, byte_count: usize);
	/// Finalizes the running computation, returns it, and resets to the
	/// initial state.
	fn compute(&mut self) -> T;
	/// The running computation's current value, without resetting.
	fn current(&self) -> T;
}

/// Rewrites bytes flowing from `source` to `sink` — the shape shared by
/// compressors and ciphers. Unlike [`Processor`], a `Transform` consumes its
/// input and may produce a different number of output bytes.
pub trait Transform {
	/// Consumes some prefix of `source`, writing transformed bytes to `sink`.
	fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()>;
	/// Flushes any bytes held back for look-ahead (e.g. block padding) to
	/// `sink`. Idempotent once [`Transform::is_finished`] is `true`.
	fn finish(&mut self, sink: &mut Buffer) -> Result<()>;
	/// Whether [`Transform::finish`] has already run to completion.
	fn is_finished(&self) -> bool;
}

/// Adapts a `std::io::Read` into a [`RawSource`].
pub struct IoSource<R>(R);

impl<R: Read> IoSource<R> {
	pub fn new(inner: R) -> Self { Self(inner) }

	pub fn into_inner(self) -> R { self.0 }
}

impl<R> Closeable for IoSource<R> {
	fn close(&mut self) -> Result<()> { Ok(()) }
}

impl<R: Read> RawSource for IoSource<R> {
	fn read_at_most_to(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>> {
		if byte_count == 0 {
			return Ok(Some(0));
		}

		let seg = sink.writable_segment(1);
		let cap = seg.remaining().min(byte_count);
		let mut tmp = vec![0u8; cap];
		let n = self.0.read(&mut tmp).map_err(Error::from)?;
		if n == 0 {
			return Ok(None);
		}

		let written = seg.push_slice(&tmp[..n]);
		sink.account_write(written);
		Ok(Some(written))
	}
}

/// Adapts a `std::io::Write` into a [`RawSink`].
pub struct IoSink<W>(W);

impl<W: Write> IoSink<W> {
	pub fn new(inner: W) -> Self { Self(inner) }

	pub fn into_inner(self) -> W { self.0 }
}

impl<W> Closeable for IoSink<W> {
	fn close(&mut self) -> Result<()> { Ok(()) }
}

impl<W: Write> RawSink for IoSink<W> {
	fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<()> {
		let mut remaining = byte_count;
		while remaining > 0 {
			let seg = source.head_mut().ok_or_else(Error::eos)?;
			let n = remaining.min(seg.len());
			self.0.write_all(&seg.data()[..n]).map_err(Error::from)?;
			seg.consume(n);
			source.account_read(n);
			remaining -= n;
		}
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		self.0.flush().map_err(Error::from)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn io_source_fills_sink_from_reader() {
		let mut source = IoSource::new(&b"hello"[..]);
		let mut sink = Buffer::new();
		let n = source.read_at_most_to(&mut sink, 5).unwrap();
		assert_eq!(n, Some(5));
		assert_eq!(sink.len(), 5);
	}

	#[test]
	fn io_source_reports_eof() {
		let mut source = IoSource::new(&b""[..]);
		let mut sink = Buffer::new();
		assert_eq!(source.read_at_most_to(&mut sink, 4).unwrap(), None);
	}

	#[test]
	fn io_sink_writes_exact_byte_count() {
		let mut buf = Buffer::new();
		let n = buf.writable_segment(5).push_slice(b"hello");
		buf.account_write(n);

		let mut out = Vec::new();
		{
			let mut sink = IoSink::new(&mut out);
			sink.write(&mut buf, 5).unwrap();
		}
		assert_eq!(out, b"hello");
		assert!(buf.is_empty());
	}

	#[test]
	fn zero_byte_read_never_touches_source() {
		struct PanicsOnRead;
		impl Read for PanicsOnRead {
			fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
				panic!("source must not be consulted for a zero-byte read")
			}
		}

		let mut source = IoSource::new(PanicsOnRead);
		let mut sink = Buffer::new();
		assert_eq!(source.read_at_most_to(&mut sink, 0).unwrap(), Some(0));
	}
}
