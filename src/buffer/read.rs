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

//! Typed read primitives: integers (big/little-endian, signed/unsigned),
//! floats, decimal/hex text numbers, UTF-8 strings, and raw byte blocks.
//!
//! A read that straddles a segment boundary falls back to a byte-at-a-time
//! loop; one that fits entirely within the head segment takes a fast path
//! reading straight out of its contiguous storage.

use super::Buffer;
use crate::error::{Error, Result};

impl Buffer {
	/// Reads exactly `N` bytes into an array, big-endian order preserved as
	/// written. Fast path when the head segment already holds all `N` bytes;
	/// otherwise falls back to one byte at a time across segments.
	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		self.require(N)?;

		let fits_in_head = matches!(self.segments.front(), Some(seg) if seg.len() >= N);
		if fits_in_head {
			let seg = self.segments.front_mut().expect("checked above");
			let mut out = [0u8; N];
			out.copy_from_slice(&seg.data()[..N]);
			seg.consume(N);
			self.account_read(N);
			return Ok(out);
		}

		let mut out = [0u8; N];
		for slot in &mut out {
			*slot = self.read_u8()?;
		}
		Ok(out)
	}

	/// Reads a single byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		self.require(1)?;
		let seg = self.segments.front_mut().expect("require guarantees a head segment");
		let byte = seg.pop().expect("require guarantees a readable byte");
		self.account_read(1);
		Ok(byte)
	}

	/// Reads a single signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		self.read_u8().map(|b| b as i8)
	}
}

macro_rules! gen_int_reads {
	($($read_u:ident, $read_u_le:ident, $uty:ty, $read_s:ident, $read_s_le:ident, $sty:ty, $n:literal);+ $(;)?) => {
		impl Buffer {
			$(
			#[doc = concat!("Reads a big-endian `", stringify!($uty), "`.")]
			pub fn $read_u(&mut self) -> Result<$uty> {
				Ok(<$uty>::from_be_bytes(self.read_array::<$n>()?))
			}

			#[doc = concat!("Reads a little-endian `", stringify!($uty), "`.")]
			pub fn $read_u_le(&mut self) -> Result<$uty> {
				Ok(<$uty>::from_le_bytes(self.read_array::<$n>()?))
			}

			#[doc = concat!("Reads a big-endian `", stringify!($sty), "`.")]
			pub fn $read_s(&mut self) -> Result<$sty> {
				self.$read_u().map(|n| n as $sty)
			}

			#[doc = concat!("Reads a little-endian `", stringify!($sty), "`.")]
			pub fn $read_s_le(&mut self) -> Result<$sty> {
				self.$read_u_le().map(|n| n as $sty)
			}
			)+
		}
	};
}

gen_int_reads! {
	read_u16, read_u16_le, u16, read_i16, read_i16_le, i16, 2;
	read_u32, read_u32_le, u32, read_i32, read_i32_le, i32, 4;
	read_u64, read_u64_le, u64, read_i64, read_i64_le, i64, 8;
}

impl Buffer {
	/// Reads a big-endian IEEE-754 single-precision float.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_be_bytes(self.read_array()?))
	}

	/// Reads a little-endian IEEE-754 single-precision float.
	pub fn read_f32_le(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Reads a big-endian IEEE-754 double-precision float.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_be_bytes(self.read_array()?))
	}

	/// Reads a little-endian IEEE-754 double-precision float.
	pub fn read_f64_le(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Reads an ASCII decimal integer: an optional leading `-`, then at
	/// least one digit, accumulated with overflow/underflow detection.
	pub fn read_decimal_long(&mut self) -> Result<i64> {
		let negative = matches!(self.peek_byte(), Some(b'-'));
		if negative {
			self.read_u8()?;
		}

		let mut value: i64 = 0;
		let mut digits = 0u32;
		while let Some(b) = self.peek_byte() {
			if !b.is_ascii_digit() {
				break;
			}
			self.read_u8()?;
			let digit = (b - b'0') as i64;
			value = value
				.checked_mul(10)
				.and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) })
				.ok_or_else(|| Error::number_format("decimal long out of range"))?;
			digits += 1;
		}

		if digits == 0 {
			return Err(Error::number_format("expected at least one decimal digit"));
		}

		Ok(value)
	}

	/// Reads an unsigned hexadecimal integer: at least one case-insensitive
	/// hex digit; more than 16 significant digits (after leading zeros) is
	/// an error.
	pub fn read_hex_unsigned_long(&mut self) -> Result<u64> {
		let mut value: u64 = 0;
		let mut significant_digits = 0u32;
		let mut total_digits = 0u32;

		while let Some(b) = self.peek_byte() {
			let digit = match b {
				b'0'..=b'9' => b - b'0',
				b'a'..=b'f' => b - b'a' + 10,
				b'A'..=b'F' => b - b'A' + 10,
				_ => break,
			};
			self.read_u8()?;
			total_digits += 1;

			if value != 0 || digit != 0 {
				significant_digits += 1;
				if significant_digits > 16 {
					return Err(Error::number_format("hexadecimal value too large"));
				}
				value = (value << 4) | digit as u64;
			}
		}

		if total_digits == 0 {
			return Err(Error::number_format("expected at least one hexadecimal digit"));
		}

		Ok(value)
	}

	/// Reads exactly `dst.len()` bytes, failing with end-of-stream if fewer
	/// are available.
	pub fn read_into_slice_exact(&mut self, dst: &mut [u8]) -> Result<()> {
		self.require(dst.len())?;
		let mut off = 0;
		while off < dst.len() {
			let seg = self.segments.front_mut().expect("require guarantees data");
			let n = seg.pop_into_slice(&mut dst[off..]);
			off += n;
			self.account_read(n);
		}
		Ok(())
	}

	/// Reads up to `dst.len()` bytes, returning the number actually read
	/// (`min(dst.len(), self.len())`).
	pub fn read_into_slice(&mut self, dst: &mut [u8]) -> Result<usize> {
		let n = dst.len().min(self.len());
		self.read_into_slice_exact(&mut dst[..n])?;
		Ok(n)
	}

	/// Reads exactly `byte_count` bytes into a freshly allocated `Vec`.
	pub fn read_byte_array(&mut self, byte_count: usize) -> Result<Vec<u8>> {
		let mut out = vec![0u8; byte_count];
		self.read_into_slice_exact(&mut out)?;
		Ok(out)
	}

	/// UTF-8 decodes exactly `byte_count` bytes. When the range spans more
	/// than one segment, the bytes are first copied into a contiguous
	/// temporary array.
	pub fn read_string(&mut self, byte_count: usize) -> Result<String> {
		let bytes = self.read_byte_array(byte_count)?;
		Ok(crate::utf8::decode(&bytes))
	}

	/// UTF-8 decodes the whole buffer.
	pub fn read_string_all(&mut self) -> Result<String> {
		self.read_string(self.len())
	}

	/// Reads a line terminated by `\n` (a preceding `\r` is consumed as part
	/// of the terminator), or, absent a terminator, the rest of the buffer.
	/// Returns `None` only when the buffer is already empty.
	pub fn read_utf8_line(&mut self) -> Result<Option<String>> {
		match self.index_of(b'\n', 0, self.len()) {
			Some(newline) => Some(self.read_line_through(newline)).transpose(),
			None if self.is_empty() => Ok(None),
			None => self.read_string(self.len()).map(Some),
		}
	}

	/// As [`Buffer::read_utf8_line`], but fails with end-of-stream if no
	/// terminator is found within `limit` bytes (or within the whole buffer
	/// if `limit` is `None`). Leaves the buffer untouched on failure.
	pub fn read_utf8_line_strict(&mut self, limit: Option<usize>) -> Result<String> {
		let scan_to = limit.unwrap_or(self.len()).min(self.len());
		match self.index_of(b'\n', 0, scan_to) {
			Some(newline) => self.read_line_through(newline),
			None => Err(Error::eos()),
		}
	}

	fn read_line_through(&mut self, newline: usize) -> Result<String> {
		let mut text_len = newline;
		let mut term_len = 1;
		if newline > 0 && self.index_of(b'\r', newline - 1, newline).is_some() {
			text_len -= 1;
			term_len += 1;
		}

		let line = self.read_string(text_len)?;
		self.skip(term_len)?;
		Ok(line)
	}
}
