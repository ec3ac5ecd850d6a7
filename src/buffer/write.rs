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

//! Typed write primitives, the mirror image of [`read`](super::read).
//!
//! Every primitive bottoms out in [`Buffer::write_bytes`], which loops
//! claiming (or extending) the tail segment until the whole slice has been
//! appended — writes never need a straddling slow path the way reads do,
//! since appending across a segment boundary is just "keep going".

use super::Buffer;
use crate::error::Result;

impl Buffer {
	/// Appends `src` to the tail, claiming fresh segments from the pool as
	/// needed. May straddle a segment boundary; fine for strings and slices,
	/// but fixed-width scalars use [`Buffer::write_array`] instead so they
	/// always land contiguously.
	pub(crate) fn write_bytes(&mut self, mut src: &[u8]) {
		while !src.is_empty() {
			let seg = self.writable_segment(1);
			let n = seg.push_slice(src);
			self.account_write(n);
			src = &src[n..];
		}
	}

	/// Appends `bytes` as a single contiguous run, claiming a tail segment
	/// with at least `N` bytes of room first so a fixed-width value never
	/// straddles a segment boundary.
	pub(crate) fn write_array<const N: usize>(&mut self, bytes: [u8; N]) {
		let seg = self.writable_segment(N);
		let n = seg.push_slice(&bytes);
		debug_assert_eq!(n, N, "writable_segment(N) must guarantee N bytes of room");
		self.account_write(n);
	}

	/// Appends a single byte.
	pub fn write_u8(&mut self, value: u8) {
		self.write_array([value]);
	}

	/// Appends a single signed byte.
	pub fn write_i8(&mut self, value: i8) {
		self.write_u8(value as u8);
	}
}

macro_rules! gen_int_writes {
	($($write_u:ident, $write_u_le:ident, $uty:ty, $write_s:ident, $write_s_le:ident, $sty:ty);+ $(;)?) => {
		impl Buffer {
			$(
			#[doc = concat!("Appends a big-endian `", stringify!($uty), "`.")]
			pub fn $write_u(&mut self, value: $uty) {
				self.write_array(value.to_be_bytes());
			}

			#[doc = concat!("Appends a little-endian `", stringify!($uty), "`.")]
			pub fn $write_u_le(&mut self, value: $uty) {
				self.write_array(value.to_le_bytes());
			}

			#[doc = concat!("Appends a big-endian `", stringify!($sty), "`.")]
			pub fn $write_s(&mut self, value: $sty) {
				self.$write_u(value as $uty);
			}

			#[doc = concat!("Appends a little-endian `", stringify!($sty), "`.")]
			pub fn $write_s_le(&mut self, value: $sty) {
				self.$write_u_le(value as $uty);
			}
			)+
		}
	};
}

gen_int_writes! {
	write_u16, write_u16_le, u16, write_i16, write_i16_le, i16;
	write_u32, write_u32_le, u32, write_i32, write_i32_le, i32;
	write_u64, write_u64_le, u64, write_i64, write_i64_le, i64;
}

impl Buffer {
	/// Appends a big-endian IEEE-754 single-precision float.
	pub fn write_f32(&mut self, value: f32) {
		self.write_array(value.to_be_bytes());
	}

	/// Appends a little-endian IEEE-754 single-precision float.
	pub fn write_f32_le(&mut self, value: f32) {
		self.write_array(value.to_le_bytes());
	}

	/// Appends a big-endian IEEE-754 double-precision float.
	pub fn write_f64(&mut self, value: f64) {
		self.write_array(value.to_be_bytes());
	}

	/// Appends a little-endian IEEE-754 double-precision float.
	pub fn write_f64_le(&mut self, value: f64) {
		self.write_array(value.to_le_bytes());
	}

	/// Appends the ASCII decimal representation of `value`; negative values
	/// get a leading `-`. Handles `i64::MIN` without overflow by peeling
	/// digits off in their natural negative form.
	pub fn write_decimal_long(&mut self, value: i64) {
		if value == 0 {
			self.write_u8(b'0');
			return;
		}

		let mut digits = [0u8; 20]; // "-9223372036854775808"
		let mut i = digits.len();
		let mut n = value;
		while n != 0 {
			let digit = (n % 10).unsigned_abs() as u8;
			i -= 1;
			digits[i] = b'0' + digit;
			n /= 10;
		}
		if value < 0 {
			i -= 1;
			digits[i] = b'-';
		}

		self.write_bytes(&digits[i..]);
	}

	/// Appends the minimal lowercase hexadecimal representation of `value`
	/// interpreted as unsigned; `0` writes `"0"`.
	pub fn write_hex_unsigned_long(&mut self, value: u64) {
		if value == 0 {
			self.write_u8(b'0');
			return;
		}

		let mut digits = [0u8; 16];
		let mut i = digits.len();
		let mut n = value;
		while n != 0 {
			let digit = (n & 0xf) as u8;
			i -= 1;
			digits[i] = if digit < 10 { b'0' + digit } else { b'a' + (digit - 10) };
			n >>= 4;
		}

		self.write_bytes(&digits[i..]);
	}

	/// UTF-8 encodes and appends `s` in full. A Rust `&str` is always
	/// well-formed UTF-8, so this is a direct byte-slice append.
	pub fn write_string(&mut self, s: &str) {
		self.write_bytes(s.as_bytes());
	}

	/// UTF-8 encodes and appends `s[start..end]` (a byte range; panics on a
	/// non-char boundary, matching `str`'s own slicing rules).
	pub fn write_string_range(&mut self, s: &str, start: usize, end: usize) {
		self.write_bytes(s[start..end].as_bytes());
	}

	/// Encodes and appends a single Unicode code point, replacing an
	/// isolated surrogate half with `'?'` and failing if `code_point` is at
	/// or beyond `0x110000`.
	pub fn write_code_point(&mut self, code_point: u32) -> Result<()> {
		let bytes = crate::utf8::encode_code_point(code_point)?;
		self.write_bytes(&bytes);
		Ok(())
	}

	/// Appends `src` verbatim.
	pub fn write_slice(&mut self, src: &[u8]) {
		self.write_bytes(src);
	}
}

#[cfg(test)]
mod tests {
	use crate::buffer::Buffer;

	#[test]
	fn write_decimal_long_zero() {
		let mut buf = Buffer::new();
		buf.write_decimal_long(0);
		assert_eq!(buf.read_string_all().unwrap(), "0");
	}

	#[test]
	fn write_decimal_long_min_value() {
		let mut buf = Buffer::new();
		buf.write_decimal_long(i64::MIN);
		assert_eq!(buf.read_string_all().unwrap(), i64::MIN.to_string());
	}

	#[test]
	fn write_hex_unsigned_long_zero() {
		let mut buf = Buffer::new();
		buf.write_hex_unsigned_long(0);
		assert_eq!(buf.read_string_all().unwrap(), "0");
	}

	#[test]
	fn write_code_point_replaces_surrogate() {
		let mut buf = Buffer::new();
		buf.write_code_point(0xD800).unwrap();
		assert_eq!(buf.read_string_all().unwrap(), "?");
	}

	#[test]
	fn write_code_point_rejects_out_of_range() {
		let mut buf = Buffer::new();
		assert!(buf.write_code_point(0x110000).is_err());
	}
}
