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

//! UTF-8 encode/decode with the Unicode maximal-subpart replacement policy.
//!
//! `decode` takes the fast path through [`simdutf8`] when a byte range is
//! already well-formed (the common case), falling back to the table-free
//! decoder below only on the rare invalid path — `simdutf8` validates but
//! cannot itself produce per-maximal-subpart replacement characters.

use arrayvec::ArrayVec;
use crate::error::{Error, Result};

/// Decodes `bytes` as UTF-8, taking the `simdutf8` fast path when possible
/// and falling back to the lossy decoder on the first invalid byte.
pub fn decode(bytes: &[u8]) -> String {
	if simdutf8::basic::from_utf8(bytes).is_ok() {
		// Just validated; avoids re-walking the bytes a second time.
		unsafe { std::str::from_utf8_unchecked(bytes) }.to_owned()
	} else {
		decode_lossy(bytes)
	}
}

/// Decodes `bytes` as UTF-8, replacing every ill-formed maximal subpart
/// (Unicode §3.9) with a single `U+FFFD`.
pub fn decode_lossy(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		let (decoded, consumed) = decode_one(&bytes[i..]);
		match decoded {
			Some(ch) => out.push(ch),
			None => out.push('\u{FFFD}'),
		}
		i += consumed;
	}
	out
}

/// Decodes one code point from the front of `bytes`, returning the decoded
/// `char` (or `None` if the leading maximal subpart is ill-formed) and the
/// number of bytes that subpart occupies.
fn decode_one(bytes: &[u8]) -> (Option<char>, usize) {
	let b0 = bytes[0];
	if b0 < 0x80 {
		return (Some(b0 as char), 1);
	}
	if !(0xC2..=0xF4).contains(&b0) {
		return (None, 1);
	}

	let len = if b0 < 0xE0 { 2 } else if b0 < 0xF0 { 3 } else { 4 };
	let mut cp: u32 = match len {
		2 => (b0 as u32) & 0x1F,
		3 => (b0 as u32) & 0x0F,
		_ => (b0 as u32) & 0x07,
	};

	for i in 1..len {
		let Some(&b) = bytes.get(i) else {
			return (None, i);
		};

		let valid = match (b0, i) {
			(0xE0, 1) => (0xA0..=0xBF).contains(&b),
			(0xED, 1) => (0x80..=0x9F).contains(&b),
			(0xF0, 1) => (0x90..=0xBF).contains(&b),
			(0xF4, 1) => (0x80..=0x8F).contains(&b),
			_ => (0x80..=0xBF).contains(&b),
		};

		if !valid {
			return (None, i);
		}

		cp = (cp << 6) | (b as u32 & 0x3F);
	}

	(char::from_u32(cp), len)
}

/// Encodes a single Unicode code point per the specification's policy: an
/// isolated surrogate half (`0xD800..=0xDFFF`) writes the ASCII replacement
/// byte `'?'`; a code point at or beyond `0x110000` fails.
pub fn encode_code_point(cp: u32) -> Result<ArrayVec<u8, 4>> {
	let mut out = ArrayVec::new();

	if (0xD800..=0xDFFF).contains(&cp) {
		out.push(b'?');
		return Ok(out);
	}
	if cp >= 0x110000 {
		return Err(Error::invalid_argument("code point out of Unicode range"));
	}

	match cp {
		0..=0x7F => out.push(cp as u8),
		0x80..=0x7FF => {
			out.push(0xC0 | (cp >> 6) as u8);
			out.push(0x80 | (cp & 0x3F) as u8);
		}
		0x800..=0xFFFF => {
			out.push(0xE0 | (cp >> 12) as u8);
			out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
			out.push(0x80 | (cp & 0x3F) as u8);
		}
		_ => {
			out.push(0xF0 | (cp >> 18) as u8);
			out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
			out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
			out.push(0x80 | (cp & 0x3F) as u8);
		}
	}

	Ok(out)
}

/// Encodes a sequence of UTF-16 code units, fusing high+low surrogate pairs
/// into their supplementary code point and replacing any unpaired surrogate
/// with `'?'`. For platform collaborators (Windows, JVM) whose native string
/// type is UTF-16; a Rust `&str` never needs this, since `char` structurally
/// excludes surrogates already.
pub fn encode_utf16_lossy(units: &[u16]) -> Vec<u8> {
	let mut out = Vec::with_capacity(units.len() * 3);
	let mut i = 0;
	while i < units.len() {
		let unit = units[i];
		if (0xD800..=0xDBFF).contains(&unit) {
			if let Some(&low) = units.get(i + 1) {
				if (0xDC00..=0xDFFF).contains(&low) {
					let cp = 0x10000
						+ (((unit as u32) - 0xD800) << 10)
						+ (low as u32 - 0xDC00);
					out.extend_from_slice(
						&encode_code_point(cp).expect("fused surrogate pair is always in range"),
					);
					i += 2;
					continue;
				}
			}
			out.push(b'?');
			i += 1;
		} else if (0xDC00..=0xDFFF).contains(&unit) {
			out.push(b'?');
			i += 1;
		} else {
			out.extend_from_slice(
				&encode_code_point(unit as u32).expect("BMP scalar value is always in range"),
			);
			i += 1;
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_well_formed_sample() {
		assert_eq!(decode("təˈranəˌsôr".as_bytes()), "təˈranəˌsôr");
	}

	#[test]
	fn replaces_continuation_only_byte() {
		assert_eq!(decode_lossy(&[0x80]), "\u{FFFD}");
	}

	#[test]
	fn replaces_overlong_encoding_without_eating_next_char() {
		// C0 80 is an overlong encoding of NUL; the maximal subpart is just
		// the lead byte, so 'a' that follows decodes normally.
		assert_eq!(decode_lossy(&[0xC0, 0x80, b'a']), "\u{FFFD}\u{FFFD}a");
	}

	#[test]
	fn replaces_surrogate_encoding() {
		// ED A0 80 encodes U+D800, a lone high surrogate.
		assert_eq!(decode_lossy(&[0xED, 0xA0, 0x80]), "\u{FFFD}");
	}

	#[test]
	fn truncated_sequence_at_end_of_input_is_one_replacement() {
		assert_eq!(decode_lossy(&[0xE2, 0x82]), "\u{FFFD}");
	}

	#[test]
	fn encode_code_point_rejects_out_of_range() {
		assert!(encode_code_point(0x110000).is_err());
	}

	#[test]
	fn encode_code_point_replaces_isolated_surrogate() {
		assert_eq!(encode_code_point(0xD800).unwrap().as_slice(), b"?");
	}

	#[test]
	fn encode_utf16_fuses_surrogate_pair() {
		// U+1F600 GRINNING FACE as a surrogate pair.
		let units = [0xD83D, 0xDE00];
		let bytes = encode_utf16_lossy(&units);
		assert_eq!(decode(&bytes), "\u{1F600}");
	}

	#[test]
	fn encode_utf16_replaces_unpaired_surrogate() {
		let units = [0xD800, b'x' as u16];
		assert_eq!(encode_utf16_lossy(&units), b"?x");
	}
}
