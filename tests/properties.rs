// SPDX-License-Identifier: Apache-2.0

use byteway::Buffer;
use quickcheck_macros::quickcheck;

/// P5: writing then reading back an arbitrary byte slice returns it exactly.
#[quickcheck]
fn write_slice_then_read_round_trips(data: Vec<u8>) -> bool {
	let mut buf = Buffer::new();
	buf.write_slice(&data);
	let mut out = vec![0u8; data.len()];
	buf.read_into_slice_exact(&mut out).is_ok() && out == data && buf.is_empty()
}

/// P6: a well-formed string round-trips through write/read unchanged.
#[quickcheck]
fn write_string_then_read_round_trips(s: String) -> bool {
	let mut buf = Buffer::new();
	buf.write_string(&s);
	buf.read_string_all().map(|got| got == s).unwrap_or(false)
}

/// P1 (size accounting): `len()` always equals the bytes written minus the
/// bytes read back out so far.
#[quickcheck]
fn len_tracks_writes_and_reads(data: Vec<u8>, split: usize) -> bool {
	let mut buf = Buffer::new();
	buf.write_slice(&data);
	if buf.len() != data.len() {
		return false;
	}

	let split = if data.is_empty() { 0 } else { split % (data.len() + 1) };
	let mut out = vec![0u8; split];
	if split > 0 && buf.read_into_slice_exact(&mut out).is_err() {
		return false;
	}

	buf.len() == data.len() - split
}
