// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use byteway::pool::DEFAULT_L1_MAX_BYTES;
use byteway::{Buffer, Pool, PoolConfig, SEGMENT_SIZE};

#[test]
fn hex_dump_of_short_buffer() {
	let mut buf = Buffer::new();
	buf.write_slice(b"a\r\nb\nc\rd\\e");
	assert_eq!(format!("{buf}"), "Buffer(size=10 hex=610d0a620a630d645c65)");
}

#[test]
fn hex_dump_truncation() {
	let mut buf = Buffer::new();
	for _ in 0..66 {
		buf.write_u8(0);
	}
	let shown = format!("{buf}");
	assert!(shown.ends_with("…"));
	assert_eq!(shown.matches("00").count(), 64);
}

#[test]
fn straddling_int() {
	let mut buf = Buffer::new();
	for _ in 0..SEGMENT_SIZE - 3 {
		buf.write_u8(b'a');
	}
	buf.write_i32(0xABCDEF01u32 as i32);
	buf.write_i32(0x87654321u32 as i32);

	for _ in 0..SEGMENT_SIZE - 3 {
		assert_eq!(buf.read_u8().unwrap(), b'a');
	}
	assert_eq!(buf.read_i32().unwrap(), 0xABCDEF01u32 as i32);
	assert_eq!(buf.read_i32().unwrap(), 0x87654321u32 as i32);
}

#[test]
fn decimal_long_edges() {
	let mut buf = Buffer::new();
	buf.write_decimal_long(i64::MIN);
	assert_eq!(buf.read_decimal_long().unwrap(), i64::MIN);

	buf.write_decimal_long(0);
	assert_eq!(buf.read_string_all().unwrap(), "0");
}

#[test]
fn utf8_sample() {
	let mut buf = Buffer::new();
	buf.write_string("təˈranəˌsôr");
	assert_eq!(buf.snapshot_len(buf.len()).to_hex(), "74c999cb8872616ec999cb8c73c3b472");
	assert_eq!(buf.read_string_all().unwrap(), "təˈranəˌsôr");
}

#[test]
fn line_reading() {
	let mut buf = Buffer::new();
	buf.write_string("first line\nsecond line\n");
	assert_eq!(buf.read_utf8_line().unwrap().as_deref(), Some("first line"));
	assert_eq!(buf.read_string_all().unwrap(), "second line\n");

	let mut no_terminator = Buffer::new();
	no_terminator.write_string("no newline here");
	let snapshot = no_terminator.snapshot();
	assert!(no_terminator.read_utf8_line_strict(None).is_err());
	assert_eq!(no_terminator.snapshot(), snapshot);
}

#[test]
fn pool_bookkeeping() {
	let pool = Arc::new(Pool::new(PoolConfig::default()));
	let mut buf = Buffer::with_pool(Arc::clone(&pool));

	let chunk = vec![0u8; 2 * DEFAULT_L1_MAX_BYTES];
	buf.write_slice(&chunk);
	buf.skip(chunk.len()).unwrap();
	assert_eq!(pool.shard_byte_count(), DEFAULT_L1_MAX_BYTES);

	buf.write_slice(&vec![0u8; DEFAULT_L1_MAX_BYTES]);
	buf.skip(DEFAULT_L1_MAX_BYTES).unwrap();
	assert_eq!(pool.shard_byte_count(), DEFAULT_L1_MAX_BYTES);
}
