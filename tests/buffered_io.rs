// SPDX-License-Identifier: Apache-2.0

use byteway::{BufferedSink, BufferedSource, IoSink, IoSource, Options};

#[test]
fn buffered_source_reads_typed_values_across_upstream_pulls() {
	let mut source = BufferedSource::new(IoSource::new(&b"\x00\x00\x00\x2ahello"[..]));
	assert_eq!(source.read_i32().unwrap(), 42);
	assert_eq!(source.read_string(5).unwrap(), "hello");
}

#[test]
fn buffered_sink_batches_writes_until_emit() {
	let mut out = Vec::new();
	{
		let mut sink = BufferedSink::new(IoSink::new(&mut out));
		sink.write_string("round").unwrap();
		sink.write_u8(b'-').unwrap();
		sink.write_string("trip").unwrap();
		sink.flush().unwrap();
	}
	assert_eq!(out, b"round-trip");
}

#[test]
fn peek_looks_ahead_without_consuming() {
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
fn options_select_longest_match_and_consumes_it() {
	let options = Options::new(["GET", "GET /", "POST"]);
	let mut source = BufferedSource::new(IoSource::new(&b"GET / HTTP/1.1\r\n"[..]));
	assert_eq!(options.select(&mut source).unwrap(), Some(1));
	assert_eq!(source.read_utf8_line().unwrap().as_deref(), Some("HTTP/1.1"));
}

#[test]
fn transfer_to_drains_source_into_sink() {
	let mut source = BufferedSource::new(IoSource::new(&b"the quick brown fox"[..]));
	let mut out = Vec::new();
	let mut sink = IoSink::new(&mut out);
	let n = source.transfer_to(&mut sink).unwrap();
	assert_eq!(n, 19);
	assert_eq!(out, b"the quick brown fox");
}
