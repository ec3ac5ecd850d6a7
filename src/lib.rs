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

//! ## How it works
//!
//! Data is written to and read from reusable chunks of memory called
//! *segments*. When a segment is consumed, it's returned to a sharded
//! [`Pool`](pool::Pool); to write data, segments are claimed from this pool,
//! and new ones are allocated once it's exhausted.
//!
//! ### Segments
//!
//! Segment memory can either be owned or shared between segments
//! (copy-on-write), avoiding a mem-copy wherever a [`Buffer`](buffer::Buffer)
//! is split or snapshotted. Small amounts of data, under a threshold, are
//! never shared, trading a little duplicated memory for cheaper bookkeeping.
//!
//! A [`Buffer`](buffer::Buffer) is a deque of segments read from the front
//! and written at the back. Emptied segments are recycled back to the pool
//! as soon as they're drained, and a half-empty second segment is merged
//! into the head rather than left to linger, so a buffer's segment count
//! stays proportional to its content.
//!
//! ### Layering
//!
//! [`raw`] defines the single-method boundary traits ([`raw::RawSource`],
//! [`raw::RawSink`]) that any byte source or sink — a socket, a file, another
//! buffer — implements. [`buffered_source::BufferedSource`] and
//! [`buffered_sink::BufferedSink`] layer a buffer over those, adding typed
//! reads/writes, line decoding, look-ahead ([`peek::PeekSource`]), and
//! multi-candidate matching ([`options::Options`]).

mod buffer;
mod byte_string;
mod buffered_sink;
mod buffered_source;
mod error;
mod options;
mod peek;
pub mod pool;
pub mod raw;
mod segment;
mod utf8;

pub use buffer::Buffer;
pub use buffered_sink::BufferedSink;
pub use buffered_source::BufferedSource;
pub use byte_string::ByteString;
pub use error::{Error, ErrorKind, Result};
pub use options::Options;
pub use peek::PeekSource;
pub use pool::{Pool, PoolConfig};
pub use raw::{Closeable, IoSink, IoSource, Processor, RawSink, RawSource, Transform};
pub use segment::{Segment, SIZE as SEGMENT_SIZE};
