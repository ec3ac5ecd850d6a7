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

//! The error type shared by every fallible operation in the crate. One
//! [`ErrorKind`] per design-level failure mode; an [`Error`] pairs a kind with
//! an optional boxed source so an `io::Error` from a raw collaborator is never
//! swallowed, only wrapped.

use std::fmt;
use std::io;
use thiserror::Error as ThisError;

pub type Result<T = ()> = std::result::Result<T, Error>;

/// The reason an operation failed, independent of any wrapped source error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
	/// Input was exhausted before the required number of bytes was available.
	#[error("premature end of stream")]
	EndOfStream,
	/// A closed adapter was used, an invalidated peek source was read, or a
	/// copy tracker underflowed.
	#[error("illegal state")]
	IllegalState,
	/// A negative count, an out-of-range index, a self-referential
	/// read-and-write, or a code point outside the Unicode range.
	#[error("invalid argument")]
	InvalidArgument,
	/// An array or string index was out of bounds.
	#[error("index out of bounds")]
	OutOfBounds,
	/// A decimal or hexadecimal textual number was malformed.
	#[error("malformed number")]
	NumberFormat,
	/// An error from the underlying raw source or sink, propagated unchanged.
	#[error("I/O error")]
	Io,
}

/// An operation failure. Carries the [`ErrorKind`] and, where applicable, the
/// underlying error that caused it.
#[derive(Debug)]
pub struct Error {
	kind: ErrorKind,
	source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
	pub fn kind(&self) -> ErrorKind { self.kind }

	pub(crate) fn new(kind: ErrorKind) -> Self {
		Self { kind, source: None }
	}

	pub(crate) fn with_source(
		kind: ErrorKind,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self { kind, source: Some(Box::new(source)) }
	}

	pub(crate) fn eos() -> Self { Self::new(ErrorKind::EndOfStream) }
	pub(crate) fn closed() -> Self { Self::new(ErrorKind::IllegalState) }
	pub(crate) fn illegal_state(message: &'static str) -> Self {
		Self::with_source(ErrorKind::IllegalState, Message(message))
	}
	pub(crate) fn invalid_argument(message: &'static str) -> Self {
		Self::with_source(ErrorKind::InvalidArgument, Message(message))
	}
	pub(crate) fn out_of_bounds() -> Self { Self::new(ErrorKind::OutOfBounds) }
	pub(crate) fn number_format(message: &'static str) -> Self {
		Self::with_source(ErrorKind::NumberFormat, Message(message))
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.kind)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source.as_deref().map(|e| e as _)
	}
}

impl From<io::Error> for Error {
	fn from(value: io::Error) -> Self {
		if value.kind() == io::ErrorKind::UnexpectedEof {
			Error::eos()
		} else {
			Error::with_source(ErrorKind::Io, value)
		}
	}
}

/// Wraps a static diagnostic string as an `Error` source, so call sites can
/// attach a human-readable cause without defining a one-off error type.
#[derive(Debug)]
struct Message(&'static str);

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

impl std::error::Error for Message {}
