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

//! A fixed set of candidate byte strings, matched against the head of a
//! buffered source in one pass instead of one `request`/compare per
//! candidate.

use crate::buffered_source::BufferedSource;
use crate::error::Result;
use crate::raw::RawSource;

/// A set of candidate prefixes to match against a source's upcoming bytes.
///
/// Matching prefers the *longest* candidate that matches; ties between
/// equal-length candidates go to whichever was listed first.
pub struct Options {
	candidates: Vec<Vec<u8>>,
}

impl Options {
	/// Builds a selector from `candidates`, in priority order.
	pub fn new<I, B>(candidates: I) -> Self
	where
		I: IntoIterator<Item = B>,
		B: Into<Vec<u8>>,
	{
		Self { candidates: candidates.into_iter().map(Into::into).collect() }
	}

	/// Matches `source`'s upcoming bytes against every candidate, consuming
	/// the best match and returning its index, or consuming nothing and
	/// returning `None` if nothing matches.
	pub fn select<S: RawSource>(&self, source: &mut BufferedSource<S>) -> Result<Option<usize>> {
		let mut best: Option<(usize, usize)> = None; // (candidate index, length)

		// Each candidate gets its own peek, since a single peek's cursor
		// advances as bytes are read and can't be rewound between candidates.
		for (index, candidate) in self.candidates.iter().enumerate() {
			if candidate.is_empty() {
				continue;
			}

			let mut peek = source.peek();
			if !peek.request(candidate.len())? {
				continue;
			}

			let mut matches = true;
			for &expected in candidate {
				if peek.read_u8()? != expected {
					matches = false;
					break;
				}
			}

			if matches {
				let better = match best {
					None => true,
					Some((_, best_len)) => candidate.len() > best_len,
				};
				if better {
					best = Some((index, candidate.len()));
				}
			}
		}

		match best {
			None => Ok(None),
			Some((index, len)) => {
				source.skip(len)?;
				Ok(Some(index))
			}
		}
	}
}
