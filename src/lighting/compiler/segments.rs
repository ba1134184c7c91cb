// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::lighting::effects::{SequencedEffect, TimeRange};

/// A boundary-aligned slice of a fixture's timeline. Within a segment the
/// set of contributing effects is constant.
#[derive(Debug)]
pub struct Segment<'a> {
    /// The range the segment covers.
    range: TimeRange,

    /// The effects overlapping this segment, in original input order.
    contributors: Vec<&'a SequencedEffect>,
}

impl<'a> Segment<'a> {
    /// Gets the covered range.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Gets the contributing effects.
    pub fn contributors(&self) -> &[&'a SequencedEffect] {
        &self.contributors
    }
}

/// Partitions a fixture's effects into boundary-aligned segments. Effects
/// are referenced, never cloned or resliced; narrowing a value curve to a
/// segment is the evaluator's concern once a final value is produced.
/// An empty boundary set produces no segments.
pub fn split<'a>(effects: &'a [SequencedEffect], boundaries: &[u64]) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    for pair in boundaries.windows(2) {
        // Boundary sets are strictly increasing, so the range is valid.
        let range = match TimeRange::new(pair[0], pair[1]) {
            Ok(range) => range,
            Err(_) => continue,
        };
        let contributors: Vec<&SequencedEffect> = effects
            .iter()
            .filter(|effect| effect.range().overlaps(&range))
            .collect();
        segments.push(Segment {
            range,
            contributors,
        });
    }
    segments
}
