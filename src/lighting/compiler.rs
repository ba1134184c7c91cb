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

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::curve::CurveEvaluator;
use super::effects::{ChannelEffect, DmxEffect, SequencedEffect, TimeRange};
use super::fixture::{Fixture, FixtureGroup};

pub mod boundaries;
pub mod filler;
pub mod gaps;
pub mod normalize;
pub mod segments;
pub mod targets;

pub use filler::MergePolicy;

/// Compiles handler-produced effect instructions into complete, gapless,
/// non-overlapping control timelines, one per fixture.
///
/// The compiler is pure: it holds no state across sections, never mutates
/// its inputs, and performs no I/O. Instruction ranges are expected to lie
/// within the section being compiled; upstream handlers produce them per
/// section.
pub struct Compiler<E> {
    /// Evaluates value curves where the compiler must materialize a held
    /// value.
    evaluator: E,

    /// Channel conflict resolution.
    policy: MergePolicy,
}

impl<E: CurveEvaluator> Compiler<E> {
    /// Creates a compiler with the default merge policy.
    pub fn new(evaluator: E) -> Compiler<E> {
        Compiler {
            evaluator,
            policy: MergePolicy::default(),
        }
    }

    /// Overrides the channel merge policy.
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Compiler<E> {
        self.policy = policy;
        self
    }

    /// Compiles one section. Returns every fixture's timeline in one list,
    /// sorted by fixture name and start time. Empty input is not an error;
    /// every fixture degenerates to a single full-section gap fill.
    pub fn compile_section(
        &self,
        sequenced: &[SequencedEffect],
        channel_effects: &[ChannelEffect],
        fixtures: &BTreeMap<String, Fixture>,
        groups: &BTreeMap<String, FixtureGroup>,
        section: TimeRange,
    ) -> Vec<DmxEffect> {
        // Bring both instruction shapes into the common representation.
        // Movement effects come first, so they win input-order ties.
        let mut effects: Vec<SequencedEffect> = sequenced.to_vec();
        effects.extend(normalize::normalize(channel_effects));

        // Fixtures never read each other's state, so they compile in
        // parallel.
        let fixture_list: Vec<&Fixture> = fixtures.values().collect();
        let compiled: Vec<Vec<DmxEffect>> = fixture_list
            .par_iter()
            .map(|fixture| self.compile_fixture(&effects, fixture, groups, section))
            .collect();

        let mut result: Vec<DmxEffect> = compiled.into_iter().flatten().collect();
        result.sort_by(|a, b| {
            a.fixture()
                .cmp(b.fixture())
                .then_with(|| a.range().start_ms().cmp(&b.range().start_ms()))
        });
        result
    }

    /// Compiles a single fixture's timeline for the section.
    fn compile_fixture(
        &self,
        effects: &[SequencedEffect],
        fixture: &Fixture,
        groups: &BTreeMap<String, FixtureGroup>,
        section: TimeRange,
    ) -> Vec<DmxEffect> {
        let fixture_effects: Vec<SequencedEffect> = effects
            .iter()
            .filter(|effect| targets::applies_to(effect, fixture, groups))
            .cloned()
            .collect();

        for effect in &fixture_effects {
            for channel in effect.channels().keys() {
                if !fixture.declares(*channel) {
                    warn!(
                        "Fixture {} does not declare channel {}; skipping it",
                        fixture.name(),
                        channel
                    );
                }
            }
        }

        let bounds = boundaries::boundaries(&fixture_effects);
        let segments = segments::split(&fixture_effects, &bounds);
        let mut timeline = filler::fill(
            &segments,
            fixture,
            groups,
            &self.evaluator,
            self.policy,
        );

        let holes = gaps::find_gaps(&timeline, section);
        timeline.extend(gaps::fill_gaps(&holes, fixture));
        timeline.sort_by_key(|effect| effect.range().start_ms());

        verify_timeline(&timeline, fixture, section);
        debug!(
            "Compiled {} effects for fixture {} over {}",
            timeline.len(),
            fixture.name(),
            section
        );
        timeline
    }
}

/// Asserts the compiled-timeline invariants: exact section coverage with
/// no overlap, and a complete channel map on every effect. A violation
/// here is a defect in the compiler itself, never a recoverable input
/// condition.
fn verify_timeline(timeline: &[DmxEffect], fixture: &Fixture, section: TimeRange) {
    let mut cursor = section.start_ms();
    for effect in timeline {
        assert!(
            effect.range().start_ms() == cursor,
            "timeline for fixture {} is not contiguous at {}ms",
            fixture.name(),
            cursor
        );
        assert!(
            effect.channels().is_complete_for(fixture),
            "incomplete channel map for fixture {} at {}",
            fixture.name(),
            effect.range()
        );
        cursor = effect.range().end_ms();
    }
    assert!(
        cursor == section.end_ms(),
        "timeline for fixture {} ends at {}ms, expected {}ms",
        fixture.name(),
        cursor,
        section.end_ms()
    );
}
