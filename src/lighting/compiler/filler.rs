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

use tracing::warn;

use crate::lighting::curve::CurveEvaluator;
use crate::lighting::effects::{ChannelState, ChannelValue, DmxEffect, EffectKind};
use crate::lighting::fixture::{Channel, Fixture, FixtureGroup};

use super::segments::Segment;
use super::targets::{self, TargetSpecificity};

/// Label attached to effects produced by the state filler.
pub(crate) const STATE_FILLER_SOURCE: &str = "state-filler";

/// Conflict resolution when several effects specify the same channel within
/// one segment. The policy is a documented knob on the compiler, not an
/// assumption buried in the merge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// More specific targeting wins (direct id > alias > group > ALL);
    /// ties go to the first-listed effect.
    #[default]
    SpecificityThenOrder,

    /// The first-listed effect wins regardless of targeting.
    InputOrder,
}

/// Merges each segment's contributors into one fully-specified effect per
/// segment, in time order.
///
/// Channels no contributor specifies carry forward the value resolved in
/// the previous segment, or the fixture's configured defaults for the
/// first segment. Channels never implicitly reset between segments; a
/// physical head holds its last commanded value. Segments with no
/// contributors are skipped and left to the gap filler.
pub fn fill(
    segments: &[Segment<'_>],
    fixture: &Fixture,
    groups: &BTreeMap<String, FixtureGroup>,
    evaluator: &dyn CurveEvaluator,
    policy: MergePolicy,
) -> Vec<DmxEffect> {
    // The value the head is physically holding entering the next segment.
    // Curves are materialized into statics as segments pass, so this only
    // ever contains statics.
    let mut held: BTreeMap<Channel, ChannelValue> = fixture
        .channels()
        .keys()
        .map(|&channel| (channel, ChannelValue::Static(fixture.default_value(channel))))
        .collect();

    let mut filled = Vec::new();
    for segment in segments {
        if segment.contributors().is_empty() {
            continue;
        }

        let mut state = ChannelState::new();
        for (&channel, held_value) in held.iter_mut() {
            let value = match resolve_channel(segment, channel, fixture, groups, policy) {
                Some(value) => value,
                None => held_value.clone(),
            };
            state.set(channel, value.clone());
            *held_value = hold_after(value, segment.range().end_ms(), fixture, channel, evaluator);
        }

        // Every declared channel was just visited; anything less is a
        // defect in this function.
        assert!(
            state.is_complete_for(fixture),
            "state filler produced an incomplete channel map for fixture {} at {}",
            fixture.name(),
            segment.range(),
        );

        filled.push(DmxEffect::new(
            fixture.name().to_string(),
            segment.range(),
            state,
            STATE_FILLER_SOURCE,
            EffectKind::HandlerDerived,
        ));
    }
    filled
}

/// Picks the winning contributor value for a channel, if any contributor
/// specifies it.
fn resolve_channel(
    segment: &Segment<'_>,
    channel: Channel,
    fixture: &Fixture,
    groups: &BTreeMap<String, FixtureGroup>,
    policy: MergePolicy,
) -> Option<ChannelValue> {
    let mut winner: Option<(TargetSpecificity, &ChannelValue)> = None;
    for effect in segment.contributors() {
        let value = match effect.channels().get(&channel) {
            Some(value) => value,
            None => continue,
        };
        let specificity = match targets::specificity(effect, fixture, groups) {
            Some(specificity) => specificity,
            None => continue,
        };
        match policy {
            MergePolicy::SpecificityThenOrder => {
                // Strictly greater, so the first-listed effect keeps the
                // win on ties.
                if winner.is_none_or(|(best, _)| specificity > best) {
                    winner = Some((specificity, value));
                }
            }
            MergePolicy::InputOrder => {
                if winner.is_none() {
                    winner = Some((specificity, value));
                }
            }
        }
    }
    winner.map(|(_, value)| value.clone())
}

/// The value the head physically holds once the segment ends: statics hold
/// as-is, a curve holds whatever it evaluated to at the segment's end.
fn hold_after(
    value: ChannelValue,
    end_ms: u64,
    fixture: &Fixture,
    channel: Channel,
    evaluator: &dyn CurveEvaluator,
) -> ChannelValue {
    match value {
        ChannelValue::Static(_) => value,
        ChannelValue::Curve(ref curve) => match evaluator.evaluate(curve, end_ms) {
            Some(raw) => ChannelValue::Static(curve.clamp(raw)),
            None => {
                warn!(
                    "No evaluator for a curve on fixture {} channel {}; holding the configured default",
                    fixture.name(),
                    channel
                );
                ChannelValue::Static(fixture.default_value(channel))
            }
        },
    }
}
