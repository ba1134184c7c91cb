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

use crate::lighting::effects::{ChannelState, ChannelValue, DmxEffect, EffectKind, TimeRange};
use crate::lighting::fixture::Fixture;

/// Label attached to effects synthesized by the gap filler.
pub(crate) const GAP_FILLER_SOURCE: &str = "gap-filler";

/// An uncovered sub-range of a fixture's compiled timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    /// The uncovered range.
    range: TimeRange,
}

impl Gap {
    /// Gets the uncovered range.
    pub fn range(&self) -> TimeRange {
        self.range
    }
}

/// Finds every sub-range of the section with no coverage: before the first
/// effect, between adjacent effects, and after the last. The input must be
/// sorted by start time. No effects at all means the whole section is one
/// gap.
pub fn find_gaps(filled: &[DmxEffect], section: TimeRange) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = section.start_ms();
    for effect in filled {
        if effect.range().start_ms() > cursor {
            if let Ok(range) = TimeRange::new(cursor, effect.range().start_ms()) {
                gaps.push(Gap { range });
            }
        }
        cursor = cursor.max(effect.range().end_ms());
    }
    if cursor < section.end_ms() {
        if let Ok(range) = TimeRange::new(cursor, section.end_ms()) {
            gaps.push(Gap { range });
        }
    }
    gaps
}

/// Synthesizes one soft-home effect per gap so the fixture's timeline has
/// no uncovered ranges. Deterministic: the same gaps always produce the
/// same effects.
pub fn fill_gaps(gaps: &[Gap], fixture: &Fixture) -> Vec<DmxEffect> {
    gaps.iter()
        .map(|gap| {
            let state: ChannelState = fixture
                .channels()
                .keys()
                .map(|&channel| (channel, ChannelValue::Static(fixture.soft_home_value(channel))))
                .collect();

            DmxEffect::new(
                fixture.name().to_string(),
                gap.range(),
                state,
                GAP_FILLER_SOURCE,
                EffectKind::GapFill,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::lighting::fixture::{Calibration, Channel};

    use super::*;

    fn fixture() -> Fixture {
        Fixture::new(
            "left_spot".to_string(),
            None,
            1,
            1,
            [
                (Channel::Pan, 1),
                (Channel::Tilt, 2),
                (Channel::Dimmer, 3),
            ]
            .into_iter()
            .collect(),
            Default::default(),
            Calibration::new(128, 128),
            BTreeMap::new(),
        )
    }

    fn filled(start_ms: u64, end_ms: u64) -> DmxEffect {
        DmxEffect::new(
            "left_spot".to_string(),
            TimeRange::new(start_ms, end_ms).expect("valid range"),
            ChannelState::new(),
            "state-filler",
            EffectKind::HandlerDerived,
        )
    }

    fn section() -> TimeRange {
        TimeRange::new(0, 500).expect("valid range")
    }

    #[test]
    fn test_no_effects_one_full_section_gap() {
        let gaps = find_gaps(&[], section());
        assert_eq!(1, gaps.len());
        assert_eq!(section(), gaps[0].range());
    }

    #[test]
    fn test_trailing_gap() {
        let gaps = find_gaps(&[filled(0, 100), filled(100, 200)], section());
        assert_eq!(1, gaps.len());
        assert_eq!(200, gaps[0].range().start_ms());
        assert_eq!(500, gaps[0].range().end_ms());
    }

    #[test]
    fn test_leading_and_middle_gaps() {
        let gaps = find_gaps(&[filled(100, 200), filled(300, 500)], section());
        assert_eq!(2, gaps.len());
        assert_eq!(0, gaps[0].range().start_ms());
        assert_eq!(100, gaps[0].range().end_ms());
        assert_eq!(200, gaps[1].range().start_ms());
        assert_eq!(300, gaps[1].range().end_ms());
    }

    #[test]
    fn test_full_coverage_no_gaps() {
        let gaps = find_gaps(&[filled(0, 250), filled(250, 500)], section());
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_gap_fill_is_soft_home() {
        let fixture = fixture();
        let gaps = find_gaps(&[], section());
        let effects = fill_gaps(&gaps, &fixture);

        assert_eq!(1, effects.len());
        let effect = &effects[0];
        assert_eq!(EffectKind::GapFill, effect.kind());
        assert_eq!(GAP_FILLER_SOURCE, effect.source());
        assert_eq!(section(), effect.range());
        assert_eq!(
            Some(&ChannelValue::Static(128)),
            effect.channels().get(Channel::Pan)
        );
        assert_eq!(
            Some(&ChannelValue::Static(128)),
            effect.channels().get(Channel::Tilt)
        );
        assert_eq!(
            Some(&ChannelValue::Static(0)),
            effect.channels().get(Channel::Dimmer)
        );
        assert!(effect.channels().is_complete_for(&fixture));
    }
}
