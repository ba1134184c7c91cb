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

use std::collections::BTreeSet;

use crate::lighting::effects::SequencedEffect;

/// Computes the sorted, deduplicated set of instants at which the set of
/// effects overlapping a fixture's timeline can change: every effect's
/// start and end. Between two adjacent boundaries the contributing-effect
/// set is constant, which is what the state filler relies on.
pub fn boundaries(effects: &[SequencedEffect]) -> Vec<u64> {
    let mut instants = BTreeSet::new();
    for effect in effects {
        instants.insert(effect.range().start_ms());
        instants.insert(effect.range().end_ms());
    }
    instants.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::lighting::effects::{ChannelValue, TimeRange};
    use crate::lighting::fixture::Channel;

    use super::*;

    fn effect(start_ms: u64, end_ms: u64) -> SequencedEffect {
        let mut channels = BTreeMap::new();
        channels.insert(Channel::Dimmer, ChannelValue::Static(255));
        SequencedEffect::new(
            vec!["left_spot".to_string()],
            channels,
            TimeRange::new(start_ms, end_ms).expect("valid range"),
            "movement-handler",
        )
        .expect("valid effect")
    }

    #[test]
    fn test_no_effects_no_boundaries() {
        assert!(boundaries(&[]).is_empty());
    }

    #[test]
    fn test_single_effect() {
        assert_eq!(vec![100, 500], boundaries(&[effect(100, 500)]));
    }

    #[test]
    fn test_overlapping_effects() {
        // An ALL-targeted effect over [0, 500) and a direct effect over
        // [300, 800) yield exactly these four instants.
        assert_eq!(
            vec![0, 300, 500, 800],
            boundaries(&[effect(0, 500), effect(300, 800)])
        );
    }

    #[test]
    fn test_shared_instants_are_deduplicated() {
        assert_eq!(
            vec![0, 500, 1000],
            boundaries(&[effect(0, 500), effect(500, 1000), effect(0, 1000)])
        );
    }
}
