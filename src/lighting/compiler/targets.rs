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

use crate::lighting::effects::{SequencedEffect, ALL_FIXTURES};
use crate::lighting::fixture::{Fixture, FixtureGroup};

/// How specifically an effect's target list addresses a fixture. When two
/// effects contend for the same channel, higher specificity wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TargetSpecificity {
    /// Matched through the ALL sentinel.
    All,

    /// Matched through a group containing the fixture.
    Group,

    /// Matched through the fixture's format alias.
    Alias,

    /// Matched through the fixture's own id.
    Direct,
}

/// Returns the most specific way the effect addresses the fixture, or None
/// if it does not address it at all. Matching is exact-string and
/// case-sensitive across all four namespaces.
pub fn specificity(
    effect: &SequencedEffect,
    fixture: &Fixture,
    groups: &BTreeMap<String, FixtureGroup>,
) -> Option<TargetSpecificity> {
    let mut best: Option<TargetSpecificity> = None;
    for target in effect.targets() {
        let matched = if target == fixture.name() {
            Some(TargetSpecificity::Direct)
        } else if fixture.alias() == Some(target.as_str()) {
            Some(TargetSpecificity::Alias)
        } else if groups
            .get(target)
            .is_some_and(|group| group.contains(fixture.name()))
        {
            Some(TargetSpecificity::Group)
        } else if target == ALL_FIXTURES {
            Some(TargetSpecificity::All)
        } else {
            None
        };
        best = best.max(matched);
    }
    best
}

/// Returns true if the effect addresses the fixture.
pub fn applies_to(
    effect: &SequencedEffect,
    fixture: &Fixture,
    groups: &BTreeMap<String, FixtureGroup>,
) -> bool {
    specificity(effect, fixture, groups).is_some()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::lighting::effects::{ChannelValue, TimeRange};
    use crate::lighting::fixture::{Calibration, Channel};

    use super::*;

    fn fixture() -> Fixture {
        Fixture::new(
            "left_spot".to_string(),
            Some("Spot 1".to_string()),
            1,
            1,
            [(Channel::Dimmer, 1)].into_iter().collect(),
            Default::default(),
            Calibration::default(),
            BTreeMap::new(),
        )
    }

    fn groups() -> BTreeMap<String, FixtureGroup> {
        let mut groups = BTreeMap::new();
        groups.insert(
            "spots".to_string(),
            FixtureGroup::new(
                "spots".to_string(),
                vec!["left_spot".to_string(), "right_spot".to_string()],
            ),
        );
        groups
    }

    fn effect(targets: Vec<&str>) -> SequencedEffect {
        let mut channels = BTreeMap::new();
        channels.insert(Channel::Dimmer, ChannelValue::Static(255));
        SequencedEffect::new(
            targets.into_iter().map(String::from).collect(),
            channels,
            TimeRange::new(0, 1000).expect("valid range"),
            "movement-handler",
        )
        .expect("valid effect")
    }

    #[test]
    fn test_matching_namespaces() {
        let fixture = fixture();
        let groups = groups();

        assert_eq!(
            Some(TargetSpecificity::Direct),
            specificity(&effect(vec!["left_spot"]), &fixture, &groups)
        );
        assert_eq!(
            Some(TargetSpecificity::Alias),
            specificity(&effect(vec!["Spot 1"]), &fixture, &groups)
        );
        assert_eq!(
            Some(TargetSpecificity::Group),
            specificity(&effect(vec!["spots"]), &fixture, &groups)
        );
        assert_eq!(
            Some(TargetSpecificity::All),
            specificity(&effect(vec!["ALL"]), &fixture, &groups)
        );
        assert_eq!(
            None,
            specificity(&effect(vec!["right_spot"]), &fixture, &groups)
        );
    }

    #[test]
    fn test_most_specific_match_wins() {
        let fixture = fixture();
        let groups = groups();

        // Listed as both a group member and directly; direct is reported.
        assert_eq!(
            Some(TargetSpecificity::Direct),
            specificity(&effect(vec!["spots", "left_spot"]), &fixture, &groups)
        );
        assert_eq!(
            Some(TargetSpecificity::Group),
            specificity(&effect(vec!["ALL", "spots"]), &fixture, &groups)
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let fixture = fixture();
        let groups = groups();

        assert!(!applies_to(&effect(vec!["LEFT_SPOT"]), &fixture, &groups));
        assert!(!applies_to(&effect(vec!["all"]), &fixture, &groups));
        assert!(applies_to(&effect(vec!["ALL"]), &fixture, &groups));
    }

    #[test]
    fn test_specificity_ordering() {
        assert!(TargetSpecificity::Direct > TargetSpecificity::Alias);
        assert!(TargetSpecificity::Alias > TargetSpecificity::Group);
        assert!(TargetSpecificity::Group > TargetSpecificity::All);
    }
}
