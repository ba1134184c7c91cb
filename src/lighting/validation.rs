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

use std::collections::{BTreeMap, HashSet};
use std::error::Error;

use super::effects::{SequencedEffect, ALL_FIXTURES};
use super::fixture::{Fixture, FixtureGroup};

/// Validation result containing information about the validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// All targets referenced by the instructions.
    pub targets: HashSet<String>,

    /// Referenced targets that match no fixture, alias, or group.
    pub unknown_targets: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no unknown targets).
    pub fn is_valid(&self) -> bool {
        self.unknown_targets.is_empty()
    }
}

/// Collects every target name referenced by the given effects.
pub fn collect_targets(effects: &[SequencedEffect]) -> HashSet<String> {
    let mut targets = HashSet::new();
    for effect in effects {
        for target in effect.targets() {
            targets.insert(target.clone());
        }
    }
    targets
}

/// Validates that every referenced target resolves to a fixture id, an
/// alias, a group, or the ALL sentinel.
pub fn validate_targets(
    effects: &[SequencedEffect],
    fixtures: &BTreeMap<String, Fixture>,
    groups: &BTreeMap<String, FixtureGroup>,
) -> ValidationResult {
    let targets = collect_targets(effects);

    let mut known: HashSet<String> = fixtures.keys().cloned().collect();
    known.extend(
        fixtures
            .values()
            .filter_map(|fixture| fixture.alias().map(str::to_string)),
    );
    known.extend(groups.keys().cloned());
    known.insert(ALL_FIXTURES.to_string());

    let mut unknown_targets: Vec<String> = targets
        .iter()
        .filter(|target| !known.contains(*target))
        .cloned()
        .collect();
    // Sorted so validation failures read the same every run.
    unknown_targets.sort();

    ValidationResult {
        targets,
        unknown_targets,
    }
}

/// Validates the instructions and returns an error if validation fails.
/// This is the main validation function that should be used before
/// compiling a show.
pub fn validate_instructions(
    effects: &[SequencedEffect],
    fixtures: &BTreeMap<String, Fixture>,
    groups: &BTreeMap<String, FixtureGroup>,
) -> Result<(), Box<dyn Error>> {
    let result = validate_targets(effects, fixtures, groups);

    if !result.is_valid() {
        let mut error_msg = format!(
            "Instruction validation failed: {} unknown target(s) referenced",
            result.unknown_targets.len()
        );
        for target in &result.unknown_targets {
            error_msg.push_str(&format!("\n  - {} (not found in rig)", target));
        }
        return Err(error_msg.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::lighting::effects::{ChannelValue, TimeRange};
    use crate::lighting::fixture::{Calibration, Channel};

    use super::*;

    fn rig() -> (BTreeMap<String, Fixture>, BTreeMap<String, FixtureGroup>) {
        let mut fixtures = BTreeMap::new();
        for (name, alias) in [("left_spot", Some("Spot 1")), ("right_spot", None)] {
            fixtures.insert(
                name.to_string(),
                Fixture::new(
                    name.to_string(),
                    alias.map(String::from),
                    1,
                    1,
                    [(Channel::Dimmer, 1)].into_iter().collect(),
                    Default::default(),
                    Calibration::default(),
                    BTreeMap::new(),
                ),
            );
        }

        let mut groups = BTreeMap::new();
        groups.insert(
            "spots".to_string(),
            FixtureGroup::new(
                "spots".to_string(),
                vec!["left_spot".to_string(), "right_spot".to_string()],
            ),
        );

        (fixtures, groups)
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
    fn test_collect_targets() {
        let effects = vec![
            effect(vec!["left_spot", "spots"]),
            effect(vec!["spots", "ALL"]),
        ];
        let targets = collect_targets(&effects);

        assert_eq!(3, targets.len());
        assert!(targets.contains("left_spot"));
        assert!(targets.contains("spots"));
        assert!(targets.contains("ALL"));
    }

    #[test]
    fn test_validate_known_targets() {
        let (fixtures, groups) = rig();
        let effects = vec![effect(vec!["left_spot", "Spot 1", "spots", "ALL"])];
        let result = validate_targets(&effects, &fixtures, &groups);

        assert!(result.is_valid());
        assert_eq!(4, result.targets.len());
    }

    #[test]
    fn test_validate_unknown_targets() {
        let (fixtures, groups) = rig();
        let effects = vec![effect(vec!["left_spot", "center_wash", "blinders"])];
        let result = validate_targets(&effects, &fixtures, &groups);

        assert!(!result.is_valid());
        assert_eq!(
            vec!["blinders".to_string(), "center_wash".to_string()],
            result.unknown_targets
        );
    }

    #[test]
    fn test_validate_instructions_error_message() {
        let (fixtures, groups) = rig();
        let effects = vec![effect(vec!["center_wash"])];
        let result = validate_instructions(&effects, &fixtures, &groups);

        assert!(result.is_err());
        let error_msg = result.expect_err("validation should fail").to_string();
        assert!(error_msg.contains("1 unknown target(s)"));
        assert!(error_msg.contains("center_wash"));
    }

    #[test]
    fn test_validate_empty_instructions() {
        let (fixtures, groups) = rig();
        assert!(validate_instructions(&[], &fixtures, &groups).is_ok());
    }
}
