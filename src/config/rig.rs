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

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::lighting::fixture::{Calibration, Channel, Fixture, FixtureGroup};

/// A YAML representation of the rig configuration.
#[derive(Deserialize, Clone)]
pub struct Rig {
    /// Fixture definitions keyed by fixture id.
    fixtures: HashMap<String, FixtureConfig>,

    /// Group definitions: group name to member fixture ids.
    groups: Option<HashMap<String, Vec<String>>>,
}

/// A YAML representation of one moving-head fixture.
#[derive(Deserialize, Clone)]
pub struct FixtureConfig {
    /// The name a sequencing tool knows the fixture by.
    alias: Option<String>,

    /// The DMX universe. Defaults to 1.
    universe: Option<u16>,

    /// The fixture's first DMX channel.
    start_channel: u16,

    /// Channel mappings: logical channel to offset within the fixture.
    channels: BTreeMap<Channel, u16>,

    /// Channels whose physical output is inverted.
    inverted: Option<Vec<Channel>>,

    /// Pan/tilt calibration.
    calibration: Option<CalibrationConfig>,

    /// Default channel values used before any instruction arrives.
    defaults: Option<BTreeMap<Channel, u8>>,
}

/// Pan/tilt calibration values for the centered-forward position.
#[derive(Deserialize, Clone, Copy)]
pub struct CalibrationConfig {
    pan_center: Option<u8>,

    tilt_center: Option<u8>,
}

impl Rig {
    /// Converts the configuration into the fixture model.
    pub fn to_fixtures(&self) -> BTreeMap<String, Fixture> {
        self.fixtures
            .iter()
            .map(|(name, config)| (name.clone(), config.to_fixture(name)))
            .collect()
    }

    /// Converts the configuration into fixture groups.
    pub fn to_groups(&self) -> BTreeMap<String, FixtureGroup> {
        self.groups
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|(name, fixtures)| (name.clone(), FixtureGroup::new(name, fixtures)))
            .collect()
    }
}

impl FixtureConfig {
    /// Converts the configuration into a fixture.
    fn to_fixture(&self, name: &str) -> Fixture {
        let calibration = match self.calibration {
            Some(calibration) => Calibration::new(
                calibration.pan_center.unwrap_or(128),
                calibration.tilt_center.unwrap_or(128),
            ),
            None => Calibration::default(),
        };
        let inverted: BTreeSet<Channel> = self
            .inverted
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect();

        Fixture::new(
            name.to_string(),
            self.alias.clone(),
            self.universe.unwrap_or(1),
            self.start_channel,
            self.channels.clone(),
            inverted,
            calibration,
            self.defaults.clone().unwrap_or_default(),
        )
    }
}
