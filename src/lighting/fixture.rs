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

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of logical channels a moving-head fixture exposes.
///
/// Channel-keyed maps throughout the compiler are `BTreeMap`s keyed by this
/// enum, so iteration order is fixed and compiled output is deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Pan,
    PanFine,
    Tilt,
    TiltFine,
    Dimmer,
    Shutter,
    Color,
    Gobo,
}

impl Channel {
    /// Every channel, in pan/tilt-first order.
    pub const ALL: [Channel; 8] = [
        Channel::Pan,
        Channel::PanFine,
        Channel::Tilt,
        Channel::TiltFine,
        Channel::Dimmer,
        Channel::Shutter,
        Channel::Color,
        Channel::Gobo,
    ];

    /// Returns true if this channel is the fine half of a 16-bit pair.
    pub fn is_fine(&self) -> bool {
        matches!(self, Channel::PanFine | Channel::TiltFine)
    }

    /// Gets the fine companion of a coarse position channel, if it has one.
    pub fn fine(&self) -> Option<Channel> {
        match self {
            Channel::Pan => Some(Channel::PanFine),
            Channel::Tilt => Some(Channel::TiltFine),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Pan => "pan",
            Channel::PanFine => "pan_fine",
            Channel::Tilt => "tilt",
            Channel::TiltFine => "tilt_fine",
            Channel::Dimmer => "dimmer",
            Channel::Shutter => "shutter",
            Channel::Color => "color",
            Channel::Gobo => "gobo",
        };
        write!(f, "{}", name)
    }
}

/// Pan/tilt calibration: the DMX values that aim the head at its calibrated
/// forward position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// The pan value for the centered position.
    pan_center: u8,

    /// The tilt value for the centered position.
    tilt_center: u8,
}

impl Default for Calibration {
    fn default() -> Self {
        // Mid-range aims a typical head straight forward.
        Calibration {
            pan_center: 128,
            tilt_center: 128,
        }
    }
}

impl Calibration {
    /// Creates a new calibration.
    pub fn new(pan_center: u8, tilt_center: u8) -> Calibration {
        Calibration {
            pan_center,
            tilt_center,
        }
    }

    /// Gets the centered pan value.
    pub fn pan_center(&self) -> u8 {
        self.pan_center
    }

    /// Gets the centered tilt value.
    pub fn tilt_center(&self) -> u8 {
        self.tilt_center
    }
}

/// A moving-head fixture definition. The compiler reads this and never
/// mutates it.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// The name of the fixture.
    name: String,

    /// The alias a sequencing tool knows this fixture by, if any.
    alias: Option<String>,

    /// The universe.
    universe: u16,

    /// The start channel.
    start_channel: u16,

    /// Channel mappings: logical channel to offset within the fixture.
    channels: BTreeMap<Channel, u16>,

    /// Channels whose physical output is inverted.
    inverted: BTreeSet<Channel>,

    /// Pan/tilt calibration.
    calibration: Calibration,

    /// Configured default values, used before any instruction arrives.
    defaults: BTreeMap<Channel, u8>,
}

impl Fixture {
    /// Creates a new fixture.
    pub fn new(
        name: String,
        alias: Option<String>,
        universe: u16,
        start_channel: u16,
        channels: BTreeMap<Channel, u16>,
        inverted: BTreeSet<Channel>,
        calibration: Calibration,
        defaults: BTreeMap<Channel, u8>,
    ) -> Fixture {
        Fixture {
            name,
            alias,
            universe,
            start_channel,
            channels,
            inverted,
            calibration,
            defaults,
        }
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the alias.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Gets the universe.
    pub fn universe(&self) -> u16 {
        self.universe
    }

    /// Gets the start channel.
    pub fn start_channel(&self) -> u16 {
        self.start_channel
    }

    /// Gets the channel mappings.
    pub fn channels(&self) -> &BTreeMap<Channel, u16> {
        &self.channels
    }

    /// Gets the calibration.
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Returns true if the fixture's DMX mapping declares the channel.
    pub fn declares(&self, channel: Channel) -> bool {
        self.channels.contains_key(&channel)
    }

    /// Returns true if the channel's physical output is inverted.
    pub fn is_inverted(&self, channel: Channel) -> bool {
        self.inverted.contains(&channel)
    }

    /// The DMX value the fixture should hold for a channel when parked at
    /// soft home: head centered on its calibrated forward, dimmer off,
    /// shutter closed, color and gobo wheels open.
    pub fn soft_home_value(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Pan => self.calibration.pan_center,
            Channel::Tilt => self.calibration.tilt_center,
            Channel::PanFine
            | Channel::TiltFine
            | Channel::Dimmer
            | Channel::Shutter
            | Channel::Color
            | Channel::Gobo => 0,
        }
    }

    /// The configured default for a channel, falling back to soft home.
    pub fn default_value(&self, channel: Channel) -> u8 {
        self.defaults
            .get(&channel)
            .copied()
            .unwrap_or_else(|| self.soft_home_value(channel))
    }
}

/// A named collection of fixtures addressable as one semantic target.
#[derive(Debug, Clone)]
pub struct FixtureGroup {
    /// The name of the group.
    name: String,

    /// The fixtures in the group.
    fixtures: Vec<String>,
}

impl FixtureGroup {
    /// Creates a new group.
    pub fn new(name: String, fixtures: Vec<String>) -> FixtureGroup {
        FixtureGroup { name, fixtures }
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the fixtures.
    pub fn fixtures(&self) -> &Vec<String> {
        &self.fixtures
    }

    /// Returns true if the group contains the given fixture.
    pub fn contains(&self, fixture: &str) -> bool {
        self.fixtures.iter().any(|name| name == fixture)
    }
}
