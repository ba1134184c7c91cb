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

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::curve::CurveRef;
use super::fixture::{Channel, Fixture};

pub mod error;

pub use error::EffectError;

/// Sentinel target addressing every fixture in the rig.
pub const ALL_FIXTURES: &str = "ALL";

/// A half-open time range `[start_ms, end_ms)` in show milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeRange {
    start_ms: u64,
    end_ms: u64,
}

impl TimeRange {
    /// Creates a new range. The end must lie strictly after the start.
    pub fn new(start_ms: u64, end_ms: u64) -> Result<TimeRange, EffectError> {
        if end_ms <= start_ms {
            return Err(EffectError::Timing(format!(
                "range [{}, {}) must have a positive duration",
                start_ms, end_ms
            )));
        }
        Ok(TimeRange { start_ms, end_ms })
    }

    /// Gets the inclusive start instant.
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Gets the exclusive end instant.
    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    /// Gets the duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Returns true if the two half-open ranges share any instant.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Returns true if the instant falls within the range.
    pub fn contains(&self, at_ms: u64) -> bool {
        self.start_ms <= at_ms && at_ms < self.end_ms
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}ms, {}ms)", self.start_ms, self.end_ms)
    }
}

/// The resolved value of one logical channel: either a fixed DMX byte or a
/// value curve evaluated downstream.
///
/// Every physical channel, coarse and fine alike, carries one DMX byte; a
/// 16-bit pan/tilt position is expressed through the coarse/fine channel
/// pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelValue {
    Static(u8),
    Curve(CurveRef),
}

/// The channel values for one fixture over one time range.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChannelState {
    channels: BTreeMap<Channel, ChannelValue>,
}

impl ChannelState {
    /// Creates an empty channel state.
    pub fn new() -> ChannelState {
        ChannelState {
            channels: BTreeMap::new(),
        }
    }

    /// Sets a channel value.
    pub fn set(&mut self, channel: Channel, value: ChannelValue) {
        self.channels.insert(channel, value);
    }

    /// Gets a channel value.
    pub fn get(&self, channel: Channel) -> Option<&ChannelValue> {
        self.channels.get(&channel)
    }

    /// Gets all channel values, in fixed channel order.
    pub fn channels(&self) -> &BTreeMap<Channel, ChannelValue> {
        &self.channels
    }

    /// Gets the number of populated channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns true if no channel is populated.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns true if every channel the fixture declares is populated.
    pub fn is_complete_for(&self, fixture: &Fixture) -> bool {
        fixture
            .channels()
            .keys()
            .all(|channel| self.channels.contains_key(channel))
    }
}

impl FromIterator<(Channel, ChannelValue)> for ChannelState {
    fn from_iter<T: IntoIterator<Item = (Channel, ChannelValue)>>(iter: T) -> ChannelState {
        ChannelState {
            channels: iter.into_iter().collect(),
        }
    }
}

/// A targeted, time-ranged effect as produced by the upstream choreography
/// handlers. Targets may name fixtures, aliases, groups, or [ALL_FIXTURES].
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedEffect {
    /// The targets this effect addresses, in the order the handler listed
    /// them.
    targets: Vec<String>,

    /// Per-channel specifications. Channels left out are unspecified, not
    /// zeroed.
    channels: BTreeMap<Channel, ChannelValue>,

    /// The range the effect is active over.
    range: TimeRange,

    /// The handler that produced this effect.
    source: String,

    /// Free-form metadata attached by the handler.
    metadata: HashMap<String, String>,
}

impl SequencedEffect {
    /// Creates a new effect. Both the target list and the channel map must
    /// be non-empty.
    pub fn new(
        targets: Vec<String>,
        channels: BTreeMap<Channel, ChannelValue>,
        range: TimeRange,
        source: impl Into<String>,
    ) -> Result<SequencedEffect, EffectError> {
        if targets.is_empty() {
            return Err(EffectError::Target(
                "effect must name at least one target".to_string(),
            ));
        }
        if channels.is_empty() {
            return Err(EffectError::Channel(
                "effect must specify at least one channel".to_string(),
            ));
        }
        Ok(SequencedEffect {
            targets,
            channels,
            range,
            source: source.into(),
            metadata: HashMap::new(),
        })
    }

    /// Attaches free-form metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> SequencedEffect {
        self.metadata = metadata;
        self
    }

    /// Gets the targets.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Gets the per-channel specifications.
    pub fn channels(&self) -> &BTreeMap<Channel, ChannelValue> {
        &self.channels
    }

    /// Gets the active range.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Gets the producing handler.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the metadata.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

/// The value payload of a single-channel instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPayload {
    /// Discrete DMX samples spread evenly across the effect range.
    Samples(Vec<u8>),

    /// A reference to a value curve.
    Curve(CurveRef),
}

/// A single-channel instruction for one fixture, prior to normalization
/// into the common effect representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEffect {
    /// The fixture the instruction addresses.
    fixture: String,

    /// The channel the instruction drives.
    channel: Channel,

    /// The range the instruction is active over.
    range: TimeRange,

    /// The value payload.
    payload: ChannelPayload,

    /// The handler that produced this instruction.
    source: String,
}

impl ChannelEffect {
    /// Creates a new channel effect. Sample payloads must be non-empty.
    pub fn new(
        fixture: String,
        channel: Channel,
        range: TimeRange,
        payload: ChannelPayload,
        source: impl Into<String>,
    ) -> Result<ChannelEffect, EffectError> {
        if let ChannelPayload::Samples(samples) = &payload {
            if samples.is_empty() {
                return Err(EffectError::Channel(format!(
                    "channel effect for {} {} has no samples",
                    fixture, channel
                )));
            }
        }
        Ok(ChannelEffect {
            fixture,
            channel,
            range,
            payload,
            source: source.into(),
        })
    }

    /// Gets the fixture.
    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    /// Gets the channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Gets the active range.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Gets the value payload.
    pub fn payload(&self) -> &ChannelPayload {
        &self.payload
    }

    /// Gets the producing handler.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Provenance of a compiled effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// Derived from handler-produced effect instructions.
    HandlerDerived,

    /// Synthesized to cover a timeline hole.
    GapFill,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::HandlerDerived => write!(f, "handler-derived"),
            EffectKind::GapFill => write!(f, "gap-fill"),
        }
    }
}

/// A fully-specified effect for one fixture over one time range.
///
/// Every channel the fixture declares is populated, so the downstream
/// writer never needs defaults of its own. For one fixture and section the
/// compiled effects are non-overlapping and cover the section exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmxEffect {
    /// The fixture this effect drives.
    fixture: String,

    /// The range the effect covers.
    range: TimeRange,

    /// The complete channel state.
    channels: ChannelState,

    /// The component that produced this effect.
    source: String,

    /// Whether the effect is handler-derived or gap fill.
    kind: EffectKind,
}

impl DmxEffect {
    /// Creates a new compiled effect. Only the compiler builds these.
    pub(crate) fn new(
        fixture: String,
        range: TimeRange,
        channels: ChannelState,
        source: impl Into<String>,
        kind: EffectKind,
    ) -> DmxEffect {
        DmxEffect {
            fixture,
            range,
            channels,
            source: source.into(),
            kind,
        }
    }

    /// Gets the fixture.
    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    /// Gets the covered range.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Gets the channel state.
    pub fn channels(&self) -> &ChannelState {
        &self.channels
    }

    /// Gets the producing component.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the provenance kind.
    pub fn kind(&self) -> EffectKind {
        self.kind
    }
}
