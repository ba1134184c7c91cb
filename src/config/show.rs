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

use serde::Deserialize;

use crate::lighting::curve::{CurveRef, CurveSpec};
use crate::lighting::effects::{
    ChannelEffect, ChannelPayload, ChannelValue, SequencedEffect, TimeRange,
};
use crate::lighting::fixture::Channel;

use super::error::ConfigError;

/// A YAML representation of a show: per-section choreography instructions
/// as produced by the upstream resolvers.
#[derive(Deserialize, Clone)]
pub struct Show {
    /// The name of the show.
    name: Option<String>,

    /// The sections to compile, in order.
    sections: Vec<SectionConfig>,
}

/// A YAML representation of one bounded window of the show.
#[derive(Deserialize, Clone)]
pub struct SectionConfig {
    /// The name of the section.
    name: String,

    /// The inclusive start of the section.
    start_ms: u64,

    /// The exclusive end of the section.
    end_ms: u64,

    /// Movement-effect instructions.
    #[serde(default)]
    effects: Vec<EffectConfig>,

    /// Per-channel instructions.
    #[serde(default)]
    channel_effects: Vec<ChannelEffectConfig>,
}

/// A YAML representation of a movement effect.
#[derive(Deserialize, Clone)]
pub struct EffectConfig {
    /// The targets the effect addresses: fixture ids, aliases, groups, or
    /// the ALL sentinel.
    targets: Vec<String>,

    /// The inclusive start of the effect.
    start_ms: u64,

    /// The exclusive end of the effect.
    end_ms: u64,

    /// Per-channel values.
    channels: BTreeMap<Channel, ValueConfig>,

    /// The handler the instruction came from.
    source: Option<String>,

    /// Free-form metadata.
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// A YAML representation of a single-channel instruction.
#[derive(Deserialize, Clone)]
pub struct ChannelEffectConfig {
    /// The fixture the instruction addresses.
    fixture: String,

    /// The channel the instruction drives.
    channel: Channel,

    /// The inclusive start of the instruction.
    start_ms: u64,

    /// The exclusive end of the instruction.
    end_ms: u64,

    /// Discrete DMX samples spread evenly across the range.
    samples: Option<Vec<u8>>,

    /// A curve description.
    curve: Option<CurveConfig>,

    /// The handler the instruction came from.
    source: Option<String>,
}

/// A YAML representation of a channel value: a fixed DMX byte or a curve.
#[derive(Deserialize, Clone)]
pub struct ValueConfig {
    /// A fixed DMX value.
    value: Option<u8>,

    /// A curve description, evaluated downstream.
    curve: Option<CurveConfig>,
}

/// A YAML representation of a named parametric curve.
#[derive(Deserialize, Clone)]
pub struct CurveConfig {
    /// The curve name as the evaluator knows it.
    name: String,

    /// Curve parameters.
    #[serde(default)]
    params: BTreeMap<String, f64>,

    /// The lower output clamp. Defaults to 0.
    min: Option<u8>,

    /// The upper output clamp. Defaults to 255.
    max: Option<u8>,
}

/// One section's instructions, converted into the compiler's data model.
pub struct SectionInstructions {
    /// The name of the section.
    name: String,

    /// The section bounds.
    range: TimeRange,

    /// Movement effects.
    effects: Vec<SequencedEffect>,

    /// Per-channel effects.
    channel_effects: Vec<ChannelEffect>,
}

impl SectionInstructions {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the section bounds.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Gets the movement effects.
    pub fn effects(&self) -> &[SequencedEffect] {
        &self.effects
    }

    /// Gets the per-channel effects.
    pub fn channel_effects(&self) -> &[ChannelEffect] {
        &self.channel_effects
    }
}

impl Show {
    /// Gets the name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Converts the configuration into per-section instructions. Malformed
    /// instructions surface here, where the offending values are built.
    pub fn to_sections(&self) -> Result<Vec<SectionInstructions>, ConfigError> {
        self.sections
            .iter()
            .map(|section| section.to_instructions())
            .collect()
    }
}

impl SectionConfig {
    fn to_instructions(&self) -> Result<SectionInstructions, ConfigError> {
        let range = TimeRange::new(self.start_ms, self.end_ms)?;

        let effects = self
            .effects
            .iter()
            .map(|effect| effect.to_effect())
            .collect::<Result<Vec<SequencedEffect>, ConfigError>>()?;
        let channel_effects = self
            .channel_effects
            .iter()
            .map(|effect| effect.to_effect())
            .collect::<Result<Vec<ChannelEffect>, ConfigError>>()?;

        Ok(SectionInstructions {
            name: self.name.clone(),
            range,
            effects,
            channel_effects,
        })
    }
}

impl EffectConfig {
    fn to_effect(&self) -> Result<SequencedEffect, ConfigError> {
        let range = TimeRange::new(self.start_ms, self.end_ms)?;

        let mut channels = BTreeMap::new();
        for (&channel, value) in &self.channels {
            channels.insert(channel, value.to_channel_value(channel, range)?);
        }

        let effect = SequencedEffect::new(
            self.targets.clone(),
            channels,
            range,
            self.source.as_deref().unwrap_or("movement-handler"),
        )?;
        Ok(effect.with_metadata(self.metadata.clone()))
    }
}

impl ChannelEffectConfig {
    fn to_effect(&self) -> Result<ChannelEffect, ConfigError> {
        let range = TimeRange::new(self.start_ms, self.end_ms)?;

        let payload = match (&self.samples, &self.curve) {
            (Some(samples), None) => ChannelPayload::Samples(samples.clone()),
            (None, Some(curve)) => ChannelPayload::Curve(curve.to_curve(range)),
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "channel effect for {} {} must have exactly one of samples or curve",
                    self.fixture, self.channel
                )))
            }
        };

        Ok(ChannelEffect::new(
            self.fixture.clone(),
            self.channel,
            range,
            payload,
            self.source.as_deref().unwrap_or("channel-handler"),
        )?)
    }
}

impl ValueConfig {
    fn to_channel_value(
        &self,
        channel: Channel,
        range: TimeRange,
    ) -> Result<ChannelValue, ConfigError> {
        match (self.value, &self.curve) {
            (Some(value), None) => Ok(ChannelValue::Static(value)),
            (None, Some(curve)) => Ok(ChannelValue::Curve(curve.to_curve(range))),
            _ => Err(ConfigError::Invalid(format!(
                "channel {} must have exactly one of value or curve",
                channel
            ))),
        }
    }
}

impl CurveConfig {
    fn to_curve(&self, range: TimeRange) -> CurveRef {
        CurveRef::new(
            CurveSpec::Parametric {
                name: self.name.clone(),
                params: self.params.clone(),
            },
            range,
            self.min.unwrap_or(0),
            self.max.unwrap_or(u8::MAX),
        )
    }
}
