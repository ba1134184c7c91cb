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

use crate::lighting::curve::{CurveRef, CurveSpec};
use crate::lighting::effects::{ChannelEffect, ChannelPayload, ChannelValue, SequencedEffect};

/// Normalizes single-channel instructions into the common effect
/// representation: one effect per instruction, targeting exactly the
/// instruction's fixture. Total over any constructible [ChannelEffect].
pub fn normalize(channel_effects: &[ChannelEffect]) -> Vec<SequencedEffect> {
    channel_effects.iter().map(to_sequenced).collect()
}

fn to_sequenced(effect: &ChannelEffect) -> SequencedEffect {
    let value = match effect.payload() {
        ChannelPayload::Samples(samples) => {
            if samples.len() == 1 {
                ChannelValue::Static(samples[0])
            } else {
                // A multi-sample strip becomes a curve spread evenly over
                // the instruction's range, clamped to the strip's extremes.
                let clamp_min = samples.iter().min().copied().unwrap_or(0);
                let clamp_max = samples.iter().max().copied().unwrap_or(u8::MAX);
                ChannelValue::Curve(CurveRef::new(
                    CurveSpec::Samples(samples.clone()),
                    effect.range(),
                    clamp_min,
                    clamp_max,
                ))
            }
        }
        ChannelPayload::Curve(curve) => ChannelValue::Curve(curve.clone()),
    };

    let mut channels = BTreeMap::new();
    channels.insert(effect.channel(), value);

    SequencedEffect::new(
        vec![effect.fixture().to_string()],
        channels,
        effect.range(),
        effect.source(),
    )
    .expect("a channel effect always normalizes to a valid effect")
}
