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

/// Typed errors for effect construction. These surface where the offending
/// value is built, before anything reaches the compiler.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("Invalid timing: {0}")]
    Timing(String),

    #[error("Invalid target: {0}")]
    Target(String),

    #[error("Invalid channel data: {0}")]
    Channel(String),
}
