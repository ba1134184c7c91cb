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

use std::fs;
use std::path::Path;

pub mod error;
pub mod rig;
pub mod show;

pub use error::ConfigError;
pub use rig::Rig;
pub use show::{SectionInstructions, Show};

/// Parses a rig definition from a YAML file.
pub fn parse_rig(file: &Path) -> Result<Rig, ConfigError> {
    Ok(serde_yml::from_str(&fs::read_to_string(file)?)?)
}

/// Parses show instructions from a YAML file.
pub fn parse_show(file: &Path) -> Result<Show, ConfigError> {
    Ok(serde_yml::from_str(&fs::read_to_string(file)?)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_rig_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Unable to create temp file");
        write!(
            file,
            r#"fixtures:
  left_spot:
    start_channel: 1
    channels:
      pan: 1
      tilt: 2
      dimmer: 3
"#
        )
        .expect("Unable to write temp file");

        let rig = parse_rig(file.path()).expect("Unable to parse rig");
        assert_eq!(1, rig.to_fixtures().len());
    }

    #[test]
    fn test_parse_show_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Unable to create temp file");
        write!(
            file,
            r#"sections:
  - name: intro
    start_ms: 0
    end_ms: 4000
"#
        )
        .expect("Unable to write temp file");

        let show = parse_show(file.path()).expect("Unable to parse show");
        let sections = show.to_sections().expect("valid sections");
        assert_eq!(1, sections.len());
        assert_eq!("intro", sections[0].name());
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_rig(Path::new("/nonexistent/rig.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("Unable to create temp file");
        write!(file, "fixtures: [not: a: mapping").expect("Unable to write temp file");

        let result = parse_rig(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
