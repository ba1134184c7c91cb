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

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use mshow::config;
use mshow::lighting::compiler::{Compiler, MergePolicy};
use mshow::lighting::curve::SampleStripEvaluator;
use mshow::lighting::effects::{DmxEffect, EffectKind};
use mshow::lighting::validation;
use mshow::util::duration_minutes_seconds;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A moving-head lighting show compiler."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the fixtures and groups defined in a rig configuration.
    Fixtures {
        /// The path to the rig configuration.
        rig: PathBuf,
    },
    /// Validates show instructions against a rig without compiling.
    Check {
        /// The path to the rig configuration.
        rig: PathBuf,
        /// The path to the show instructions.
        show: PathBuf,
    },
    /// Compiles show instructions into per-fixture control timelines.
    Compile {
        /// The path to the rig configuration.
        rig: PathBuf,
        /// The path to the show instructions.
        show: PathBuf,
        /// Writes the compiled timelines as JSON to the given path.
        #[clap(long)]
        output: Option<PathBuf>,
        /// Resolves channel conflicts by input order instead of target
        /// specificity.
        #[clap(long)]
        input_order: bool,
    },
}

/// One compiled section as written to the JSON dump.
#[derive(Serialize)]
struct CompiledSection<'a> {
    section: &'a str,
    effects: &'a [DmxEffect],
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fixtures { rig } => list_fixtures(&rig),
        Commands::Check { rig, show } => check(&rig, &show),
        Commands::Compile {
            rig,
            show,
            output,
            input_order,
        } => compile(&rig, &show, output.as_deref(), input_order),
    }
}

/// Lists the fixtures and groups in the rig.
fn list_fixtures(rig_path: &std::path::Path) -> Result<(), Box<dyn Error>> {
    let rig = config::parse_rig(rig_path)
        .map_err(|e| format!("error loading rig {}: {}", rig_path.display(), e))?;

    println!("Fixtures:");
    for (name, fixture) in rig.to_fixtures() {
        let alias = fixture
            .alias()
            .map(|alias| format!(" (alias {})", alias))
            .unwrap_or_default();
        println!(
            "- {}{}: universe {}, start channel {}, {} channels",
            name,
            alias,
            fixture.universe(),
            fixture.start_channel(),
            fixture.channels().len()
        );
    }

    println!("Groups:");
    for (name, group) in rig.to_groups() {
        println!("- {}: {}", name, group.fixtures().join(", "));
    }

    Ok(())
}

/// Validates the show instructions against the rig.
fn check(rig_path: &std::path::Path, show_path: &std::path::Path) -> Result<(), Box<dyn Error>> {
    let rig = config::parse_rig(rig_path)
        .map_err(|e| format!("error loading rig {}: {}", rig_path.display(), e))?;
    let show = config::parse_show(show_path)
        .map_err(|e| format!("error loading show {}: {}", show_path.display(), e))?;

    let fixtures = rig.to_fixtures();
    let groups = rig.to_groups();

    for section in show.to_sections()? {
        validation::validate_instructions(section.effects(), &fixtures, &groups)
            .map_err(|e| format!("section {}: {}", section.name(), e))?;
        println!(
            "Section {} ({}): OK",
            section.name(),
            duration_minutes_seconds(Duration::from_millis(section.range().duration_ms()))
        );
    }

    Ok(())
}

/// Compiles the show and prints a per-section summary.
fn compile(
    rig_path: &std::path::Path,
    show_path: &std::path::Path,
    output: Option<&std::path::Path>,
    input_order: bool,
) -> Result<(), Box<dyn Error>> {
    let rig = config::parse_rig(rig_path)
        .map_err(|e| format!("error loading rig {}: {}", rig_path.display(), e))?;
    let show = config::parse_show(show_path)
        .map_err(|e| format!("error loading show {}: {}", show_path.display(), e))?;

    let fixtures = rig.to_fixtures();
    let groups = rig.to_groups();
    let sections = show.to_sections()?;

    let policy = if input_order {
        MergePolicy::InputOrder
    } else {
        MergePolicy::SpecificityThenOrder
    };
    let compiler = Compiler::new(SampleStripEvaluator).with_merge_policy(policy);

    let mut compiled: Vec<(String, Vec<DmxEffect>)> = Vec::new();
    for section in &sections {
        validation::validate_instructions(section.effects(), &fixtures, &groups)
            .map_err(|e| format!("section {}: {}", section.name(), e))?;

        let effects = compiler.compile_section(
            section.effects(),
            section.channel_effects(),
            &fixtures,
            &groups,
            section.range(),
        );

        let gap_fills = effects
            .iter()
            .filter(|effect| effect.kind() == EffectKind::GapFill)
            .count();
        println!(
            "Section {} ({}): {} effects for {} fixtures ({} gap fills)",
            section.name(),
            duration_minutes_seconds(Duration::from_millis(section.range().duration_ms())),
            effects.len(),
            fixtures.len(),
            gap_fills
        );

        compiled.push((section.name().to_string(), effects));
    }

    info!(
        "Compiled {} section(s) for {} fixture(s)",
        sections.len(),
        fixtures.len()
    );

    if let Some(output) = output {
        let dump: Vec<CompiledSection> = compiled
            .iter()
            .map(|(section, effects)| CompiledSection {
                section,
                effects,
            })
            .collect();
        fs::write(output, serde_json::to_string_pretty(&dump)?)?;
        println!("Wrote compiled timelines to {}", output.display());
    }

    Ok(())
}
