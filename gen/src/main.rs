// Licensed under the Apache-2.0 license

//! Command-line driver: sheet in, binding header and driver source out.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use pinout_generator::{generate_binding_header, generate_pinctrl_source};
use pinout_pindef::{parse_pins_file, RegionMap};

#[derive(Parser, Debug)]
#[command(
    name = "pinout-gen",
    author,
    version,
    about = "Generate pinctrl driver tables from a vendor pin-definition sheet"
)]
struct Cli {
    /// Chip identifier (e.g. cv1800b); selects <chip>_pindef.csv as input
    /// and pinctrl-<chip>.h/.c as outputs
    chip: String,
}

/// Write through a temporary file in the destination directory so a failed
/// run never leaves a complete-looking artifact behind.
fn write_output(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;
    file.write_all(contents.as_bytes())?;
    file.persist(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;
    let cli = Cli::parse();

    let input = format!("{}_pindef.csv", cli.chip);
    let pins = parse_pins_file(Path::new(&input), &RegionMap::default())?;
    info!("parsed {} pins from {}", pins.len(), input);

    let year = chrono::Local::now().year() as u32;
    let header = generate_binding_header(&cli.chip, year, &pins);
    let source = generate_pinctrl_source(&cli.chip, year, &pins)?;

    let header_path = format!("pinctrl-{}.h", cli.chip);
    let source_path = format!("pinctrl-{}.c", cli.chip);
    write_output(Path::new(&header_path), &header)?;
    write_output(Path::new(&source_path), &source)?;
    info!("wrote {header_path} and {source_path}");

    Ok(())
}
