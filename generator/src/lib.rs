// Licensed under the Apache-2.0 license

//! Pin-control code generator.
//!
//! Turns a normalized [`PinSet`] into the two artifacts a pin-control
//! driver needs: the device-tree binding header of `PIN_*` constants and
//! the driver source file with its multiplexing and electrical tables.
//! Both renderings are pure functions of their inputs, so regenerating
//! from the same sheet yields byte-identical files.
//!
//! ## Usage
//!
//! ```no_run
//! use pinout_generator::{generate_binding_header, generate_pinctrl_source};
//! use pinout_pindef::{parse_pins_file, RegionMap};
//!
//! let pins = parse_pins_file(
//!     std::path::Path::new("cv1800b_pindef.csv"),
//!     &RegionMap::default(),
//! )
//! .unwrap();
//! let header = generate_binding_header("cv1800b", 2026, &pins);
//! let source = generate_pinctrl_source("cv1800b", 2026, &pins).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`util`]: tab-stop alignment engine and identifier helpers
//! - [`vddio`]: the electrical reference dataset and per-chip table builder
//! - `header`, `source`: the two artifact emitters

pub mod util;
pub mod vddio;

mod header;
mod source;

use anyhow::Result;
use pinout_pindef::model::PinSet;

pub use vddio::{ElectricalTables, MapEntry, VddioEntry, VDDIO_REFERENCE};

/// Render the device-tree binding header (`pinctrl-<chip>.h`).
pub fn generate_binding_header(chip: &str, year: u32, pins: &PinSet) -> String {
    header::generate(chip, year, pins)
}

/// Render the driver source (`pinctrl-<chip>.c`), deriving the electrical
/// tables for the io classes the pin set uses.
pub fn generate_pinctrl_source(chip: &str, year: u32, pins: &PinSet) -> Result<String> {
    let tables = ElectricalTables::for_pins(VDDIO_REFERENCE, pins)?;
    Ok(source::generate(chip, year, pins, &tables))
}
