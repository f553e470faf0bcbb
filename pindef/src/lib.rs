// Licensed under the Apache-2.0 license

//! Vendor pin-definition sheet parser.
//!
//! This crate parses the tabular pin description exported from a vendor
//! pinout spreadsheet into a typed pin model. Each row of the sheet
//! describes one physical pad: its package position, multiplexed functions,
//! electrical io class, power domain and configuration-register addresses.
//! The result is an identifier-ordered [`model::PinSet`] suitable for
//! deterministic code generation.
//!
//! ## Usage
//!
//! ```no_run
//! use pinout_pindef::{parse_pins_file, RegionMap};
//!
//! let pins = parse_pins_file(
//!     std::path::Path::new("cv1800b_pindef.csv"),
//!     &RegionMap::default(),
//! )
//! .unwrap();
//! for pin in pins.iter() {
//!     println!("{} -> {}", pin.id, pin.name);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`reader`]: record reader for the quoted, newline-embedding sheet format
//! - [`model`]: the pin model ([`model::Pin`], [`model::PinSet`], regions)
//! - [`normalize`]: row normalization and secondary-mux correlation

pub mod model;
pub mod normalize;
pub mod reader;

// Re-export main public API
pub use model::{IoCfgDesc, IoType, MuxDesc, Pin, PinId, PinSet, Region, RegionAddress, RegionMap};
pub use normalize::{parse_pins, parse_pins_file};
pub use reader::Sheet;
