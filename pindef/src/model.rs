// Licensed under the Apache-2.0 license

//! The pin model produced by normalizing a vendor pin-definition sheet.
//!
//! The central entity is [`Pin`]; a chip's pins are collected in a
//! [`PinSet`], which keeps them keyed and ordered by identifier so that
//! everything derived from the set is reproducible byte for byte.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

use anyhow::{bail, Result};

/// Physical pin identifier.
///
/// QFN-style packages number their pins linearly; BGA packages address a
/// ball by row letter and column number. A single sheet only ever uses one
/// of the two shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PinId {
    Linear(u32),
    Matrix { row: char, col: u32 },
}

impl PinId {
    pub fn is_matrix(&self) -> bool {
        matches!(self, PinId::Matrix { .. })
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinId::Linear(num) => write!(f, "{num}"),
            PinId::Matrix { row, col } => write!(f, "{row}{col}"),
        }
    }
}

/// Electrical io class of a pad.
///
/// Display renders the enumerator name used by the pin-control driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IoType {
    /// Fixed 1.8 V pad.
    Io1v8Only,
    /// Dual-voltage pad; the power domain selects 1.8 V or 3.3 V at runtime.
    Io1v8Or3v3,
    /// Audio codec pad.
    Audio,
    /// Ethernet PHY pad, configured by the MAC block.
    Eth,
}

impl IoType {
    /// Whether the pad's electrical configuration lives in a dedicated
    /// io-config register (as opposed to the function block owning it).
    pub fn is_generated(&self) -> bool {
        matches!(self, IoType::Io1v8Only | IoType::Io1v8Or3v3)
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoType::Io1v8Only => "IO_TYPE_1V8_ONLY",
            IoType::Io1v8Or3v3 => "IO_TYPE_1V8_OR_3V3",
            IoType::Audio => "IO_TYPE_AUDIO",
            IoType::Eth => "IO_TYPE_ETH",
        };
        write!(f, "{name}")
    }
}

/// Memory-mapped register area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Sys,
    Rtc,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Sys => write!(f, "SYS"),
            Region::Rtc => write!(f, "RTC"),
        }
    }
}

/// A register address resolved against a [`RegionMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionAddress {
    pub region: Region,
    /// Byte offset from the region base.
    pub offset: u32,
}

/// The address ranges pin registers may live in.
///
/// Kept as an explicit value rather than a global so that resolution stays a
/// pure function of its inputs.
#[derive(Clone, Debug)]
pub struct RegionMap {
    regions: Vec<(Region, Range<u32>)>,
}

impl Default for RegionMap {
    fn default() -> Self {
        RegionMap {
            regions: vec![
                (Region::Sys, 0x0300_1000..0x0300_2000),
                (Region::Rtc, 0x0502_7000..0x0502_8000),
            ],
        }
    }
}

impl RegionMap {
    /// Resolve an absolute register address into (region, offset).
    pub fn resolve(&self, address: u32) -> Result<RegionAddress> {
        for (region, range) in &self.regions {
            if range.contains(&address) {
                return Ok(RegionAddress {
                    region: *region,
                    offset: address - range.start,
                });
            }
        }
        bail!("unmapped address {address:#010x}: outside every known register area");
    }
}

/// Function-select (multiplexing) register descriptor.
#[derive(Clone, Debug)]
pub struct MuxDesc {
    /// Register name as written in the sheet.
    pub reg_name: String,
    /// Absolute register address.
    pub address: u32,
    /// Address resolved into (region, offset).
    pub reg: RegionAddress,
    /// Selector value the pad resets to.
    pub default: u32,
    /// Selector index to function name. The index space may be sparse.
    pub funcs: BTreeMap<u8, String>,
    /// Highest selector index present in `funcs`; re-derived, never taken
    /// from the sheet.
    pub max_index: u8,
}

/// Electrical io-configuration register descriptor.
#[derive(Clone, Debug)]
pub struct IoCfgDesc {
    pub reg_name: String,
    pub address: u32,
    pub reg: RegionAddress,
}

/// One physical pad of the chip.
#[derive(Clone, Debug)]
pub struct Pin {
    pub id: PinId,
    /// Canonical pad name (vendor prefix and alternate-name suffix removed).
    pub name: String,
    pub io_type: IoType,
    /// Supply rail label; free text from the sheet.
    pub power_domain: String,
    /// Primary function-select descriptor. Always present.
    pub mux: MuxDesc,
    /// Secondary function-select descriptor, attached by correlation.
    pub sub_mux: Option<MuxDesc>,
    /// Io-configuration register; absent on pads whose function block owns
    /// the electrical setup.
    pub io_cfg: Option<IoCfgDesc>,
}

/// All pins of one chip, keyed and iterated by identifier.
#[derive(Debug, Default)]
pub struct PinSet {
    pins: BTreeMap<PinId, Pin>,
}

impl PinSet {
    /// Add a pin, rejecting duplicate identifiers and identifier-shape
    /// mixing (a sheet is either all-linear or all-matrix).
    pub fn insert(&mut self, pin: Pin) -> Result<()> {
        if let Some(first) = self.pins.keys().next() {
            if first.is_matrix() != pin.id.is_matrix() {
                bail!(
                    "pin {} mixes identifier shapes with pin {}",
                    pin.id,
                    first
                );
            }
        }
        match self.pins.entry(pin.id) {
            Entry::Occupied(_) => bail!("duplicate pin identifier {}", pin.id),
            Entry::Vacant(slot) => {
                slot.insert(pin);
                Ok(())
            }
        }
    }

    pub fn get_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.pins.get_mut(&id)
    }

    /// Pins in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Whether the set uses matrix (row/column) identifiers.
    pub fn has_matrix_ids(&self) -> bool {
        self.pins.keys().next().is_some_and(PinId::is_matrix)
    }

    /// Io classes present in the set.
    pub fn io_types(&self) -> BTreeSet<IoType> {
        self.pins.values().map(|pin| pin.io_type).collect()
    }

    /// Power-domain labels in order of first appearance over the
    /// identifier-ordered pins.
    pub fn power_domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = Vec::new();
        for pin in self.pins.values() {
            if !domains.contains(&pin.power_domain.as_str()) {
                domains.push(&pin.power_domain);
            }
        }
        domains
    }

    /// Length of the longest canonical pin name.
    pub fn max_name_len(&self) -> usize {
        self.pins
            .values()
            .map(|pin| pin.name.len())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(id: PinId) -> Pin {
        Pin {
            id,
            name: format!("PIN{id}"),
            io_type: IoType::Io1v8Only,
            power_domain: "VDDIO".to_string(),
            mux: MuxDesc {
                reg_name: "FMUX".to_string(),
                address: 0x0300_1004,
                reg: RegionAddress {
                    region: Region::Sys,
                    offset: 4,
                },
                default: 0,
                funcs: BTreeMap::from([(0, "GPIO".to_string())]),
                max_index: 0,
            },
            sub_mux: None,
            io_cfg: None,
        }
    }

    #[test]
    fn test_resolve_sys() {
        let map = RegionMap::default();
        let reg = map.resolve(0x0300_1004).unwrap();
        assert_eq!(reg.region, Region::Sys);
        assert_eq!(reg.offset, 0x4);
    }

    #[test]
    fn test_resolve_rtc() {
        let map = RegionMap::default();
        let reg = map.resolve(0x0502_7010).unwrap();
        assert_eq!(reg.region, Region::Rtc);
        assert_eq!(reg.offset, 0x10);
    }

    #[test]
    fn test_resolve_region_bounds() {
        let map = RegionMap::default();
        assert_eq!(map.resolve(0x0300_1000).unwrap().offset, 0);
        assert!(map.resolve(0x0300_2000).is_err());
        assert_eq!(map.resolve(0x0502_7fff).unwrap().offset, 0xfff);
        assert!(map.resolve(0x0502_8000).is_err());
    }

    #[test]
    fn test_resolve_unmapped() {
        let map = RegionMap::default();
        let err = map.resolve(0x0200_0000).unwrap_err();
        assert!(err.to_string().contains("unmapped address 0x02000000"));
    }

    #[test]
    fn test_pin_id_order() {
        assert!(PinId::Linear(3) < PinId::Linear(10));
        let a2 = PinId::Matrix { row: 'A', col: 2 };
        let a10 = PinId::Matrix { row: 'A', col: 10 };
        let b1 = PinId::Matrix { row: 'B', col: 1 };
        assert!(a2 < a10);
        assert!(a10 < b1);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let mut set = PinSet::default();
        set.insert(pin(PinId::Linear(3))).unwrap();
        let err = set.insert(pin(PinId::Linear(3))).unwrap_err();
        assert!(err.to_string().contains("duplicate pin identifier 3"));
    }

    #[test]
    fn test_mixed_identifier_shapes_rejected() {
        let mut set = PinSet::default();
        set.insert(pin(PinId::Linear(3))).unwrap();
        let err = set
            .insert(pin(PinId::Matrix { row: 'A', col: 4 }))
            .unwrap_err();
        assert!(err.to_string().contains("mixes identifier shapes"));
    }

    #[test]
    fn test_iteration_is_identifier_sorted() {
        let mut set = PinSet::default();
        for id in [7, 3, 5] {
            set.insert(pin(PinId::Linear(id))).unwrap();
        }
        let ids: Vec<_> = set.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![PinId::Linear(3), PinId::Linear(5), PinId::Linear(7)]
        );
    }

    #[test]
    fn test_power_domains_first_appearance() {
        let mut set = PinSet::default();
        for (id, domain) in [(3, "VDD_A"), (4, "VDD_B"), (5, "VDD_A")] {
            let mut p = pin(PinId::Linear(id));
            p.power_domain = domain.to_string();
            set.insert(p).unwrap();
        }
        assert_eq!(set.power_domains(), vec!["VDD_A", "VDD_B"]);
    }
}
