// Licensed under the Apache-2.0 license

//! Static electrical reference dataset and the per-chip table builder.
//!
//! The vendor characterizes each io class at its nominal supply voltages:
//! selectable pull-up and pull-down resistors, output drive strength
//! (open-circuit) steps and input schmitt-trigger thresholds. The dataset
//! is fixed for the pad library; which slices of it end up in a generated
//! driver depends on the io classes the chip's pin set actually uses.
//!
//! [`ElectricalTables`] is that chip-specific selection. It is built once
//! from the reference dataset and a [`PinSet`] and then consumed read-only
//! by the source emitter.

use anyhow::{bail, Result};
use pinout_pindef::model::{IoType, PinSet};

/// One selectable parameter step. The position within its table is the
/// register code; `value` is the physical quantity (ohms, microamps or
/// millivolts) and `label` its display form.
#[derive(Clone, Copy, Debug)]
pub struct MapEntry {
    pub label: &'static str,
    pub value: u32,
}

/// One row of the reference dataset: the parameter tables for one io class
/// at one nominal supply voltage.
#[derive(Clone, Copy, Debug)]
pub struct VddioEntry {
    pub io_type: IoType,
    pub voltage_mv: u32,
    pub pull_up: &'static [MapEntry],
    pub pull_down: &'static [MapEntry],
    pub oc: &'static [MapEntry],
    pub schmitt: &'static [MapEntry],
}

const fn entry(label: &'static str, value: u32) -> MapEntry {
    MapEntry { label, value }
}

const PULL_UP_1V8: &[MapEntry] = &[
    entry("79 kohm", 79000),
    entry("43 kohm", 43000),
    entry("22 kohm", 22000),
    entry("13 kohm", 13000),
];

const PULL_DOWN_1V8: &[MapEntry] = &[
    entry("87 kohm", 87000),
    entry("46 kohm", 46000),
    entry("24 kohm", 24000),
    entry("14 kohm", 14000),
];

const OC_1V8: &[MapEntry] = &[
    entry("3.8 mA", 3800),
    entry("6.7 mA", 6700),
    entry("9.7 mA", 9700),
    entry("12.7 mA", 12700),
];

const SCHMITT_1V8: &[MapEntry] = &[
    entry("disabled", 0),
    entry("0.25 V", 250),
    entry("0.40 V", 400),
];

const PULL_UP_3V3: &[MapEntry] = &[
    entry("60 kohm", 60000),
    entry("31 kohm", 31000),
    entry("16 kohm", 16000),
    entry("10 kohm", 10000),
];

const PULL_DOWN_3V3: &[MapEntry] = &[
    entry("62 kohm", 62000),
    entry("33 kohm", 33000),
    entry("17 kohm", 17000),
    entry("10 kohm", 10000),
];

const OC_3V3: &[MapEntry] = &[
    entry("5.4 mA", 5400),
    entry("9.5 mA", 9500),
    entry("13.6 mA", 13600),
    entry("17.7 mA", 17700),
];

const SCHMITT_3V3: &[MapEntry] = &[
    entry("disabled", 0),
    entry("0.56 V", 560),
    entry("0.90 V", 900),
];

const PULL_UP_AUDIO: &[MapEntry] = &[entry("88 kohm", 88000), entry("48 kohm", 48000)];

const PULL_DOWN_AUDIO: &[MapEntry] = &[entry("90 kohm", 90000), entry("50 kohm", 50000)];

const OC_AUDIO: &[MapEntry] = &[entry("2.9 mA", 2900), entry("5.8 mA", 5800)];

/// The vendor electrical characterization. Ethernet pads have no rows: the
/// MAC block owns their configuration, so every lookup for them is
/// unsupported.
pub const VDDIO_REFERENCE: &[VddioEntry] = &[
    VddioEntry {
        io_type: IoType::Io1v8Only,
        voltage_mv: 1800,
        pull_up: PULL_UP_1V8,
        pull_down: PULL_DOWN_1V8,
        oc: OC_1V8,
        schmitt: SCHMITT_1V8,
    },
    VddioEntry {
        io_type: IoType::Io1v8Or3v3,
        voltage_mv: 1800,
        pull_up: PULL_UP_1V8,
        pull_down: PULL_DOWN_1V8,
        oc: OC_1V8,
        schmitt: SCHMITT_1V8,
    },
    VddioEntry {
        io_type: IoType::Io1v8Or3v3,
        voltage_mv: 3300,
        pull_up: PULL_UP_3V3,
        pull_down: PULL_DOWN_3V3,
        oc: OC_3V3,
        schmitt: SCHMITT_3V3,
    },
    VddioEntry {
        io_type: IoType::Audio,
        voltage_mv: 1800,
        pull_up: PULL_UP_AUDIO,
        pull_down: PULL_DOWN_AUDIO,
        oc: OC_AUDIO,
        // Audio pads have no schmitt stage.
        schmitt: &[],
    },
];

/// The reference rows selected for one chip: those whose io class occurs in
/// the pin set.
#[derive(Debug)]
pub struct ElectricalTables {
    entries: Vec<&'static VddioEntry>,
}

impl ElectricalTables {
    /// Filter the reference dataset down to the io classes the pin set
    /// uses. A class with pins but no reference data cannot be rendered;
    /// for the dual-voltage class both nominal voltages must be present.
    pub fn for_pins(reference: &'static [VddioEntry], pins: &PinSet) -> Result<Self> {
        let present = pins.io_types();
        let entries: Vec<&'static VddioEntry> = reference
            .iter()
            .filter(|row| present.contains(&row.io_type))
            .collect();

        for io_type in &present {
            if *io_type == IoType::Eth {
                continue;
            }
            if !entries.iter().any(|row| row.io_type == *io_type) {
                bail!("unsupported io class {io_type}: no electrical reference data");
            }
        }
        if present.contains(&IoType::Io1v8Or3v3) {
            for mv in [1800, 3300] {
                if !entries
                    .iter()
                    .any(|row| row.io_type == IoType::Io1v8Or3v3 && row.voltage_mv == mv)
                {
                    bail!(
                        "unsupported io class {}: no {mv} mV electrical reference data",
                        IoType::Io1v8Or3v3
                    );
                }
            }
        }

        Ok(ElectricalTables { entries })
    }

    /// Selected rows, in reference-dataset order.
    pub fn entries(&self) -> &[&'static VddioEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct io classes among the selected rows, in dataset order.
    pub fn io_types(&self) -> Vec<IoType> {
        let mut seen = Vec::new();
        for row in &self.entries {
            if !seen.contains(&row.io_type) {
                seen.push(row.io_type);
            }
        }
        seen
    }

    /// How many voltages the dataset characterizes a class at.
    pub fn voltage_count(&self, io_type: IoType) -> usize {
        self.entries
            .iter()
            .filter(|row| row.io_type == io_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinout_pindef::model::{MuxDesc, Pin, PinId, RegionMap};
    use std::collections::BTreeMap;

    fn pin_of(id: u32, io_type: IoType) -> Pin {
        let regions = RegionMap::default();
        Pin {
            id: PinId::Linear(id),
            name: format!("P{id}"),
            io_type,
            power_domain: "VDD".to_string(),
            mux: MuxDesc {
                reg_name: "FMUX".to_string(),
                address: 0x0300_1004,
                reg: regions.resolve(0x0300_1004).unwrap(),
                default: 0,
                funcs: BTreeMap::from([(0, "X".to_string())]),
                max_index: 0,
            },
            sub_mux: None,
            io_cfg: None,
        }
    }

    fn set_of(io_types: &[IoType]) -> PinSet {
        let mut pins = PinSet::default();
        for (idx, io_type) in io_types.iter().enumerate() {
            pins.insert(pin_of(idx as u32 + 1, *io_type)).unwrap();
        }
        pins
    }

    #[test]
    fn test_filters_to_present_classes() {
        let pins = set_of(&[IoType::Io1v8Only, IoType::Eth]);
        let tables = ElectricalTables::for_pins(VDDIO_REFERENCE, &pins).unwrap();
        assert_eq!(tables.entries().len(), 1);
        assert_eq!(tables.entries()[0].io_type, IoType::Io1v8Only);
        assert_eq!(tables.io_types(), vec![IoType::Io1v8Only]);
    }

    #[test]
    fn test_dual_voltage_class_selects_both_rows() {
        let pins = set_of(&[IoType::Io1v8Or3v3]);
        let tables = ElectricalTables::for_pins(VDDIO_REFERENCE, &pins).unwrap();
        assert_eq!(tables.entries().len(), 2);
        assert_eq!(tables.voltage_count(IoType::Io1v8Or3v3), 2);
    }

    #[test]
    fn test_eth_only_chip_has_no_tables() {
        let pins = set_of(&[IoType::Eth]);
        let tables = ElectricalTables::for_pins(VDDIO_REFERENCE, &pins).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_missing_reference_rows_are_fatal() {
        let pins = set_of(&[IoType::Audio]);
        let err = ElectricalTables::for_pins(&[], &pins).unwrap_err();
        assert!(err.to_string().contains("no electrical reference data"));
    }

    #[test]
    fn test_dual_voltage_needs_both_voltages() {
        static PARTIAL: &[VddioEntry] = &[VddioEntry {
            io_type: IoType::Io1v8Or3v3,
            voltage_mv: 1800,
            pull_up: PULL_UP_1V8,
            pull_down: PULL_DOWN_1V8,
            oc: OC_1V8,
            schmitt: SCHMITT_1V8,
        }];
        let pins = set_of(&[IoType::Io1v8Or3v3]);
        let err = ElectricalTables::for_pins(PARTIAL, &pins).unwrap_err();
        assert!(err.to_string().contains("3300 mV"));
    }
}
