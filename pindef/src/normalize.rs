// Licensed under the Apache-2.0 license

//! Row normalization: one sheet record in, one typed [`Pin`] out.
//!
//! Rows whose identifier column carries the not-applicable sentinel are not
//! pins of their own; they describe a secondary function-select register and
//! are correlated back to the pin whose name appears in their note column
//! after all primary rows have been read.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use log::warn;
use regex::Regex;

use crate::model::{IoCfgDesc, IoType, MuxDesc, Pin, PinId, PinSet, RegionMap};
use crate::reader::{Row, Sheet};

/// Sentinel the sheet uses for cells that do not apply.
pub const NOT_APPLICABLE: &str = "#N/A";

const COL_PIN_NUM: &str = "Pin Num";
const COL_PIN_NAME: &str = "Pin Name";
const COL_IO_TYPE: &str = "IO Type";
const COL_POWER_DOMAIN: &str = "PowerDomain";
const COL_FMUX_REG: &str = "Function_select\n_register";
const COL_FMUX_DEFAULT: &str = "fmux_\ndefault";
const COL_DESCRIPTION: &str = "Description";
const COL_IO_CFG: &str = "IO_cfg_register";
const COL_NOTE: &str = "Note";

/// Pad name prefix the vendor puts on every row.
const NAME_PREFIX: &str = "PAD_";
/// Marker separating the canonical pad name from an alternate name.
const ALT_NAME_DELIM: &str = "__";
/// Width of the address literal packed at the end of a one-line register
/// cell (the sheet writes addresses as `0x0300_1004`).
const ADDR_LITERAL_WIDTH: usize = 11;

/// Selector entries in the free-text function description: `<digit> : <token>`.
static FUNC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d) *: *([^ ]+)").unwrap());

/// Parse a whole sheet into an identifier-ordered pin set.
pub fn parse_pins(text: &str, regions: &RegionMap) -> Result<PinSet> {
    let sheet = Sheet::parse(text)?;
    let mut pins = PinSet::default();
    let mut deferred = Vec::new();

    for row in sheet.rows() {
        if row.field(COL_PIN_NUM)? == NOT_APPLICABLE {
            deferred.push(row);
            continue;
        }
        let pin = normalize_row(&row, regions)
            .with_context(|| format!("record {}", row.record()))?;
        pins.insert(pin)?;
    }

    for row in deferred {
        correlate_row(&row, regions, &mut pins)
            .with_context(|| format!("record {}", row.record()))?;
    }

    Ok(pins)
}

/// [`parse_pins`] over a file on disk.
pub fn parse_pins_file(path: &Path, regions: &RegionMap) -> Result<PinSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_pins(&text, regions).with_context(|| format!("in {}", path.display()))
}

fn normalize_row(row: &Row<'_>, regions: &RegionMap) -> Result<Pin> {
    let id = parse_pin_id(row.field(COL_PIN_NUM)?)?;
    let name = canonical_name(row.field(COL_PIN_NAME)?);
    let io_type = classify_io_type(row.field(COL_IO_TYPE)?);
    let power_domain = row.field(COL_POWER_DOMAIN)?.to_string();

    let io_cfg = match row.field(COL_IO_CFG)? {
        NOT_APPLICABLE => None,
        cell => {
            let (reg_name, address) = parse_reg_cell(cell)?;
            Some(IoCfgDesc {
                reg: regions.resolve(address)?,
                reg_name,
                address,
            })
        }
    };
    if io_cfg.is_none() && io_type.is_generated() {
        warn!("pin {name}: {io_type} pad has no io-config register");
    }

    Ok(Pin {
        mux: parse_mux(row, regions)?,
        id,
        name,
        io_type,
        power_domain,
        sub_mux: None,
        io_cfg,
    })
}

/// Attach the secondary mux described by a deferred row to the one pin whose
/// canonical name occurs in the row's note. An empty or unmatched note is
/// informational only; more than one match means the sheet's names cannot be
/// told apart and is fatal.
fn correlate_row(row: &Row<'_>, regions: &RegionMap, pins: &mut PinSet) -> Result<()> {
    let note = row.field(COL_NOTE)?;
    if note.is_empty() {
        return Ok(());
    }

    let matches: Vec<(PinId, String)> = pins
        .iter()
        .filter(|pin| note.contains(pin.name.as_str()))
        .map(|pin| (pin.id, pin.name.clone()))
        .collect();

    match matches.as_slice() {
        [] => Ok(()),
        [(id, _)] => {
            let sub = parse_mux(row, regions)?;
            if let Some(pin) = pins.get_mut(*id) {
                pin.sub_mux = Some(sub);
            }
            Ok(())
        }
        many => {
            let names: Vec<&str> = many.iter().map(|(_, name)| name.as_str()).collect();
            bail!(
                "ambiguous note {note:?}: names more than one pin ({})",
                names.join(", ")
            );
        }
    }
}

fn parse_mux(row: &Row<'_>, regions: &RegionMap) -> Result<MuxDesc> {
    let (reg_name, address) = parse_reg_cell(row.field(COL_FMUX_REG)?)?;
    let default = parse_address_literal(row.field(COL_FMUX_DEFAULT)?)?;
    let funcs = parse_func_map(row.field(COL_DESCRIPTION)?)?;
    let max_index = funcs
        .keys()
        .copied()
        .max()
        .context("empty selector map")?;

    Ok(MuxDesc {
        reg: regions.resolve(address)?,
        reg_name,
        address,
        default,
        funcs,
        max_index,
    })
}

fn parse_pin_id(value: &str) -> Result<PinId> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let num = value
            .parse()
            .with_context(|| format!("malformed pin identifier {value:?}"))?;
        return Ok(PinId::Linear(num));
    }

    let mut chars = value.chars();
    let row = chars.next();
    let col = chars.as_str();
    match row {
        Some(row) if row.is_ascii_uppercase() && !col.is_empty() => {
            let col = col
                .parse()
                .with_context(|| format!("malformed pin identifier {value:?}"))?;
            Ok(PinId::Matrix { row, col })
        }
        _ => bail!("malformed pin identifier {value:?}"),
    }
}

/// Strip the vendor prefix, then cut at the alternate-name marker.
fn canonical_name(value: &str) -> String {
    let value = value.strip_prefix(NAME_PREFIX).unwrap_or(value);
    match value.find(ALT_NAME_DELIM) {
        Some(pos) => value[..pos].to_string(),
        None => value.to_string(),
    }
}

/// Ordered substring checks; the markers are not mutually exclusive in the
/// sheet text, so the order is part of the contract.
fn classify_io_type(value: &str) -> IoType {
    if value.contains("ETH") {
        IoType::Eth
    } else if value.contains("AUDIO") {
        IoType::Audio
    } else if value.contains("18OD33") {
        IoType::Io1v8Or3v3
    } else {
        IoType::Io1v8Only
    }
}

/// Integer literal as the sheet writes it: optional `0x`/`0o`/`0b` radix
/// prefix, underscores as grouping.
fn parse_address_literal(value: &str) -> Result<u32> {
    let lit = value.trim().replace('_', "");
    let parsed = if let Some(hex) = lit.strip_prefix("0x").or_else(|| lit.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(oct) = lit.strip_prefix("0o").or_else(|| lit.strip_prefix("0O")) {
        u32::from_str_radix(oct, 8)
    } else if let Some(bin) = lit.strip_prefix("0b").or_else(|| lit.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        lit.parse()
    };
    parsed.with_context(|| format!("malformed address literal {value:?}"))
}

/// A register cell names a register and its address, in one of exactly two
/// shapes the sheet export produces:
///
/// - two lines: the register name, then the address literal;
/// - one line: internal spaces removed, the trailing [`ADDR_LITERAL_WIDTH`]
///   characters are the address literal and the rest is the name.
///
/// Anything else is malformed; no further shape is ever guessed.
fn parse_reg_cell(value: &str) -> Result<(String, u32)> {
    let lines: Vec<&str> = value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    match lines.as_slice() {
        [name, addr] => Ok(((*name).to_string(), parse_address_literal(addr)?)),
        [line] => {
            let packed: String = line.chars().filter(|c| *c != ' ').collect();
            if packed.len() <= ADDR_LITERAL_WIDTH {
                bail!("malformed register cell {value:?}: no room for a name and an address");
            }
            let (name, addr) = packed.split_at(packed.len() - ADDR_LITERAL_WIDTH);
            Ok((name.to_string(), parse_address_literal(addr)?))
        }
        _ => bail!(
            "malformed register cell {value:?}: expected one or two lines, got {}",
            lines.len()
        ),
    }
}

fn parse_func_map(desc: &str) -> Result<BTreeMap<u8, String>> {
    let text = desc.replace('\n', " ");
    let mut funcs = BTreeMap::new();
    for cap in FUNC_PATTERN.captures_iter(&text) {
        let index: u8 = cap[1].parse()?;
        funcs.insert(index, cap[2].to_string());
    }
    if funcs.is_empty() {
        bail!("no selector functions in description {desc:?}");
    }
    Ok(funcs)
}
