// Licensed under the Apache-2.0 license

//! Pin-control driver source emitter.
//!
//! Renders, in order: the file banner and include block, the power-domain
//! enumeration and its display-name array, the electrical parameter tables
//! with their runtime accessor routines, the pin descriptor array, the
//! structured pin configuration array, and the driver registration
//! boilerplate.

use std::fmt::Write;

use pinout_pindef::model::{IoCfgDesc, IoType, Pin, PinSet, Region};

use crate::util::{c_ident, tab_pad, value_column, TAB_WIDTH};
use crate::vddio::{ElectricalTables, MapEntry, VddioEntry};

/// `\t` + `PINCTRL_PIN(PIN_` + the trailing `,`.
const PIN_DESC_DECORATION: usize = 25;

const PARAMS: [&str; 4] = ["pull_up", "pull_down", "oc", "schmitt"];

pub(crate) fn generate(chip: &str, year: u32, pins: &PinSet, tables: &ElectricalTables) -> String {
    let mut out = String::new();

    banner(&mut out, chip, year);
    writeln!(out).unwrap();
    power_domains(&mut out, chip, pins);
    writeln!(out).unwrap();
    if !tables.is_empty() {
        electrical_tables(&mut out, chip, tables);
        writeln!(out).unwrap();
    }
    pin_descriptors(&mut out, chip, pins);
    writeln!(out).unwrap();
    pin_data(&mut out, chip, pins);
    writeln!(out).unwrap();
    registration(&mut out, chip, !tables.is_empty());

    out
}

fn banner(out: &mut String, chip: &str, year: u32) {
    writeln!(out, "// SPDX-License-Identifier: GPL-2.0").unwrap();
    writeln!(out, "/*").unwrap();
    writeln!(out, " * Sophgo {} SoC pinctrl driver.", chip.to_uppercase()).unwrap();
    writeln!(out, " *").unwrap();
    writeln!(out, " * Copyright (C) {year} Sophgo Technology Inc.").unwrap();
    writeln!(out, " *").unwrap();
    writeln!(out, " * This file is generated from vendor pinout definition.").unwrap();
    writeln!(out, " */").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include <linux/err.h>").unwrap();
    writeln!(out, "#include <linux/module.h>").unwrap();
    writeln!(out, "#include <linux/platform_device.h>").unwrap();
    writeln!(out, "#include <linux/of.h>").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include <linux/pinctrl/pinctrl.h>").unwrap();
    writeln!(out, "#include <linux/pinctrl/pinmux.h>").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include <dt-bindings/pinctrl/pinctrl-{chip}.h>").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include \"pinctrl-cv18xx.h\"").unwrap();
}

fn power_domains(out: &mut String, chip: &str, pins: &PinSet) {
    let domains = pins.power_domains();
    let max_ident = domains
        .iter()
        .map(|domain| c_ident(domain).len())
        .max()
        .unwrap_or(0);

    writeln!(out, "enum {chip}_power_domain {{").unwrap();
    let column = value_column(max_ident, TAB_WIDTH);
    for (idx, domain) in domains.iter().enumerate() {
        let ident = c_ident(domain);
        let prefix_len = TAB_WIDTH + ident.len();
        writeln!(out, "\t{ident}{}= {idx},", tab_pad(column, prefix_len)).unwrap();
    }
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();

    writeln!(
        out,
        "static const char *const {chip}_power_domain_names[] = {{"
    )
    .unwrap();
    let column = value_column(max_ident + 2, TAB_WIDTH);
    for domain in &domains {
        let ident = c_ident(domain);
        let prefix_len = TAB_WIDTH + ident.len() + 2;
        writeln!(
            out,
            "\t[{ident}]{}= \"{domain}\",",
            tab_pad(column, prefix_len)
        )
        .unwrap();
    }
    writeln!(out, "}};").unwrap();
}

fn param_table(row: &VddioEntry, param: &str) -> &'static [MapEntry] {
    match param {
        "pull_up" => row.pull_up,
        "pull_down" => row.pull_down,
        "oc" => row.oc,
        _ => row.schmitt,
    }
}

fn electrical_tables(out: &mut String, chip: &str, tables: &ElectricalTables) {
    let mut first = true;
    for row in tables.entries() {
        for param in PARAMS {
            let entries = param_table(row, param);
            if entries.is_empty() {
                continue;
            }
            if !first {
                writeln!(out).unwrap();
            }
            first = false;

            let name = table_name(chip, tables, row, param);
            writeln!(out, "static const u32 {name}[] = {{").unwrap();
            for entry in entries {
                writeln!(out, "\t{},\t/* {} */", entry.value, entry.label).unwrap();
            }
            writeln!(out, "}};").unwrap();
        }
    }

    for param in PARAMS {
        writeln!(out).unwrap();
        accessor(out, chip, tables, param);
    }
}

fn class_tag(io_type: IoType) -> &'static str {
    match io_type {
        IoType::Io1v8Only => "io_1v8",
        IoType::Io1v8Or3v3 => "io_od",
        IoType::Audio => "audio",
        IoType::Eth => "eth",
    }
}

fn mv_tag(mv: u32) -> String {
    format!("{}v{}", mv / 1000, (mv % 1000) / 100)
}

/// Table symbol for one (class, voltage, parameter) slice. The voltage tag
/// only appears when the class is characterized at more than one voltage.
fn table_name(chip: &str, tables: &ElectricalTables, row: &VddioEntry, param: &str) -> String {
    let tag = class_tag(row.io_type);
    if tables.voltage_count(row.io_type) > 1 {
        format!("{chip}_{tag}_{}_{param}_map", mv_tag(row.voltage_mv))
    } else {
        format!("{chip}_{tag}_{param}_map")
    }
}

/// Runtime lookup routine for one parameter. Single-voltage classes return
/// their table directly; the dual-voltage class branches on the domain's
/// live voltage and rejects any state other than its two nominals. Classes
/// without the table fall through to the not-supported arm.
fn accessor(out: &mut String, chip: &str, tables: &ElectricalTables, param: &str) {
    let open = format!("static const u32 *{chip}_get_{param}_map(");
    let pad = continuation_pad(open.len());
    writeln!(out, "{open}enum cv1800_pin_io_type type,").unwrap();
    writeln!(out, "{pad}unsigned int vddio_mv,").unwrap();
    writeln!(out, "{pad}unsigned int *len)").unwrap();
    writeln!(out, "{{").unwrap();
    writeln!(out, "\tswitch (type) {{").unwrap();

    for io_type in tables.io_types() {
        let rows: Vec<&VddioEntry> = tables
            .entries()
            .iter()
            .copied()
            .filter(|row| row.io_type == io_type && !param_table(row, param).is_empty())
            .collect();
        if rows.is_empty() {
            continue;
        }

        writeln!(out, "\tcase {io_type}:").unwrap();
        if rows.len() == 1 {
            let name = table_name(chip, tables, rows[0], param);
            writeln!(out, "\t\t*len = ARRAY_SIZE({name});").unwrap();
            writeln!(out, "\t\treturn {name};").unwrap();
        } else {
            writeln!(out, "\t\tswitch (vddio_mv) {{").unwrap();
            for row in rows {
                let name = table_name(chip, tables, row, param);
                writeln!(out, "\t\tcase {}:", row.voltage_mv).unwrap();
                writeln!(out, "\t\t\t*len = ARRAY_SIZE({name});").unwrap();
                writeln!(out, "\t\t\treturn {name};").unwrap();
            }
            writeln!(out, "\t\tdefault:").unwrap();
            writeln!(out, "\t\t\treturn ERR_PTR(-EINVAL);").unwrap();
            writeln!(out, "\t\t}}").unwrap();
        }
    }

    writeln!(out, "\tdefault:").unwrap();
    writeln!(out, "\t\treturn ERR_PTR(-ENOTSUPP);").unwrap();
    writeln!(out, "\t}}").unwrap();
    writeln!(out, "}}").unwrap();
}

fn continuation_pad(column: usize) -> String {
    let mut pad = "\t".repeat(column / TAB_WIDTH);
    pad.push_str(&" ".repeat(column % TAB_WIDTH));
    pad
}

fn pin_descriptors(out: &mut String, chip: &str, pins: &PinSet) {
    writeln!(
        out,
        "static const struct pinctrl_pin_desc {chip}_pins[] = {{"
    )
    .unwrap();
    let column = value_column(pins.max_name_len(), PIN_DESC_DECORATION);
    for pin in pins.iter() {
        let prefix_len = pin.name.len() + PIN_DESC_DECORATION;
        writeln!(
            out,
            "\tPINCTRL_PIN(PIN_{0},{1}\"{0}\"),",
            pin.name,
            tab_pad(column, prefix_len)
        )
        .unwrap();
    }
    writeln!(out, "}};").unwrap();
}

fn pin_data(out: &mut String, chip: &str, pins: &PinSet) {
    writeln!(
        out,
        "static const struct cv1800_pin {chip}_pin_data[ARRAY_SIZE({chip}_pins)] = {{"
    )
    .unwrap();
    for pin in pins.iter() {
        match (pin.io_type.is_generated(), &pin.io_cfg) {
            (true, Some(io_cfg)) => generated_pin(out, pin, io_cfg),
            // Function-block pads, and generated pads whose io-config
            // register is missing from the sheet (warned at parse time).
            _ => func_pin(out, pin),
        }
    }
    writeln!(out, "}};").unwrap();
}

fn conf_area(region: Region) -> &'static str {
    match region {
        Region::Sys => "CV1800_PINCONF_AREA_SYS",
        Region::Rtc => "CV1800_PINCONF_AREA_RTC",
    }
}

fn func_pin(out: &mut String, pin: &Pin) {
    writeln!(
        out,
        "\tCV1800_FUNC_PIN(PIN_{}, \"{}\",",
        pin.name, pin.power_domain
    )
    .unwrap();
    writeln!(out, "\t\t\t{},", pin.io_type).unwrap();
    writeln!(
        out,
        "\t\t\t{}, {:#05x}, {}),",
        conf_area(pin.mux.reg.region),
        pin.mux.reg.offset,
        pin.mux.max_index
    )
    .unwrap();
}

fn generated_pin(out: &mut String, pin: &Pin, io_cfg: &IoCfgDesc) {
    if let Some(sub) = &pin.sub_mux {
        writeln!(
            out,
            "\tCV1800_GENERATE_PIN_MUX2(PIN_{}, \"{}\",",
            pin.name, pin.power_domain
        )
        .unwrap();
        writeln!(out, "\t\t\t\t {},", pin.io_type).unwrap();
        writeln!(
            out,
            "\t\t\t\t {}, {:#05x}, {},",
            conf_area(pin.mux.reg.region),
            pin.mux.reg.offset,
            pin.mux.max_index
        )
        .unwrap();
        writeln!(
            out,
            "\t\t\t\t {}, {:#05x}, {},",
            conf_area(sub.reg.region),
            sub.reg.offset,
            sub.max_index
        )
        .unwrap();
        writeln!(
            out,
            "\t\t\t\t {}, {:#05x}),",
            conf_area(io_cfg.reg.region),
            io_cfg.reg.offset
        )
        .unwrap();
    } else {
        writeln!(
            out,
            "\tCV1800_GENERAL_PIN(PIN_{}, \"{}\",",
            pin.name, pin.power_domain
        )
        .unwrap();
        writeln!(out, "\t\t\t   {},", pin.io_type).unwrap();
        writeln!(
            out,
            "\t\t\t   {}, {:#05x}, {},",
            conf_area(pin.mux.reg.region),
            pin.mux.reg.offset,
            pin.mux.max_index
        )
        .unwrap();
        writeln!(
            out,
            "\t\t\t   {}, {:#05x}),",
            conf_area(io_cfg.reg.region),
            io_cfg.reg.offset
        )
        .unwrap();
    }
}

fn registration(out: &mut String, chip: &str, has_vddio: bool) {
    if has_vddio {
        writeln!(
            out,
            "static const struct cv1800_vddio_ops {chip}_vddio_ops = {{"
        )
        .unwrap();
        for param in PARAMS {
            writeln!(out, "\t.get_{param}_map = {chip}_get_{param}_map,").unwrap();
        }
        writeln!(out, "}};").unwrap();
        writeln!(out).unwrap();
    }

    writeln!(
        out,
        "static const struct cv1800_pinctrl_data {chip}_pindata = {{"
    )
    .unwrap();
    writeln!(out, "\t.pins = {chip}_pins,").unwrap();
    writeln!(out, "\t.pindata = {chip}_pin_data,").unwrap();
    writeln!(out, "\t.pdnames = {chip}_power_domain_names,").unwrap();
    if has_vddio {
        writeln!(out, "\t.vddio_ops = &{chip}_vddio_ops,").unwrap();
    }
    writeln!(out, "\t.npins = ARRAY_SIZE({chip}_pins),").unwrap();
    writeln!(out, "\t.npd = ARRAY_SIZE({chip}_power_domain_names),").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "static const struct of_device_id {chip}_pinctrl_ids[] = {{"
    )
    .unwrap();
    writeln!(
        out,
        "\t{{ .compatible = \"sophgo,{chip}-pinctrl\", .data = &{chip}_pindata }},"
    )
    .unwrap();
    writeln!(out, "\t{{ }}").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out, "MODULE_DEVICE_TABLE(of, {chip}_pinctrl_ids);").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "static struct platform_driver {chip}_pinctrl_driver = {{"
    )
    .unwrap();
    writeln!(out, "\t.probe\t= cv1800_pinctrl_probe,").unwrap();
    writeln!(out, "\t.driver\t= {{").unwrap();
    writeln!(out, "\t\t.name\t\t\t= \"{chip}-pinctrl\",").unwrap();
    writeln!(out, "\t\t.suppress_bind_attrs\t= true,").unwrap();
    writeln!(out, "\t\t.of_match_table\t\t= {chip}_pinctrl_ids,").unwrap();
    writeln!(out, "\t}},").unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out, "module_platform_driver({chip}_pinctrl_driver);").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "MODULE_DESCRIPTION(\"Pinctrl driver for the {} series SoC\");",
        chip.to_uppercase()
    )
    .unwrap();
    writeln!(out, "MODULE_LICENSE(\"GPL\");").unwrap();
}
