// Licensed under the Apache-2.0 license

//! Device-tree binding header emitter.
//!
//! Renders the include-guarded `PIN_*` constant block. Matrix-numbered
//! packages get a `PINPOS` helper macro packing (row, column) into one
//! value; linear packages bind the plain pin number.

use std::fmt::Write;

use pinout_pindef::model::{PinId, PinSet};

use crate::util::{tab_pad, value_column};

/// `#define ` plus the `PIN_` symbol prefix.
const DEFINE_DECORATION: usize = 12;

pub(crate) fn generate(chip: &str, year: u32, pins: &PinSet) -> String {
    let mut out = String::new();
    let guard = format!("_DT_BINDINGS_PINCTRL_{}_H", chip.to_uppercase());

    banner(&mut out, year);
    writeln!(out, "#ifndef {guard}").unwrap();
    writeln!(out, "#define {guard}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "#include <dt-bindings/pinctrl/pinctrl-cv18xx.h>").unwrap();
    writeln!(out).unwrap();

    if pins.has_matrix_ids() {
        out.push_str("#define PINPOS(row, col)\t\t\t\\\n");
        out.push_str("\t((((row) - 'A' + 1) << 8) + ((col) - 1))\n");
        writeln!(out).unwrap();
    }

    pin_defines(&mut out, pins);

    writeln!(out).unwrap();
    writeln!(out, "#endif /* {guard} */").unwrap();
    out
}

fn banner(out: &mut String, year: u32) {
    writeln!(out, "/* SPDX-License-Identifier: GPL-2.0-only OR BSD-2-Clause */").unwrap();
    writeln!(out, "/*").unwrap();
    writeln!(out, " * Copyright (C) {year} Sophgo Technology Inc.").unwrap();
    writeln!(out, " *").unwrap();
    writeln!(out, " * This file is generated from vendor pinout definition.").unwrap();
    writeln!(out, " */").unwrap();
    writeln!(out).unwrap();
}

fn pin_defines(out: &mut String, pins: &PinSet) {
    let column = value_column(pins.max_name_len(), DEFINE_DECORATION);
    for pin in pins.iter() {
        let prefix = format!("#define PIN_{}", pin.name);
        let value = match pin.id {
            PinId::Linear(num) => num.to_string(),
            PinId::Matrix { row, col } => format!("PINPOS('{row}', {col})"),
        };
        writeln!(out, "{prefix}{}{value}", tab_pad(column, prefix.len())).unwrap();
    }
}
