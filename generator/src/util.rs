// Licensed under the Apache-2.0 license

//! Text-layout helpers shared by the emitters.
//!
//! The emitted sources line their values up at a common column using tab
//! characters, the way the hand-written driver files in the same directory
//! do. [`value_column`] picks the column for a whole block; [`tab_pad`]
//! produces the padding for one line of it.

/// Width of one tab stop in the emitted sources.
pub const TAB_WIDTH: usize = 8;

/// Leftmost column a value may start at, regardless of name lengths.
pub const MIN_VALUE_COLUMN: usize = 40;

/// Column at which every value of an aligned block starts: the widest
/// name-plus-decoration advanced to the next tab stop, floored at
/// [`MIN_VALUE_COLUMN`]. Advancing always moves past the widest line, so
/// even that line keeps at least one tab before its value.
pub fn value_column(max_name_len: usize, decoration: usize) -> usize {
    let len = max_name_len + decoration;
    if len < MIN_VALUE_COLUMN {
        MIN_VALUE_COLUMN
    } else {
        len + (TAB_WIDTH - len % TAB_WIDTH)
    }
}

/// Tabs advancing a line from `prefix_len` to `column`.
pub fn tab_pad(column: usize, prefix_len: usize) -> String {
    "\t".repeat((column - prefix_len).div_ceil(TAB_WIDTH))
}

/// Uppercase C identifier for a free-text label.
pub fn c_ident(label: &str) -> String {
    let mut out = String::new();
    if label.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_column_floor() {
        // Short names stay at the floor.
        assert_eq!(value_column(7, 12), 40);
        assert_eq!(value_column(27, 12), 40);
    }

    #[test]
    fn test_value_column_next_tab_stop() {
        assert_eq!(value_column(31, 12), 48);
        assert_eq!(value_column(35, 12), 48);
        // An exact multiple still advances one full stop.
        assert_eq!(value_column(36, 12), 56);
    }

    #[test]
    fn test_tab_pad() {
        assert_eq!(tab_pad(40, 19), "\t\t\t");
        assert_eq!(tab_pad(40, 32), "\t");
        assert_eq!(tab_pad(40, 33), "\t");
        assert_eq!(tab_pad(40, 39), "\t");
    }

    #[test]
    fn test_aligned_block_shares_a_column() {
        let names = ["A", "LONG_NAME", "MIDDLE"];
        let deco = 12;
        let column = value_column(names.iter().map(|n| n.len()).max().unwrap(), deco);
        for name in names {
            let prefix = name.len() + deco;
            let reached = (prefix / TAB_WIDTH + tab_pad(column, prefix).len()) * TAB_WIDTH;
            // Every line's padding ends on the same tab stop.
            assert_eq!(reached, (column / TAB_WIDTH) * TAB_WIDTH);
        }
    }

    #[test]
    fn test_c_ident() {
        assert_eq!(c_ident("VDDIO_SD0"), "VDDIO_SD0");
        assert_eq!(c_ident("vdd18a aud"), "VDD18A_AUD");
        assert_eq!(c_ident("3v3-rail"), "_3V3_RAIL");
    }
}
