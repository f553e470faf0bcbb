// Licensed under the Apache-2.0 license

//! Record reader for the vendor sheet export.
//!
//! The sheet arrives as comma-separated records. Quoted cells may embed
//! commas, escaped quotes (`""`) and newlines; several of the vendor's own
//! column headers contain embedded newlines, so the reader has to treat the
//! whole file as one token stream rather than splitting on lines first.

use anyhow::{anyhow, bail, Context, Result};
use winnow::ascii::line_ending;
use winnow::combinator::{alt, delimited, repeat, separated};
use winnow::prelude::*;
use winnow::token::{none_of, take_while};

fn quoted_cell(input: &mut &str) -> ModalResult<String> {
    let cell: String = delimited(
        '"',
        repeat(0.., alt(("\"\"".value('"'), none_of('"')))),
        '"',
    )
    .parse_next(input)?;
    // Quoted cells keep their raw line endings; fold CRLF so cell content
    // compares the same regardless of how the sheet was exported.
    Ok(cell.replace("\r\n", "\n"))
}

fn bare_cell(input: &mut &str) -> ModalResult<String> {
    take_while(0.., |c: char| !matches!(c, ',' | '"' | '\r' | '\n'))
        .map(ToOwned::to_owned)
        .parse_next(input)
}

fn cell(input: &mut &str) -> ModalResult<String> {
    alt((quoted_cell, bare_cell)).parse_next(input)
}

fn record(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., cell, ',').parse_next(input)
}

fn records(input: &mut &str) -> ModalResult<Vec<Vec<String>>> {
    let mut out = Vec::new();
    while !input.is_empty() {
        out.push(record.parse_next(input)?);
        if !input.is_empty() {
            line_ending.parse_next(input)?;
        }
    }
    Ok(out)
}

/// A parsed sheet: one header record naming the columns, then data records.
#[derive(Debug)]
pub struct Sheet {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Parse the whole sheet text. Blank records are dropped; the first
    /// remaining record names the columns.
    pub fn parse(text: &str) -> Result<Sheet> {
        let mut all = records
            .parse(text)
            .map_err(|err| anyhow!("malformed sheet: {err}"))?;
        all.retain(|rec| !(rec.len() == 1 && rec[0].is_empty()));

        if all.is_empty() {
            bail!("malformed sheet: no header record");
        }
        let columns = all.remove(0);
        Ok(Sheet { columns, rows: all })
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|col| col == name)
            .with_context(|| format!("sheet has no column {name:?}"))
    }

    /// Data records, in sheet order. Record numbers count the header as
    /// record 1 for diagnostics.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(|(idx, cells)| Row {
            sheet: self,
            cells,
            record: idx + 2,
        })
    }
}

/// One data record of a [`Sheet`].
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    sheet: &'a Sheet,
    cells: &'a [String],
    record: usize,
}

impl<'a> Row<'a> {
    /// Cell under the named column.
    pub fn field(&self, name: &str) -> Result<&'a str> {
        let idx = self.sheet.column(name)?;
        self.cells
            .get(idx)
            .map(String::as_str)
            .with_context(|| format!("record {} is missing column {name:?}", self.record))
    }

    /// Record number within the sheet (the header is record 1).
    pub fn record(&self) -> usize {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_records() {
        let sheet = Sheet::parse("a,b,c\n1,2,3\n4,5,6\n").unwrap();
        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field("a").unwrap(), "1");
        assert_eq!(rows[1].field("c").unwrap(), "6");
    }

    #[test]
    fn test_quoted_cell_with_newline() {
        let sheet = Sheet::parse("reg,addr\n\"FMUX_REG_A\n0x0300_1004\",x\n").unwrap();
        let row = sheet.rows().next().unwrap();
        assert_eq!(row.field("reg").unwrap(), "FMUX_REG_A\n0x0300_1004");
    }

    #[test]
    fn test_quoted_header_with_newline() {
        let sheet = Sheet::parse("\"Function_select\n_register\",other\nv,w\n").unwrap();
        let row = sheet.rows().next().unwrap();
        assert_eq!(row.field("Function_select\n_register").unwrap(), "v");
        assert_eq!(row.field("other").unwrap(), "w");
    }

    #[test]
    fn test_escaped_quote_and_comma() {
        let sheet = Sheet::parse("a,b\n\"x\"\"y\",\"1,2\"\n").unwrap();
        let row = sheet.rows().next().unwrap();
        assert_eq!(row.field("a").unwrap(), "x\"y");
        assert_eq!(row.field("b").unwrap(), "1,2");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let sheet = Sheet::parse("a,b\r\n\r\n1,2\r\n").unwrap();
        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("b").unwrap(), "2");
    }

    #[test]
    fn test_crlf_inside_quoted_cell_folds() {
        let sheet = Sheet::parse("a,b\r\n\"x\r\ny\",2\r\n").unwrap();
        let row = sheet.rows().next().unwrap();
        assert_eq!(row.field("a").unwrap(), "x\ny");
    }

    #[test]
    fn test_missing_column() {
        let sheet = Sheet::parse("a,b\n1,2\n").unwrap();
        let row = sheet.rows().next().unwrap();
        let err = row.field("c").unwrap_err();
        assert!(err.to_string().contains("no column \"c\""));
    }

    #[test]
    fn test_short_record() {
        let sheet = Sheet::parse("a,b,c\n1,2\n").unwrap();
        let row = sheet.rows().next().unwrap();
        assert!(row.field("c").is_err());
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert!(Sheet::parse("a,b\n\"oops,2\n").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(Sheet::parse("").is_err());
    }
}
