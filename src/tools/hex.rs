// src/tools/hex.rs

//! Hex dump: 16 bytes per row with an address column and an ASCII gutter.
//!
//! A marked byte sequence is highlighted with ANSI reverse video unless
//! color is disabled; matching runs within a row.

use anyhow::{bail, Result};
use std::io::{Read, Write};

const BYTES_PER_ROW: usize = 16;

const ANSI_MARK: &str = "\x1b[7m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Default)]
pub struct HexOptions {
    /// Byte sequence to highlight, already decoded from hex.
    pub mark: Option<Vec<u8>>,
    /// Disables ANSI colorization of marked bytes.
    pub no_color: bool,
}

/// Parses a hex string such as `"FFD8FF"` into the byte sequence it names.
pub fn parse_mark(text: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned.len() % 2 != 0 {
        bail!("mark must be an even number of hex digits (got {text:?})");
    }
    cleaned
        .chunks(2)
        .map(|pair| Ok(hex_value(pair[0])? << 4 | hex_value(pair[1])?))
        .collect()
}

fn hex_value(b: u8) -> Result<u8> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        other => bail!("bad hex digit {:?} in mark", other as char),
    }
}

/// Dumps `reader` to `out`, `base_address` being the absolute offset of its
/// first byte.
pub fn dump<R: Read, W: Write>(
    reader: &mut R,
    base_address: u64,
    options: &HexOptions,
    out: &mut W,
) -> Result<()> {
    let mut row = [0u8; BYTES_PER_ROW];
    let mut filled = 0usize;
    let mut address = base_address;
    let mut chunk = [0u8; 1024];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for &b in &chunk[..n] {
            row[filled] = b;
            filled += 1;
            if filled == BYTES_PER_ROW {
                write_row(out, address, &row[..filled], options)?;
                address += BYTES_PER_ROW as u64;
                filled = 0;
            }
        }
    }
    if filled > 0 {
        write_row(out, address, &row[..filled], options)?;
    }
    Ok(())
}

/// Byte positions within `row` covered by an occurrence of `mark`.
fn marked_positions(row: &[u8], mark: &[u8]) -> Vec<bool> {
    let mut flags = vec![false; row.len()];
    if mark.is_empty() || mark.len() > row.len() {
        return flags;
    }
    for start in 0..=row.len() - mark.len() {
        if &row[start..start + mark.len()] == mark {
            for f in &mut flags[start..start + mark.len()] {
                *f = true;
            }
        }
    }
    flags
}

fn write_row<W: Write>(out: &mut W, address: u64, row: &[u8], options: &HexOptions) -> Result<()> {
    let flags = match &options.mark {
        Some(mark) if !options.no_color => marked_positions(row, mark),
        _ => vec![false; row.len()],
    };

    write!(out, "{address:08X}  ")?;
    for i in 0..BYTES_PER_ROW {
        if i == BYTES_PER_ROW / 2 {
            write!(out, " ")?;
        }
        match row.get(i) {
            Some(b) if flags[i] => write!(out, "{ANSI_MARK}{b:02X}{ANSI_RESET} ")?,
            Some(b) => write!(out, "{b:02X} ")?,
            None => write!(out, "   ")?,
        }
    }

    write!(out, " |")?;
    for &b in row {
        let c = if (32..127).contains(&b) { b as char } else { '.' };
        write!(out, "{c}")?;
    }
    writeln!(out, "|")?;
    Ok(())
}
