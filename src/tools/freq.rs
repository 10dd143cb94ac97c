// src/tools/freq.rs

//! Byte-frequency counting.
//!
//! One `value,count` line per byte value, zero-count rows dropped unless
//! asked for.

use anyhow::Result;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct FreqOptions {
    /// Emit rows for values that never occur.
    pub include_zero: bool,
    /// Prefix the table with a `value,count` header.
    pub csv_header: bool,
}

/// Tallies every byte of `reader`.
pub fn count<R: Read>(reader: &mut R) -> Result<[u64; 256]> {
    let mut table = [0u64; 256];
    let mut chunk = [0u8; 1024];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok(table);
        }
        for &b in &chunk[..n] {
            table[b as usize] += 1;
        }
    }
}

/// Counts and prints the frequency table.
pub fn run<R: Read, W: Write>(reader: &mut R, options: &FreqOptions, out: &mut W) -> Result<()> {
    let table = count(reader)?;
    if options.csv_header {
        writeln!(out, "value,count")?;
    }
    for (value, &n) in table.iter().enumerate() {
        if n != 0 || options.include_zero {
            writeln!(out, "{value},{n}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_to_string(data: &[u8], options: &FreqOptions) -> String {
        let mut out = Vec::new();
        run(&mut Cursor::new(data), options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn counts_match_occurrences() {
        let text = run_to_string(b"aaab", &FreqOptions::default());
        assert_eq!(text, "97,3\n98,1\n");
    }

    #[test]
    fn zero_rows_appear_only_on_request() {
        let options = FreqOptions {
            include_zero: true,
            ..Default::default()
        };
        let text = run_to_string(b"", &options);
        assert_eq!(text.lines().count(), 256);
        assert!(text.starts_with("0,0\n1,0\n"));

        assert_eq!(run_to_string(b"", &FreqOptions::default()), "");
    }

    #[test]
    fn csv_header_precedes_the_table() {
        let options = FreqOptions {
            csv_header: true,
            ..Default::default()
        };
        let text = run_to_string(b"\x00", &options);
        assert_eq!(text, "value,count\n0,1\n");
    }

    #[test]
    fn large_input_tallies_across_chunks() {
        let data = vec![7u8; 5000];
        let table = count(&mut Cursor::new(&data)).unwrap();
        assert_eq!(table[7], 5000);
        assert_eq!(table.iter().sum::<u64>(), 5000);
    }
}
