// src/tools/bprint.rs

//! Arbitrary-base byte printing.
//!
//! Every byte is rendered in the chosen base using a symbol alphabet,
//! optionally shifted (a trivial substitution cipher), zero-padded to the
//! base's fixed width, space-separated, and grouped into lines.

use anyhow::{bail, Result};
use std::io::{Read, Write};

#[derive(Debug, Clone)]
pub struct BprintOptions {
    /// Output base, at least 2.
    pub base: u32,
    /// Symbol alphabet indexed by digit value; must cover `base` symbols.
    pub symbols: Vec<char>,
    /// Rotation applied to every digit before symbol lookup.
    pub shift: u32,
    /// Pad every byte to the base's fixed digit count.
    pub pad: bool,
    /// Right-align within the fixed width and separate bytes with spaces.
    pub whitespace: bool,
    /// Break the output into lines of this many bytes (0 disables).
    pub group: u32,
}

impl Default for BprintOptions {
    fn default() -> Self {
        Self {
            base: 10,
            symbols: default_symbols(),
            shift: 0,
            pad: false,
            whitespace: false,
            group: 0,
        }
    }
}

/// Digits then upper- and lowercase letters, the conventional base-62
/// alphabet.
pub fn default_symbols() -> Vec<char> {
    ('0'..='9').chain('A'..='Z').chain('a'..='z').collect()
}

/// Fixed digit count for one byte in `base`, clamped to `2..=8` like the
/// original tool.
pub fn chars_per_base(base: u32) -> usize {
    let ln = ((255.0f64).ln() / (base as f64).ln()).ceil() as usize;
    ln.clamp(2, 8)
}

impl BprintOptions {
    pub fn validate(&self) -> Result<()> {
        if self.base < 2 {
            bail!("base must be greater than 1 (got {})", self.base);
        }
        if (self.symbols.len() as u32) < self.base {
            bail!(
                "the symbol string must contain at least {} symbols (got {})",
                self.base,
                self.symbols.len()
            );
        }
        Ok(())
    }

    fn symbol(&self, digit: u32) -> char {
        let idx = if self.shift > 0 {
            (digit + self.shift) % self.base
        } else {
            digit
        };
        self.symbols[idx as usize]
    }

    /// Renders one byte, most significant digit first.
    fn render(&self, byte: u8) -> String {
        let mut digits = Vec::new();
        let mut v = u32::from(byte);
        if v == 0 {
            digits.push(self.symbol(0));
        }
        while v > 0 {
            digits.push(self.symbol(v % self.base));
            v /= self.base;
        }
        if self.pad {
            while digits.len() < chars_per_base(self.base) {
                digits.push(self.symbol(0));
            }
        }
        digits.iter().rev().collect()
    }
}

/// Prints every byte of `reader` in the configured base.
pub fn run<R: Read, W: Write>(reader: &mut R, options: &BprintOptions, out: &mut W) -> Result<()> {
    options.validate()?;

    let width = chars_per_base(options.base);
    let mut total = 0u32;
    let mut chunk = [0u8; 1024];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for &b in &chunk[..n] {
            let rendered = options.render(b);
            if options.whitespace {
                // Symbols may be multi-byte; align on characters.
                for _ in rendered.chars().count()..width {
                    write!(out, " ")?;
                }
                write!(out, " ")?;
            }
            write!(out, "{rendered}")?;
            if options.group > 0 {
                total += 1;
                if total % options.group == 0 {
                    writeln!(out)?;
                }
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_to_string(data: &[u8], options: &BprintOptions) -> String {
        let mut out = Vec::new();
        run(&mut Cursor::new(data), options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn base_two_prints_bits() {
        let options = BprintOptions {
            base: 2,
            ..Default::default()
        };
        assert_eq!(run_to_string(&[5], &options), "101\n");
    }

    #[test]
    fn padding_fixes_the_width() {
        let options = BprintOptions {
            base: 16,
            pad: true,
            ..Default::default()
        };
        // Base 16 pads to 2 digits.
        assert_eq!(run_to_string(&[0x0A, 0x00], &options), "0A00\n");

        let options = BprintOptions {
            base: 2,
            pad: true,
            ..Default::default()
        };
        assert_eq!(run_to_string(&[1], &options), "00000001\n");
    }

    #[test]
    fn whitespace_aligns_and_separates() {
        let options = BprintOptions {
            base: 10,
            whitespace: true,
            ..Default::default()
        };
        // Width for base 10 is 3: "7" right-aligns, "255" does not move.
        assert_eq!(run_to_string(&[7, 255], &options), "   7 255\n");
    }

    #[test]
    fn grouping_breaks_lines() {
        let options = BprintOptions {
            base: 16,
            pad: true,
            group: 2,
            ..Default::default()
        };
        assert_eq!(run_to_string(&[1, 2, 3, 4], &options), "0102\n0304\n\n");
    }

    #[test]
    fn shift_rotates_the_alphabet() {
        let options = BprintOptions {
            base: 10,
            shift: 1,
            ..Default::default()
        };
        // Each digit d prints as (d + 1) % 10.
        assert_eq!(run_to_string(&[90], &options), "01\n");
    }

    #[test]
    fn validation_rejects_bad_configurations() {
        let options = BprintOptions {
            base: 1,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = BprintOptions {
            base: 16,
            symbols: vec!['0', '1'],
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn alignment_counts_characters_not_bytes() {
        // '·' is two bytes in UTF-8; alignment must not shift for it.
        let options = BprintOptions {
            base: 2,
            symbols: vec!['·', '#'],
            whitespace: true,
            ..Default::default()
        };
        // Byte 5 is "#·#": 3 of the 8-character width, so 5 pad spaces
        // plus the separator.
        assert_eq!(run_to_string(&[5], &options), "      #·#\n");

        let ascii = BprintOptions {
            base: 2,
            whitespace: true,
            ..Default::default()
        };
        assert_eq!(run_to_string(&[5], &ascii), "      101\n");
    }

    #[test]
    fn custom_symbols_substitute() {
        let options = BprintOptions {
            base: 2,
            symbols: vec!['.', '#'],
            pad: true,
            ..Default::default()
        };
        assert_eq!(run_to_string(&[0xF0], &options), "####....\n");
    }
}
