// src/cli.rs

//! Command-line surface: one subcommand per tool.
//!
//! Every tool accepts `-r/--range ADDR LEN` where the start address is in
//! base 16 (an optional `0x` prefix is accepted) and the length is in base
//! 10, matching the convention the suite has always used.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bytescope", version, about = "Byte-level file inspection tools")]
pub struct Cli {
    /// Optional JSON configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive pixel-map viewer: one byte, one pixel.
    View {
        file: PathBuf,
        /// Restrict to ADDR (base 16) and LEN (base 10) bytes.
        #[arg(short = 'r', long, num_args = 2, value_names = ["ADDR", "LEN"])]
        range: Option<Vec<String>>,
        /// Tile edge length in byte pixels, overriding the configuration.
        #[arg(short = 'm', long = "max", value_name = "CELL")]
        cell: Option<u32>,
    },
    /// Hex dump with address column and ASCII gutter.
    Hex {
        file: PathBuf,
        #[arg(short = 'r', long, num_args = 2, value_names = ["ADDR", "LEN"])]
        range: Option<Vec<String>>,
        /// Hexadecimal byte sequence to highlight.
        #[arg(short = 'm', long, value_name = "HEX")]
        mark: Option<String>,
        /// Remove color output.
        #[arg(long)]
        no_color: bool,
    },
    /// Extract printable strings.
    Strings {
        file: PathBuf,
        #[arg(short = 'r', long, num_args = 2, value_names = ["ADDR", "LEN"])]
        range: Option<Vec<String>>,
        /// Match the [a-z] character set.
        #[arg(short = 'l', long)]
        lowercase: bool,
        /// Match the [A-Z] character set.
        #[arg(short = 'u', long)]
        uppercase: bool,
        /// Match the [0-9] character set.
        #[arg(short = 'd', long = "digit")]
        digits: bool,
        /// Match the [a-zA-Z0-9] character set.
        #[arg(short = 'a', long = "mixed")]
        mixed: bool,
        /// Minimum string length to report.
        #[arg(short = 'n', long = "number", value_name = "LEN")]
        min_len: Option<usize>,
        /// Display the start address of each string.
        #[arg(long = "show-address")]
        show_address: bool,
    },
    /// Byte-frequency table.
    Freq {
        file: PathBuf,
        #[arg(short = 'r', long, num_args = 2, value_names = ["ADDR", "LEN"])]
        range: Option<Vec<String>>,
        /// Do not drop values with no occurrence.
        #[arg(long = "no-drop")]
        no_drop: bool,
        /// Prefix the output with a CSV header.
        #[arg(long)]
        csv: bool,
    },
    /// Print bytes in an arbitrary base.
    Bprint {
        file: PathBuf,
        #[arg(short = 'r', long, num_args = 2, value_names = ["ADDR", "LEN"])]
        range: Option<Vec<String>>,
        /// Output base, at least 2.
        #[arg(short = 'b', long, default_value_t = 10)]
        base: u32,
        /// Custom symbol alphabet.
        #[arg(long, value_name = "STRING")]
        symbols: Option<String>,
        /// Rotation applied to every digit.
        #[arg(short = 's', long, default_value_t = 0)]
        shift: u32,
        /// Zero-pad every byte to the base's fixed width.
        #[arg(short = 'p', long)]
        pad: bool,
        /// Right-align digits and separate bytes with spaces.
        #[arg(long)]
        ws: bool,
        /// Bytes per output line (0 disables grouping).
        #[arg(long = "nl", value_name = "N", default_value_t = 0)]
        group: u32,
    },
}

/// Decodes a raw `--range` pair into `(address, length)`.
pub fn parse_range(range: Option<&Vec<String>>) -> Result<Option<(u64, u64)>> {
    let Some(pair) = range else {
        return Ok(None);
    };
    // clap enforces num_args = 2.
    let addr_text = pair[0].trim_start_matches("0x").trim_start_matches("0X");
    let addr = u64::from_str_radix(addr_text, 16)
        .with_context(|| format!("range address {:?} is not base-16", pair[0]))?;
    let len: u64 = pair[1]
        .parse()
        .with_context(|| format!("range length {:?} is not base-10", pair[1]))?;
    Ok(Some((addr, len)))
}
