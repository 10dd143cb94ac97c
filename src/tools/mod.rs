// src/tools/mod.rs

//! The non-interactive inspection tools: hex dump, string extraction,
//! byte-frequency counting, and arbitrary-base printing.
//!
//! Each tool is a function over a byte window and an output writer, so the
//! binary wires them to stdout and the tests wire them to a buffer.

pub mod bprint;
pub mod freq;
pub mod hex;
pub mod strings;
