// src/main.rs

// Declare modules
pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
pub mod font;
pub mod geom;
pub mod keys;
pub mod map;
pub mod rasterizer;
pub mod renderer;
pub mod stream;
pub mod tools;
pub mod view;

use crate::{
    backends::{x11::XDriver, Driver},
    cli::{parse_range, Cli, Command},
    config::Config,
    controller::{run_loop, ViewerController},
    map::{TileAtlas, TileBuilder},
    stream::FileWindow,
    tools::{bprint, freq, hex, strings},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::Write;
use std::time::Duration;

fn main() -> Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::View { file, range, cell } => {
            let mut config = config;
            if let Some(cell) = cell {
                config.viewer.cell_size = cell;
                config.validate()?;
            }
            let cell = config.viewer.cell_size;

            let mut window = FileWindow::open(&file, parse_range(range.as_ref())?)?;
            info!(
                "viewing {} ({} bytes from 0x{:X})",
                file.display(),
                window.len(),
                window.start()
            );

            let tiles = TileBuilder::build_from_reader(cell, &mut window)
                .with_context(|| format!("building tiles from {}", file.display()))?;
            let atlas = TileAtlas::attach(tiles, cell);

            let title = format!("bytescope - {}", file.display());
            let mut driver = XDriver::new(&title, config.window.width, config.window.height)?;
            let controller = ViewerController::new(atlas, &config, driver.surface_size())?;
            run_loop(
                controller,
                &mut driver,
                Duration::from_millis(config.performance.idle_sleep_ms),
            )?;
        }
        Command::Hex {
            file,
            range,
            mark,
            no_color,
        } => {
            let mut window = FileWindow::open(&file, parse_range(range.as_ref())?)?;
            let options = hex::HexOptions {
                mark: mark.as_deref().map(hex::parse_mark).transpose()?,
                no_color,
            };
            let base = window.start();
            hex::dump(&mut window, base, &options, &mut out)?;
        }
        Command::Strings {
            file,
            range,
            lowercase,
            uppercase,
            digits,
            mixed,
            min_len,
            show_address,
        } => {
            let mut window = FileWindow::open(&file, parse_range(range.as_ref())?)?;
            let options = strings::StringsOptions {
                classes: strings::CharClasses {
                    lowercase,
                    uppercase,
                    digits,
                    mixed,
                },
                min_len,
                show_address,
            };
            let base = window.start();
            strings::extract(&mut window, base, &options, &mut out)?;
        }
        Command::Freq {
            file,
            range,
            no_drop,
            csv,
        } => {
            let mut window = FileWindow::open(&file, parse_range(range.as_ref())?)?;
            let options = freq::FreqOptions {
                include_zero: no_drop,
                csv_header: csv,
            };
            freq::run(&mut window, &options, &mut out)?;
        }
        Command::Bprint {
            file,
            range,
            base,
            symbols,
            shift,
            pad,
            ws,
            group,
        } => {
            let mut window = FileWindow::open(&file, parse_range(range.as_ref())?)?;
            let options = bprint::BprintOptions {
                base,
                symbols: symbols
                    .map(|s| s.chars().collect())
                    .unwrap_or_else(bprint::default_symbols),
                shift,
                pad,
                whitespace: ws,
                group,
            };
            bprint::run(&mut window, &options, &mut out)?;
        }
    }

    out.flush().context("flushing output")?;
    Ok(())
}
