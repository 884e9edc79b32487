use std::{fs, num::ParseIntError, path::PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use zladx_bg::{Address, RowFraming, TilemapLayout, TilemapWindow, SCREEN_WIDTH_TILES};

use crate::output::{write_result, Destination};

// -------------------------------------------------------------------------------------------------

/// Decode or encode background tilemaps using the Link's Awakening DX draw-command format.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Log more details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Subcommand, Debug)]
pub enum Operation {
    /// Convert an encoded tilemap to a raw tilemap
    Decode {
        #[command(flatten)]
        io:     IoArgs,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Convert a raw tilemap to the encoded format
    Encode {
        #[command(flatten)]
        io:         IoArgs,
        #[command(flatten)]
        window:     WindowArgs,
        /// Tilemap width in tiles
        #[arg(long, default_value_t = SCREEN_WIDTH_TILES)]
        width:      usize,
        /// Reject input that does not consist of whole rows
        #[arg(long)]
        whole_rows: bool,
    },
}

#[derive(Args, Debug)]
pub struct IoArgs {
    /// File to read
    pub infile: PathBuf,

    /// File to write the output to, as raw bytes (hexadecimal text on stdout otherwise)
    #[arg(short, long, value_name = "OUTFILE")]
    pub output: Option<PathBuf>,

    /// Wrap the stdout output to a number of characters (0 to disable)
    #[arg(short, long, value_name = "CHAR_COUNT", default_value_t = 40)]
    pub wrap: usize,
}

#[derive(Args, Debug)]
pub struct WindowArgs {
    /// First address of the tilemap
    #[arg(long, value_name = "ADDRESS", value_parser = parse_address, default_value = "0x9800")]
    pub base: Address,

    /// Number of addresses the tilemap may span
    #[arg(long, value_name = "SIZE", value_parser = parse_size, default_value = "0x800")]
    pub window_size: usize,
}

// -------------------------------------------------------------------------------------------------

fn parse_number(text: &str) -> Result<u64, ParseIntError> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    }
}

fn parse_address(text: &str) -> anyhow::Result<Address> {
    Ok(Address::try_from(parse_number(text)?)?)
}

fn parse_size(text: &str) -> anyhow::Result<usize> {
    Ok(usize::try_from(parse_number(text)?)?)
}

impl WindowArgs {
    fn to_window(&self) -> anyhow::Result<TilemapWindow> {
        Ok(TilemapWindow::new(self.base, self.window_size)?)
    }
}

impl IoArgs {
    fn read_input(&self) -> anyhow::Result<Vec<u8>> {
        log::info!("Reading {}", self.infile.display());
        fs::read(&self.infile).with_context(|| format!("Could not read {}", self.infile.display()))
    }

    fn destination(&self) -> Destination {
        match &self.output {
            Some(path) => Destination::File(path.clone()),
            None => Destination::Stdout { wrap: self.wrap },
        }
    }
}

// -------------------------------------------------------------------------------------------------

pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn run(self) -> anyhow::Result<()> {
        // Nothing is written until the conversion has fully succeeded.
        let (result, io) = match &self.cli.operation {
            Operation::Decode { io, window } => {
                let window = window.to_window()?;
                let input = io.read_input()?;
                log::info!("Decoding {} bytes into window {window}", input.len());
                let tilemap = zladx_bg::decode(&input, window)
                    .with_context(|| format!("Could not decode {}", io.infile.display()))?;
                (tilemap.to_dense(), io)
            }
            Operation::Encode { io, window, width, whole_rows } => {
                let framing = if *whole_rows { RowFraming::Rows } else { RowFraming::Linear };
                let layout = TilemapLayout::new(window.to_window()?, *width).with_framing(framing);
                let input = io.read_input()?;
                log::info!("Encoding {} tiles at {:#06x}, {} per row", input.len(), layout.base_address(), width);
                let stream = zladx_bg::encode(&input, &layout)
                    .with_context(|| format!("Could not encode {}", io.infile.display()))?;
                (stream, io)
            }
        };
        write_result(&result, &io.destination())
    }
}

// -------------------------------------------------------------------------------------------------
