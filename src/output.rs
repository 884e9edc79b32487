use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use itertools::Itertools;

// -------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Destination {
    /// Raw bytes.
    File(PathBuf),
    /// Hexadecimal text, `wrap` characters per line (0 for a single line).
    Stdout { wrap: usize },
}

// -------------------------------------------------------------------------------------------------

pub fn hex_text(bytes: &[u8], wrap: usize) -> String {
    let text = hex::encode(bytes);
    let mut text = match wrap {
        0 => text,
        _ => text.chars().chunks(wrap).into_iter().map(|line| line.collect::<String>()).join("\n"),
    };
    text.push('\n');
    text
}

pub fn write_result(bytes: &[u8], destination: &Destination) -> anyhow::Result<()> {
    match destination {
        Destination::File(path) => {
            log::info!("Writing {} bytes to {}", bytes.len(), path.display());
            fs::write(path, bytes).with_context(|| format!("Could not write {}", path.display()))
        }
        Destination::Stdout { wrap } => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(hex_text(bytes, *wrap).as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

// -------------------------------------------------------------------------------------------------
