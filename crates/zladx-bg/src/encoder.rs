use itertools::Itertools;

use crate::{
    command::{Command, DrawCommand, MAX_RUN_LENGTH},
    error::EncodeError,
    tilemap::SparseTilemap,
    window::{Address, RowFraming, TileId, TilemapLayout},
};

// -------------------------------------------------------------------------------------------------

/// Shortest run of identical tiles emitted as a repeat command.
pub const MIN_REPEAT_LENGTH: usize = 2;

// -------------------------------------------------------------------------------------------------

struct StreamWriter {
    out:      Vec<u8>,
    address:  u32,
    commands: usize,
}

impl StreamWriter {
    fn new(address: u32) -> Self {
        Self { out: Vec::new(), address, commands: 0 }
    }

    fn seek(&mut self, address: u32) {
        self.address = address;
    }

    fn push(&mut self, command: DrawCommand) {
        log::trace!("{command:x?}");
        self.out.reserve(command.encoded_len());
        command.write_to(&mut self.out);
        self.address += command.payload.run_length() as u32;
        self.commands += 1;
    }

    fn literal(&mut self, tiles: &[TileId]) {
        for chunk in tiles.chunks(MAX_RUN_LENGTH) {
            self.push(DrawCommand::literal(self.address as Address, chunk));
        }
    }

    fn repeat(&mut self, tile: TileId, length: usize) {
        debug_assert!(length >= MIN_REPEAT_LENGTH);
        self.push(DrawCommand::repeat(self.address as Address, tile, length));
    }

    /// Encodes tiles lying at consecutive addresses from the current one.
    fn span(&mut self, tiles: &[TileId]) {
        let mut literal_start = 0;
        let mut pos = 0;
        for (count, &tile) in tiles.iter().dedup_with_count() {
            if count >= MIN_REPEAT_LENGTH {
                self.literal(&tiles[literal_start..pos]);
                let mut remaining = count;
                while remaining >= MIN_REPEAT_LENGTH {
                    let length = remaining.min(MAX_RUN_LENGTH);
                    self.repeat(tile, length);
                    remaining -= length;
                }
                // A lone leftover tile joins the next literal run.
                literal_start = pos + count - remaining;
            }
            pos += count;
        }
        self.literal(&tiles[literal_start..]);
    }

    fn finish(mut self) -> Vec<u8> {
        Command::Terminator.write_to(&mut self.out);
        log::debug!("Encoded {} commands into {} bytes", self.commands, self.out.len());
        self.out
    }
}

// -------------------------------------------------------------------------------------------------

/// Encodes a dense tile grid laid out linearly from the layout's base address.
pub fn encode(raw: &[TileId], layout: &TilemapLayout) -> Result<Vec<u8>, EncodeError> {
    let invalid_width = match layout.framing {
        _ if layout.width == 0 => true,
        RowFraming::Rows => raw.len() % layout.width != 0,
        RowFraming::Linear => false,
    };
    if invalid_width {
        return Err(EncodeError::InvalidWidth { width: layout.width, length: raw.len() });
    }

    let available = layout.window.size();
    if raw.len() > available {
        return Err(EncodeError::InputTooLarge { length: raw.len(), available });
    }

    log::debug!(
        "Encoding {} tiles ({} rows of {}) at {:#06x}",
        raw.len(),
        raw.len() / layout.width,
        layout.width,
        layout.base_address()
    );
    let mut writer = StreamWriter::new(u32::from(layout.base_address()));
    writer.span(raw);
    Ok(writer.finish())
}

/// Encodes a sparse tilemap, jumping over addresses it does not contain.
pub fn encode_map(tilemap: &SparseTilemap) -> Vec<u8> {
    let mut writer = StreamWriter::new(u32::from(tilemap.window().base()));

    // Within a run of consecutive addresses, address minus position stays constant.
    let spans = tilemap.iter().enumerate().group_by(|&(i, (address, _))| u32::from(address) - i as u32);
    for (_, span) in &spans {
        let mut span = span.map(|(_, entry)| entry).peekable();
        if let Some(&(start, _)) = span.peek() {
            let tiles = span.map(|(_, tile)| tile).collect_vec();
            writer.seek(u32::from(start));
            writer.span(&tiles);
        }
    }

    writer.finish()
}

// -------------------------------------------------------------------------------------------------
