//! Background draw-command grammar.
//!
//! ```text
//! 00                        terminator (destination high byte of zero)
//! HH LL CC payload          draw command
//!
//! HH LL:    destination address, big endian
//! CC:       VRNNNNNN
//!   V:      0 = horizontal (address += 1), 1 = vertical (address += 0x20)
//!   R:      0 = literal run, followed by N+1 tiles
//!           1 = repeat run, followed by one tile written N+1 times
//!   NNNNNN: run length - 1
//! ```

use num_enum::{FromPrimitive, IntoPrimitive};

use crate::{
    error::MalformedStream,
    window::{Address, TileId, BG_MAP_ROW_STRIDE},
};

// -------------------------------------------------------------------------------------------------

pub const TERMINATOR: u8 = 0x00;

/// Longest run a single command can carry.
pub const MAX_RUN_LENGTH: usize = 64;

const DIRECTION_SHIFT: u8 = 7;
const MODE_SHIFT: u8 = 6;
const LENGTH_MASK: u8 = 0b0011_1111;

/// Destination address and control byte.
pub const HEADER_SIZE: usize = 3;

// -------------------------------------------------------------------------------------------------

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
pub enum Direction {
    #[num_enum(default)]
    Horizontal = 0,
    Vertical   = 1,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
enum Mode {
    #[num_enum(default)]
    Literal = 0,
    Repeat  = 1,
}

impl Direction {
    /// Address distance between two consecutive tiles of a run.
    #[inline]
    pub fn stride(self) -> u32 {
        match self {
            Direction::Horizontal => 1,
            Direction::Vertical => BG_MAP_ROW_STRIDE,
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Payload<'a> {
    Literal(&'a [TileId]),
    Repeat { tile: TileId, length: usize },
}

impl Payload<'_> {
    #[inline]
    pub fn run_length(&self) -> usize {
        match self {
            Payload::Literal(tiles) => tiles.len(),
            Payload::Repeat { length, .. } => *length,
        }
    }

    fn mode(&self) -> Mode {
        match self {
            Payload::Literal(_) => Mode::Literal,
            Payload::Repeat { .. } => Mode::Repeat,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DrawCommand<'a> {
    pub destination: Address,
    pub direction:   Direction,
    pub payload:     Payload<'a>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    Draw(DrawCommand<'a>),
    Terminator,
}

// -------------------------------------------------------------------------------------------------

impl<'a> DrawCommand<'a> {
    pub fn literal(destination: Address, tiles: &'a [TileId]) -> Self {
        Self { destination, direction: Direction::Horizontal, payload: Payload::Literal(tiles) }
    }

    pub fn repeat(destination: Address, tile: TileId, length: usize) -> Self {
        Self { destination, direction: Direction::Horizontal, payload: Payload::Repeat { tile, length } }
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE
            + match self.payload {
                Payload::Literal(tiles) => tiles.len(),
                Payload::Repeat { .. } => 1,
            }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        let length = self.payload.run_length();
        assert!((1..=MAX_RUN_LENGTH).contains(&length), "run length {length} cannot be encoded");
        assert_ne!(self.destination >> 8, 0, "destination {:#06x} collides with the terminator", self.destination);

        let control = (u8::from(self.direction) << DIRECTION_SHIFT)
            | (u8::from(self.payload.mode()) << MODE_SHIFT)
            | (length - 1) as u8;
        out.extend_from_slice(&self.destination.to_be_bytes());
        out.push(control);
        match self.payload {
            Payload::Literal(tiles) => out.extend_from_slice(tiles),
            Payload::Repeat { tile, .. } => out.push(tile),
        }
    }
}

impl Command<'_> {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Command::Draw(draw) => draw.write_to(out),
            Command::Terminator => out.push(TERMINATOR),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Parses the command at the start of `input`, returning it along with the unread rest.
///
/// `offset` is the position of `input` within the whole stream, used for error reporting.
pub fn read_command(input: &[u8], offset: usize) -> Result<(Command<'_>, &[u8]), MalformedStream> {
    let Some(&high) = input.first() else {
        return Err(MalformedStream::Unterminated { length: offset });
    };
    if high == TERMINATOR {
        return Ok((Command::Terminator, &input[1..]));
    }

    if input.len() < HEADER_SIZE {
        return Err(MalformedStream::Truncated { offset, needed: HEADER_SIZE, available: input.len() });
    }
    let (header, rest) = input.split_at(HEADER_SIZE);
    let destination = u16::from_be_bytes([header[0], header[1]]);
    let control = header[2];

    let direction = Direction::from(control >> DIRECTION_SHIFT);
    let mode = Mode::from((control >> MODE_SHIFT) & 1);
    let length = usize::from(control & LENGTH_MASK) + 1;
    let payload_offset = offset + HEADER_SIZE;

    let (payload, rest) = match mode {
        Mode::Literal => {
            if length > rest.len() {
                return Err(MalformedStream::Truncated {
                    offset:    payload_offset,
                    needed:    length,
                    available: rest.len(),
                });
            }
            let (tiles, rest) = rest.split_at(length);
            (Payload::Literal(tiles), rest)
        }
        Mode::Repeat => {
            let (&tile, rest) =
                rest.split_first().ok_or(MalformedStream::Truncated { offset: payload_offset, needed: 1, available: 0 })?;
            (Payload::Repeat { tile, length }, rest)
        }
    };

    Ok((Command::Draw(DrawCommand { destination, direction, payload }), rest))
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_literal_command() {
        let input = [0x98, 0x00, 0x02, 0x10, 0x11, 0x12, 0xAA];
        let (command, rest) = read_command(&input, 0).unwrap();
        assert_eq!(command, Command::Draw(DrawCommand::literal(0x9800, &[0x10, 0x11, 0x12])));
        assert_eq!(rest, [0xAA]);
    }

    #[test]
    fn reads_vertical_repeat_command() {
        let input = [0x99, 0x23, 0b1100_0100, 0x7F];
        let (command, rest) = read_command(&input, 0).unwrap();
        let expected = DrawCommand {
            destination: 0x9923,
            direction:   Direction::Vertical,
            payload:     Payload::Repeat { tile: 0x7F, length: 5 },
        };
        assert_eq!(command, Command::Draw(expected));
        assert!(rest.is_empty());
    }

    #[test]
    fn terminator_leaves_trailing_bytes() {
        let (command, rest) = read_command(&[0x00, 0x12, 0x34], 0).unwrap();
        assert_eq!(command, Command::Terminator);
        assert_eq!(rest, [0x12, 0x34]);
    }

    #[test]
    fn reports_truncation() {
        assert_eq!(read_command(&[], 7), Err(MalformedStream::Unterminated { length: 7 }));
        assert_eq!(
            read_command(&[0x98, 0x00], 2),
            Err(MalformedStream::Truncated { offset: 2, needed: 3, available: 2 })
        );
        assert_eq!(
            read_command(&[0x98, 0x00, 0x03, 1, 2], 0),
            Err(MalformedStream::Truncated { offset: 3, needed: 4, available: 2 })
        );
        assert_eq!(
            read_command(&[0x98, 0x00, 0x43], 0),
            Err(MalformedStream::Truncated { offset: 3, needed: 1, available: 0 })
        );
    }

    #[test]
    fn writes_commands() {
        let mut out = Vec::new();
        DrawCommand::repeat(0x9800, 0x01, 20).write_to(&mut out);
        DrawCommand::literal(0x9814, &[0x02, 0x03]).write_to(&mut out);
        Command::Terminator.write_to(&mut out);
        assert_eq!(out, [0x98, 0x00, 0x40 | 19, 0x01, 0x98, 0x14, 0x01, 0x02, 0x03, 0x00]);
    }

    #[test]
    fn longest_run_fits_length_field() {
        let mut out = Vec::new();
        let command = DrawCommand::repeat(0x9C00, 0xFF, MAX_RUN_LENGTH);
        command.write_to(&mut out);
        assert_eq!(out, [0x9C, 0x00, 0x7F, 0xFF]);
        assert_eq!(command.encoded_len(), out.len());
    }

    #[test]
    #[should_panic]
    fn overlong_run_is_rejected() {
        DrawCommand::repeat(0x9800, 0, MAX_RUN_LENGTH + 1).write_to(&mut Vec::new());
    }

    #[test]
    #[should_panic]
    fn zero_page_destination_is_rejected() {
        DrawCommand::repeat(0x0012, 1, 2).write_to(&mut Vec::new());
    }
}
