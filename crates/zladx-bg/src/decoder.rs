use crate::{
    command::{self, Command, DrawCommand, Payload},
    error::MalformedStream,
    tilemap::SparseTilemap,
    window::{Address, TileId, TilemapWindow},
};

// -------------------------------------------------------------------------------------------------

#[derive(Debug)]
enum State<'a> {
    ReadCommand,
    Skip(DrawCommand<'a>),
    EmitLiteral { tiles: &'a [TileId], stride: u32 },
    EmitRun { tile: TileId, length: usize, stride: u32 },
    Terminated,
}

impl<'a> State<'a> {
    fn emit(draw: DrawCommand<'a>) -> Self {
        let stride = draw.direction.stride();
        match draw.payload {
            Payload::Literal(tiles) => State::EmitLiteral { tiles, stride },
            Payload::Repeat { tile, length } => State::EmitRun { tile, length, stride },
        }
    }
}

// -------------------------------------------------------------------------------------------------

pub fn decode(input: &[u8], window: TilemapWindow) -> Result<SparseTilemap, MalformedStream> {
    decode_counted(input, window).map(|(tilemap, _)| tilemap)
}

/// Returns the decoded tilemap and the size of the stream, terminator included.
pub fn decode_counted(input: &[u8], window: TilemapWindow) -> Result<(SparseTilemap, usize), MalformedStream> {
    let mut tilemap = SparseTilemap::new(window);
    let mut cursor = u32::from(window.base());
    let mut in_it = input;
    let mut command_count = 0;

    let mut state = State::ReadCommand;
    loop {
        log::trace!("cursor {cursor:#06x}, state {state:?}");
        state = match state {
            State::ReadCommand => {
                let offset = input.len() - in_it.len();
                let (command, rest) = command::read_command(in_it, offset)?;
                in_it = rest;
                match command {
                    Command::Terminator => State::Terminated,
                    Command::Draw(draw) => {
                        command_count += 1;
                        if u32::from(draw.destination) == cursor {
                            State::emit(draw)
                        } else {
                            State::Skip(draw)
                        }
                    }
                }
            }
            State::Skip(draw) => {
                cursor = u32::from(draw.destination);
                State::emit(draw)
            }
            State::EmitLiteral { tiles, stride } => {
                check_span(window, cursor, tiles.len(), stride)?;
                for &tile in tiles {
                    tilemap.insert_unchecked(cursor, tile);
                    cursor += stride;
                }
                State::ReadCommand
            }
            State::EmitRun { tile, length, stride } => {
                check_span(window, cursor, length, stride)?;
                for _ in 0..length {
                    tilemap.insert_unchecked(cursor, tile);
                    cursor += stride;
                }
                State::ReadCommand
            }
            State::Terminated => break,
        };
    }

    let bytes_consumed = input.len() - in_it.len();
    log::debug!("Decoded {command_count} commands ({bytes_consumed} bytes) into {} tiles", tilemap.len());
    Ok((tilemap, bytes_consumed))
}

fn check_span(window: TilemapWindow, start: u32, length: usize, stride: u32) -> Result<(), MalformedStream> {
    if window.contains_span(start, length, stride) {
        Ok(())
    } else {
        Err(MalformedStream::OutOfWindow { address: start as Address, length })
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_decoding(stream: &[u8], expected: &[(Address, TileId)]) {
        let res = decode(stream, TilemapWindow::default());
        let res = res.unwrap_or_else(|err| panic!("decoding failed unexpectedly ({err})"));
        let entries = res.iter().collect::<Vec<_>>();
        if entries.as_slice() != expected {
            panic!("decoding gave wrong results (got: {entries:x?}, expected: {expected:x?})")
        }
    }

    #[test]
    fn test_literal_then_repeat() {
        let stream = [
            // Literal [5, 6] at 0x9800
            0x98, 0x00, 2 - 1, 5, 6,
            // Repeat 7 three times at 0x9802
            0x98, 0x02, 0x40 | (3 - 1), 7,
            0x00,
        ];
        assert_decoding(&stream, &[(0x9800, 5), (0x9801, 6), (0x9802, 7), (0x9803, 7), (0x9804, 7)]);
    }

    #[test]
    fn test_skip_leaves_gap() {
        let stream = [
            0x98, 0x00, 0x40, 1,
            // Jump over 0x9801..0x9820
            0x98, 0x20, 0x40 | 1, 2,
            0x00,
        ];
        assert_decoding(&stream, &[(0x9800, 1), (0x9820, 2), (0x9821, 2)]);
    }

    #[test]
    fn test_backwards_jump_overwrites() {
        let stream = [0x98, 0x00, 0x40 | 3, 1, 0x98, 0x01, 0x40 | 1, 9, 0x00];
        assert_decoding(&stream, &[(0x9800, 1), (0x9801, 9), (0x9802, 9), (0x9803, 1)]);
    }

    #[test]
    fn test_vertical_run() {
        let stream = [0x98, 0x03, 0x80 | (3 - 1), 0xA, 0xB, 0xC, 0x00];
        assert_decoding(&stream, &[(0x9803, 0xA), (0x9823, 0xB), (0x9843, 0xC)]);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let stream = [0x98, 0x00, 0x40, 1, 0x00, 0xDE, 0xAD];
        let (tilemap, consumed) = decode_counted(&stream, TilemapWindow::default()).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(tilemap.to_dense(), [1]);
    }

    #[test]
    fn test_only_terminator() {
        let (tilemap, consumed) = decode_counted(&[0x00], TilemapWindow::default()).unwrap();
        assert!(tilemap.is_empty());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_missing_terminator() {
        let window = TilemapWindow::default();
        assert_eq!(decode(&[], window), Err(MalformedStream::Unterminated { length: 0 }));
        assert_eq!(decode(&[0x98, 0x00, 0x40, 1], window), Err(MalformedStream::Unterminated { length: 4 }));
    }

    #[test]
    fn test_truncated_literal() {
        let result = decode(&[0x98, 0x00, 0x04, 1, 2, 3], TilemapWindow::default());
        assert_eq!(result, Err(MalformedStream::Truncated { offset: 3, needed: 5, available: 3 }));
    }

    #[test]
    fn test_run_leaving_window() {
        let window = TilemapWindow::new(0x9800, 0x10).unwrap();
        let result = decode(&[0x98, 0x08, 0x40 | 8, 1, 0x00], window);
        assert_eq!(result, Err(MalformedStream::OutOfWindow { address: 0x9808, length: 9 }));
        let result = decode(&[0x98, 0x08, 0x40 | 7, 1, 0x00], window);
        assert_eq!(result.map(|tilemap| tilemap.len()), Ok(8));
    }

    #[test]
    fn test_destination_outside_window() {
        let result = decode(&[0x97, 0xFF, 0x40, 1, 0x00], TilemapWindow::default());
        assert_eq!(result, Err(MalformedStream::OutOfWindow { address: 0x97FF, length: 1 }));
    }

    #[test]
    fn test_vertical_run_leaving_window() {
        let window = TilemapWindow::new(0x9800, 0x40).unwrap();
        let result = decode(&[0x98, 0x00, 0x80 | 0x40 | 2, 1, 0x00], window);
        assert_eq!(result, Err(MalformedStream::OutOfWindow { address: 0x9800, length: 3 }));
    }
}
