use duplicate::duplicate_item;
use thiserror::Error;

use crate::window::{Address, WindowError};

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedStream {
    #[error("Stream of {length} bytes ends without a terminator")]
    Unterminated { length: usize },
    #[error("Truncated command at offset {offset:#x} - needs {needed} bytes, only {available} left")]
    Truncated { offset: usize, needed: usize, available: usize },
    #[error("Run of {length} tiles at {address:#06x} leaves the tilemap window")]
    OutOfWindow { address: Address, length: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Invalid tilemap width {width} for {length} tiles")]
    InvalidWidth { width: usize, length: usize },
    #[error("Input of {length} tiles does not fit in the {available} addresses left in the tilemap window")]
    InputTooLarge { length: usize, available: usize },
}

// -------------------------------------------------------------------------------------------------

/// Any codec failure, for callers that decode and encode through one error path.
///
/// The codec functions return the narrower errors above; `?` lifts them into this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed background stream:\n- {0}")]
    MalformedStream(MalformedStream),
    #[error("Cannot encode background:\n- {0}")]
    Encode(EncodeError),
    #[error("Bad tilemap window:\n- {0}")]
    Window(WindowError),
}

// -------------------------------------------------------------------------------------------------

#[duplicate_item(
    kind              source_error;
    [MalformedStream] [MalformedStream];
    [Encode]          [EncodeError];
    [Window]          [WindowError];
)]
impl From<source_error> for CodecError {
    fn from(e: source_error) -> Self {
        CodecError::kind(e)
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_codec_error() {
        let err = CodecError::from(EncodeError::InvalidWidth { width: 0, length: 4 });
        assert!(matches!(err, CodecError::Encode(EncodeError::InvalidWidth { .. })));

        let err: CodecError = MalformedStream::Unterminated { length: 3 }.into();
        assert_eq!(err.to_string(), "Malformed background stream:\n- Stream of 3 bytes ends without a terminator");

        let err: CodecError = WindowError::Empty.into();
        assert!(matches!(err, CodecError::Window(WindowError::Empty)));
    }
}
