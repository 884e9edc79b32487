//! Codec for Link's Awakening DX background tilemaps.
//!
//! Background data is stored as a stream of draw commands (see [`command`]). Decoding produces a
//! [`SparseTilemap`] keyed by destination address; encoding turns a dense tile grid back into an
//! equivalent stream.

pub mod command;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod tilemap;
pub mod window;

pub use crate::{
    decoder::{decode, decode_counted},
    encoder::{encode, encode_map},
    error::{CodecError, EncodeError, MalformedStream},
    tilemap::SparseTilemap,
    window::{Address, RowFraming, TileId, TilemapLayout, TilemapWindow, WindowError, SCREEN_WIDTH_TILES},
};
