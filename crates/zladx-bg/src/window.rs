use std::{fmt, ops::Range};

use thiserror::Error;

// -------------------------------------------------------------------------------------------------

/// Game Boy address of a single background map entry.
pub type Address = u16;

/// Opaque index of an 8x8 tile.
pub type TileId = u8;

/// First entry of background map 0.
pub const BG_MAP_BASE: Address = 0x9800;
/// Background maps 0 and 1 together.
pub const BG_MAP_WINDOW_SIZE: usize = 0x800;
/// Distance between two vertically adjacent entries of a background map.
pub const BG_MAP_ROW_STRIDE: u32 = 0x20;
/// Visible screen width in tiles.
pub const SCREEN_WIDTH_TILES: usize = 20;

const ADDRESS_SPACE_END: u32 = 0x10000;

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("Tilemap window cannot be empty")]
    Empty,
    #[error("Tilemap window base {0:#06x} has a zero high byte, which is reserved for the terminator")]
    ZeroHighByte(Address),
    #[error("Tilemap window {base:#06x} + {size:#x} runs past the end of the address space")]
    Overflow { base: Address, size: usize },
    #[error("Address {address:#06x} lies outside the tilemap window {window}")]
    AddressOutOfWindow { address: u32, window: TilemapWindow },
}

// -------------------------------------------------------------------------------------------------

/// Addressable range `[base, base + size)` that a background stream may write to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TilemapWindow {
    base: Address,
    size: usize,
}

impl TilemapWindow {
    pub fn new(base: Address, size: usize) -> Result<Self, WindowError> {
        if size == 0 {
            return Err(WindowError::Empty);
        }
        if base >> 8 == 0 {
            return Err(WindowError::ZeroHighByte(base));
        }
        if u32::from(base) as usize + size > ADDRESS_SPACE_END as usize {
            return Err(WindowError::Overflow { base, size });
        }
        Ok(Self { base, size })
    }

    #[inline]
    pub fn base(&self) -> Address {
        self.base
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// One past the last addressable entry.
    #[inline]
    pub fn end(&self) -> u32 {
        u32::from(self.base) + self.size as u32
    }

    pub fn range(&self) -> Range<u32> {
        u32::from(self.base)..self.end()
    }

    #[inline]
    pub fn contains(&self, address: u32) -> bool {
        self.range().contains(&address)
    }

    /// Checks that `length` entries written from `start` with the given step all land inside the window.
    pub fn contains_span(&self, start: u32, length: usize, stride: u32) -> bool {
        if length == 0 {
            return true;
        }
        let last = u64::from(start) + (length as u64 - 1) * u64::from(stride);
        self.contains(start) && last < u64::from(self.end())
    }
}

impl Default for TilemapWindow {
    fn default() -> Self {
        Self { base: BG_MAP_BASE, size: BG_MAP_WINDOW_SIZE }
    }
}

impl fmt::Display for TilemapWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#06x}, {:#06x})", self.base, self.end())
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RowFraming {
    /// Input must consist of whole rows.
    Rows,
    /// Any input length is accepted.
    #[default]
    Linear,
}

/// Where a dense tile grid lives and how wide its rows are.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TilemapLayout {
    pub window:  TilemapWindow,
    pub width:   usize,
    pub framing: RowFraming,
}

impl TilemapLayout {
    pub fn new(window: TilemapWindow, width: usize) -> Self {
        Self { window, width, framing: RowFraming::default() }
    }

    #[must_use]
    pub fn with_framing(self, framing: RowFraming) -> Self {
        Self { framing, ..self }
    }

    #[inline]
    pub fn base_address(&self) -> Address {
        self.window.base()
    }
}

impl Default for TilemapLayout {
    fn default() -> Self {
        Self::new(TilemapWindow::default(), SCREEN_WIDTH_TILES)
    }
}

// -------------------------------------------------------------------------------------------------
