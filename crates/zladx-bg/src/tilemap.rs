use std::collections::{btree_map, BTreeMap};

use crate::window::{Address, TileId, TilemapWindow, WindowError};

// -------------------------------------------------------------------------------------------------

/// Decoded background data, keyed by destination address.
///
/// Addresses that no command wrote to are simply absent. Iteration always
/// goes in ascending address order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SparseTilemap {
    window: TilemapWindow,
    tiles:  BTreeMap<Address, TileId>,
}

// -------------------------------------------------------------------------------------------------

impl SparseTilemap {
    pub fn new(window: TilemapWindow) -> Self {
        Self { window, tiles: BTreeMap::new() }
    }

    /// Lays `tiles` out at consecutive addresses starting at `start`.
    pub fn from_dense(window: TilemapWindow, start: Address, tiles: &[TileId]) -> Result<Self, WindowError> {
        let mut map = Self::new(window);
        for (address, &tile) in (u32::from(start)..).zip(tiles) {
            map.insert_wide(address, tile)?;
        }
        Ok(map)
    }

    /// Returns the tile previously stored at `address`, if any.
    pub fn insert(&mut self, address: Address, tile: TileId) -> Result<Option<TileId>, WindowError> {
        self.insert_wide(u32::from(address), tile)
    }

    fn insert_wide(&mut self, address: u32, tile: TileId) -> Result<Option<TileId>, WindowError> {
        if !self.window.contains(address) {
            return Err(WindowError::AddressOutOfWindow { address, window: self.window });
        }
        Ok(self.tiles.insert(address as Address, tile))
    }

    /// Caller guarantees that `address` was checked against the window.
    pub(crate) fn insert_unchecked(&mut self, address: u32, tile: TileId) {
        debug_assert!(self.window.contains(address));
        self.tiles.insert(address as Address, tile);
    }

    #[inline]
    pub fn get(&self, address: Address) -> Option<TileId> {
        self.tiles.get(&address).copied()
    }

    #[inline]
    pub fn window(&self) -> TilemapWindow {
        self.window
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, TileId)> + '_ {
        self.tiles.iter().map(|(&address, &tile)| (address, tile))
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.tiles.keys().copied()
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.values().copied()
    }

    /// Tile bytes in ascending address order, with gaps collapsed.
    pub fn to_dense(&self) -> Vec<TileId> {
        self.tiles().collect()
    }
}

impl IntoIterator for SparseTilemap {
    type IntoIter = btree_map::IntoIter<Address, TileId>;
    type Item = (Address, TileId);

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.into_iter()
    }
}

// -------------------------------------------------------------------------------------------------
