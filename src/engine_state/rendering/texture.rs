//! Texture atlas lookups for the mesher.
//!
//! The atlas itself (the stitched image) belongs to the rendering
//! collaborator. The mesher only asks where a named tile lives.

use std::collections::HashMap;

use crate::error::VoxelError;

/// The bundled tile list, in atlas order.
const DEFAULT_TILES: &str = include_str!("../../../assets/atlas.json");

/// UV corners of one tile, in the order faces list their corners.
pub type TileUvs = [[f32; 2]; 4];

/// Resolves texture keys such as `grass_top` to atlas UVs.
pub trait UvLookup: Send + Sync {
    /// The tile's corners, or `None` if the atlas has no such tile.
    fn uvs(&self, key: &str) -> Option<TileUvs>;
}

/// An atlas of equally sized tiles laid out row by row in a square grid.
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    tiles: HashMap<String, TileUvs>,
}

impl TextureAtlas {
    /// Lays the named tiles out in the smallest square grid that fits them.
    ///
    /// # Arguments
    /// * `names` - Tile names in atlas order
    ///
    /// # Returns
    /// An atlas mapping each name to its cell of the grid
    pub fn from_tile_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let side = (names.len() as f64).sqrt().ceil().max(1.0) as usize;
        let step = 1.0 / side as f32;

        let tiles = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let u = (index % side) as f32 * step;
                let v = (index / side) as f32 * step;
                (
                    name,
                    [[u, v], [u + step, v], [u + step, v + step], [u, v + step]],
                )
            })
            .collect();

        TextureAtlas { tiles }
    }

    /// Parses a JSON array of tile names.
    pub fn from_json_str(json: &str) -> Result<Self, VoxelError> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_tile_names(names))
    }

    /// The atlas of the bundled block textures.
    pub fn with_default_tiles() -> Result<Self, VoxelError> {
        Self::from_json_str(DEFAULT_TILES)
    }

    /// Adds or replaces a tile.
    pub fn insert(&mut self, key: impl Into<String>, uvs: TileUvs) {
        self.tiles.insert(key.into(), uvs);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl UvLookup for TextureAtlas {
    fn uvs(&self, key: &str) -> Option<TileUvs> {
        self.tiles.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_fill_a_square_grid() {
        let atlas = TextureAtlas::from_tile_names(["a", "b", "c", "d", "e"]);
        assert_eq!(atlas.len(), 5);
        // Five tiles need a 3x3 grid.
        let third = 1.0 / 3.0;
        assert_eq!(atlas.uvs("a").unwrap()[0], [0.0, 0.0]);
        assert_eq!(atlas.uvs("d").unwrap()[0], [0.0, third]);
        assert_eq!(atlas.uvs("e").unwrap()[2], [2.0 * third, 2.0 * third]);
        assert!(atlas.uvs("f").is_none());
    }

    #[test]
    fn default_tiles_cover_sided_blocks() {
        let atlas = TextureAtlas::with_default_tiles().unwrap();
        for key in ["grass_top", "grass_side", "log_top", "furnace_front", "coal_ore", "leaves"] {
            assert!(atlas.uvs(key).is_some(), "missing {key}");
        }
    }
}
