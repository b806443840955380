use serde::{Deserialize, Serialize};

/// A named terrain-generation profile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    /// Rolling hills covered in trees.
    #[default]
    Forest,
    /// Rolling hills without trees.
    Plains,
    /// Nearly flat land, lowered slightly.
    Village,
    /// Primary land layer amplified.
    Mountains,
    /// Every land cell is sand.
    Desert,
}

impl Biome {
    /// Whether the tree decorator runs for chunks of this biome.
    pub fn permits_trees(self) -> bool {
        matches!(self, Biome::Forest)
    }

    /// Applies the biome's shaping to the primary land noise sample.
    pub fn shape_primary_land(self, sample: f64) -> f64 {
        match self {
            Biome::Village => sample - 2.0,
            Biome::Mountains => sample * 24.0,
            _ => sample * 10.0,
        }
    }
}
