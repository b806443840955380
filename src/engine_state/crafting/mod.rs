//! # Crafting
//!
//! Shaped crafting recipes: a 3x3 grid of optional ingredient identifiers
//! mapped to a result. Recipes are registered once at start-up and looked up
//! by the crafting collaborator.
//!
//! A recipe matches wherever its shape sits inside the crafting grid; both the
//! pattern and the candidate grid are shifted to the top-left corner before
//! they are compared.

use serde::{Deserialize, Serialize};

use crate::error::VoxelError;

/// Bundled recipes of the base game.
const DEFAULT_RECIPES: &str = include_str!("../../../assets/recipes.json");

/// A 3x3 grid of optional item identifiers.
pub type CraftingGrid = [[Option<String>; 3]; 3];

/// What a recipe or a smelting operation produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingResult {
    /// Identifier of the produced item or block.
    pub identifier: String,
    /// How many are produced at once.
    pub quantity: u32,
}

impl CraftingResult {
    pub fn new(identifier: impl Into<String>, quantity: u32) -> Self {
        CraftingResult {
            identifier: identifier.into(),
            quantity,
        }
    }
}

/// A shaped recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingRecipe {
    /// Row-major ingredient layout; `None` is an empty slot.
    pub pattern: CraftingGrid,
    pub result: CraftingResult,
}

impl CraftingRecipe {
    pub fn new(pattern: CraftingGrid, result: CraftingResult) -> Self {
        CraftingRecipe { pattern, result }
    }

    /// Whether `grid` holds this recipe's shape, anywhere in the grid.
    pub fn matches(&self, grid: &CraftingGrid) -> bool {
        normalize(&self.pattern) == normalize(grid)
    }
}

/// Append-only list of recipes.
#[derive(Clone, Debug, Default)]
pub struct RecipeRegistry {
    recipes: Vec<CraftingRecipe>,
}

impl RecipeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the bundled recipes.
    pub fn with_default_recipes() -> Result<Self, VoxelError> {
        Self::from_json_str(DEFAULT_RECIPES)
    }

    /// Parses a JSON array of recipes.
    pub fn from_json_str(json: &str) -> Result<Self, VoxelError> {
        let recipes: Vec<CraftingRecipe> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for recipe in recipes {
            registry.register(recipe);
        }
        Ok(registry)
    }

    /// Adds a recipe. Earlier registrations win when shapes collide.
    pub fn register(&mut self, recipe: CraftingRecipe) {
        self.recipes.push(recipe);
    }

    /// Finds the result for the ingredients laid out in `grid`.
    ///
    /// # Arguments
    /// * `grid` - The contents of the crafting grid
    ///
    /// # Returns
    /// The result of the first registered recipe with the same shape, if any
    pub fn find(&self, grid: &CraftingGrid) -> Option<&CraftingResult> {
        let shape = normalize(grid);
        self.recipes
            .iter()
            .find(|recipe| normalize(&recipe.pattern) == shape)
            .map(|recipe| &recipe.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CraftingRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Shifts the occupied slots of `grid` to the top-left corner.
fn normalize(grid: &CraftingGrid) -> CraftingGrid {
    let occupied = |row: usize, column: usize| grid[row][column].is_some();
    let top = (0..3).find(|&row| (0..3).any(|column| occupied(row, column)));
    let left = (0..3).find(|&column| (0..3).any(|row| occupied(row, column)));

    let mut shifted = CraftingGrid::default();
    let (Some(top), Some(left)) = (top, left) else {
        return shifted;
    };

    for row in top..3 {
        for column in left..3 {
            shifted[row - top][column - left] = grid[row][column].clone();
        }
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: [[&str; 3]; 3]) -> CraftingGrid {
        rows.map(|row| row.map(|slot| (!slot.is_empty()).then(|| slot.to_string())))
    }

    fn torch() -> CraftingRecipe {
        CraftingRecipe::new(
            grid([["coal", "", ""], ["stick", "", ""], ["", "", ""]]),
            CraftingResult::new("torch", 4),
        )
    }

    #[test]
    fn test_shape_matches_anywhere_in_grid() {
        let recipe = torch();
        assert!(recipe.matches(&grid([["", "", ""], ["", "", "coal"], ["", "", "stick"]])));
        assert!(recipe.matches(&grid([["", "coal", ""], ["", "stick", ""], ["", "", ""]])));
        assert!(!recipe.matches(&grid([["coal", "", ""], ["", "stick", ""], ["", "", ""]])));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = RecipeRegistry::new();
        registry.register(torch());
        let mut shadowed = torch();
        shadowed.result = CraftingResult::new("lantern", 1);
        registry.register(shadowed);

        let result = registry.find(&torch().pattern);
        assert_eq!(result, Some(&CraftingResult::new("torch", 4)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_grid_matches_nothing() {
        let registry = RecipeRegistry::with_default_recipes().unwrap();
        assert_eq!(registry.find(&CraftingGrid::default()), None);
    }

    #[test]
    fn test_default_recipes_resolve_to_themselves() {
        let registry = RecipeRegistry::with_default_recipes().unwrap();
        assert_eq!(registry.len(), 38);

        for recipe in registry.iter() {
            assert_eq!(registry.find(&recipe.pattern), Some(&recipe.result));
        }
    }
}
