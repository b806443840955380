//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, their outward
//! directions and how a block's [`Facing`] remaps a logical face onto the
//! geometric direction it ends up pointing at.

use cgmath::Vector3;

use super::Facing;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so it can index small
/// per-face tables.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative Z)
    FRONT = 0,

    /// The back face (facing positive Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns all six block faces in the order the mesher emits them.
    ///
    /// The order is: [TOP, BOTTOM, LEFT, RIGHT, FRONT, BACK]
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The unit offset from a cell to the neighbour this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, -1),
            BlockSide::BACK => Vector3::new(0, 0, 1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// The suffix used to build per-face texture keys, e.g. `grass_top`.
    pub fn texture_suffix(self) -> &'static str {
        match self {
            BlockSide::FRONT => "front",
            BlockSide::BACK => "back",
            BlockSide::BOTTOM => "bottom",
            BlockSide::TOP => "top",
            BlockSide::LEFT => "west",
            BlockSide::RIGHT => "east",
        }
    }

    /// Maps a logical face of a block onto the geometric face it occupies once
    /// the block is rotated to `facing`.
    ///
    /// `Up` is the identity. `North`/`South` tip the block about the X axis,
    /// `East`/`West` about the Z axis and `Down` turns it upside down.
    ///
    /// # Arguments
    /// * `facing` - The orientation stored on the cell
    ///
    /// # Returns
    /// The geometric face whose neighbour decides visibility and whose quad is emitted.
    pub fn rotated(self, facing: Facing) -> BlockSide {
        use BlockSide::*;

        match facing {
            Facing::Up => self,
            Facing::North => match self {
                TOP => BACK,
                BACK => BOTTOM,
                BOTTOM => FRONT,
                FRONT => TOP,
                side => side,
            },
            Facing::South => match self {
                TOP => FRONT,
                FRONT => BOTTOM,
                BOTTOM => BACK,
                BACK => TOP,
                side => side,
            },
            Facing::East => match self {
                TOP => RIGHT,
                RIGHT => BOTTOM,
                BOTTOM => LEFT,
                LEFT => TOP,
                side => side,
            },
            Facing::West => match self {
                TOP => LEFT,
                LEFT => BOTTOM,
                BOTTOM => RIGHT,
                RIGHT => TOP,
                side => side,
            },
            Facing::Down => match self {
                TOP => BOTTOM,
                BOTTOM => TOP,
                FRONT => BACK,
                BACK => FRONT,
                side => side,
            },
        }
    }
}
