use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;

/// A single unit quad on the surface of a cell.
///
/// Corners run counter-clockwise when seen from outside the cell, so the two
/// triangles `{0, 1, 3}` and `{1, 2, 3}` both face along the side's outward
/// direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Quad corners in chunk-local coordinates.
    pub corners: [Point3<i32>; 4],
    /// The geometric direction the face points at.
    pub side: BlockSide,
}

impl Face {
    /// Creates the face of the cell at `(x, y, z)` pointing along `side`.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Chunk-local coordinates of the cell
    /// * `side` - The geometric side, after any rotation of the cell
    ///
    /// # Returns
    /// The quad, with corners `c`, `c + a`, `c + a + b` and `c + b`
    pub fn new(x: i32, y: i32, z: i32, side: BlockSide) -> Self {
        let unit_x = Vector3::new(1, 0, 0);
        let unit_y = Vector3::new(0, 1, 0);
        let unit_z = Vector3::new(0, 0, 1);

        let (start, a, b) = match side {
            BlockSide::TOP => (unit_y, unit_z, unit_x),
            BlockSide::BOTTOM => (Vector3::new(0, 0, 0), unit_x, unit_z),
            BlockSide::RIGHT => (unit_x, unit_y, unit_z),
            BlockSide::LEFT => (Vector3::new(0, 0, 0), unit_z, unit_y),
            BlockSide::BACK => (unit_z, unit_x, unit_y),
            BlockSide::FRONT => (Vector3::new(0, 0, 0), unit_y, unit_x),
        };

        let c = Point3::new(x, y, z) + start;
        Face {
            corners: [c, c + a, c + a + b, c + b],
            side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::EuclideanSpace;

    #[test]
    fn every_face_winds_outwards() {
        for side in BlockSide::all() {
            let face = Face::new(2, 3, 4, side);
            let [v0, v1, _, v3] = face.corners.map(|p| p.cast::<f32>().unwrap().to_vec());
            let normal = (v1 - v0).cross(v3 - v0);
            assert_eq!(normal, side.offset().cast::<f32>().unwrap(), "{side:?}");
        }
    }

    #[test]
    fn faces_lie_on_the_cell_boundary() {
        let top = Face::new(0, 0, 0, BlockSide::TOP);
        assert!(top.corners.iter().all(|corner| corner.y == 1));
        let left = Face::new(5, 0, 0, BlockSide::LEFT);
        assert!(left.corners.iter().all(|corner| corner.x == 5));
        let right = Face::new(5, 0, 0, BlockSide::RIGHT);
        assert!(right.corners.iter().all(|corner| corner.x == 6));
    }
}
