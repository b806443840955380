//! Plain mesh buffers for one chunk.
//!
//! These are the only thing a meshing worker hands back: flat vectors the
//! rendering collaborator uploads on its own thread.

use cgmath::{InnerSpace, Vector3};

use super::face::Face;
use crate::engine_state::{
    rendering::{texture::TileUvs, Vertex},
    voxels::chunk::ChunkCoordinate,
};

/// Quad-to-triangle fan shared by every face.
const QUAD_TRIANGLES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// The surface mesh of one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// The chunk the mesh was built from.
    pub coordinate: ChunkCoordinate,
    /// Chunk-local vertex positions, four per face.
    pub vertices: Vec<[f32; 3]>,
    /// Atlas coordinates, one per vertex.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, six per face.
    pub triangles: Vec<u32>,
    /// Unit normals, one per vertex, derived from the triangles.
    pub normals: Vec<[f32; 3]>,
}

impl MeshBuffers {
    /// Creates an empty mesh for a chunk.
    pub fn new(coordinate: ChunkCoordinate) -> Self {
        MeshBuffers {
            coordinate,
            ..Default::default()
        }
    }

    /// Appends a face with the given tile corners.
    pub fn push_face(&mut self, face: &Face, uvs: TileUvs) {
        let base = self.vertices.len() as u32;
        for corner in face.corners {
            self.vertices
                .push([corner.x as f32, corner.y as f32, corner.z as f32]);
        }
        self.uvs.extend_from_slice(&uvs);
        self.triangles
            .extend(QUAD_TRIANGLES.iter().map(|index| base + index));
    }

    /// Number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Recomputes vertex normals from the triangle winding.
    ///
    /// Each triangle adds its area-weighted normal to its three vertices; the
    /// sums are then normalized. Vertices without triangles get a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];

        for triangle in self.triangles.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let (Some(pa), Some(pb), Some(pc)) =
                (self.vertices.get(a), self.vertices.get(b), self.vertices.get(c))
            else {
                continue;
            };
            let pa = Vector3::from(*pa);
            let normal = (Vector3::from(*pb) - pa).cross(Vector3::from(*pc) - pa);
            for index in [a, b, c] {
                sums[index] += normal;
            }
        }

        self.normals = sums
            .into_iter()
            .map(|sum| {
                if sum.magnitude2() > 0.0 {
                    sum.normalize().into()
                } else {
                    [0.0; 3]
                }
            })
            .collect();
    }

    /// The mesh as interleaved vertices, ready for a vertex buffer.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, position)| {
                Vertex::new(
                    *position,
                    self.normals.get(index).copied().unwrap_or([0.0; 3]),
                    self.uvs.get(index).copied().unwrap_or([0.0; 2]),
                )
            })
            .collect()
    }
}
