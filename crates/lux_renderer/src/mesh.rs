//! Triangle soup as produced by a model loader.
//!
//! [`TriangleMesh`] holds the raw buffers. [`TriangleMesh::build`] validates
//! them and turns every face into a [`Triangle`] under a BVH of its own.

use crate::error::MeshError;
use crate::{BvhNode, Hittable, MaterialId, Triangle};
use lux_math::{Vec2, Vec3};

/// Indexed triangles with optional per-vertex attributes.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals, interpolated across each face when present
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates, one per vertex
    pub uvs: Option<Vec<Vec2>>,

    /// Vertex indices, three per face
    pub faces: Vec<[u32; 3]>,

    /// Material of each face
    pub materials: Vec<MaterialId>,
}

impl TriangleMesh {
    /// Mesh with a single material on every face.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>, material: MaterialId) -> Self {
        let materials = vec![material; faces.len()];
        Self {
            positions,
            normals: None,
            uvs: None,
            faces,
            materials,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Check buffer sizes and face indices.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.faces.is_empty() {
            return Err(MeshError::Empty);
        }

        let len = self.positions.len();
        if let Some(normals) = &self.normals {
            if normals.len() != len {
                return Err(MeshError::AttributeCountMismatch {
                    attribute: "normal",
                    expected: len,
                    found: normals.len(),
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != len {
                return Err(MeshError::AttributeCountMismatch {
                    attribute: "uv",
                    expected: len,
                    found: uvs.len(),
                });
            }
        }
        if self.materials.len() != self.faces.len() {
            return Err(MeshError::MaterialCountMismatch {
                expected: self.faces.len(),
                found: self.materials.len(),
            });
        }

        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= len) {
                return Err(MeshError::IndexOutOfRange { face, index, len });
            }
        }

        Ok(())
    }

    /// Recenter on the bounding box center and scale so the longest
    /// half-extent becomes 1.
    ///
    /// Normals are direction-only and stay untouched. A mesh collapsed to a
    /// single point is only recentered.
    pub fn normalize_to_unit_cube(&mut self) {
        if self.positions.is_empty() {
            return;
        }

        let (min, max) = self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let center = (min + max) * 0.5;
        let half_extent = (max - min).max_element() * 0.5;
        let scale = if half_extent > 0.0 { 1.0 / half_extent } else { 1.0 };

        for p in &mut self.positions {
            *p = (*p - center) * scale;
        }
    }

    /// Validate and build one triangle per face under a BVH.
    pub fn build(self) -> Result<BvhNode, MeshError> {
        self.validate()?;

        let mut triangles: Vec<Box<dyn Hittable>> = Vec::with_capacity(self.faces.len());
        for (face, material) in self.faces.iter().zip(&self.materials) {
            let [a, b, c] = face.map(|i| i as usize);
            let mut triangle =
                Triangle::new(self.positions[a], self.positions[b], self.positions[c], *material);
            if let Some(normals) = &self.normals {
                triangle = triangle.with_vertex_normals([normals[a], normals[b], normals[c]]);
            }
            if let Some(uvs) = &self.uvs {
                triangle = triangle.with_uvs([uvs[a], uvs[b], uvs[c]]);
            }
            triangles.push(Box::new(triangle));
        }

        log::info!(
            "Built mesh: {} vertices, {} triangles{}{}",
            self.positions.len(),
            triangles.len(),
            if self.normals.is_some() { ", normals" } else { "" },
            if self.uvs.is_some() { ", uvs" } else { "" },
        );

        Ok(BvhNode::new(triangles))
    }
}
