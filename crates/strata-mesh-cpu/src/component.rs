use strata_geom::{Aabb, Vec2, Vec3};

/// Vertex and index buffers for one mesh chunk, ready for a renderer or collision cooker.
///
/// All per-vertex arrays have the same length. `triangles` holds three indices per triangle
/// and is left empty by update-only builds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentData {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub triangles: Vec<u32>,
}

impl ComponentData {
    /// Empty buffers sized for an `n x n` vertex section.
    pub fn with_section_capacity(n: usize) -> Self {
        let mut data = Self::default();
        data.reserve_section(n);
        data
    }

    /// Clears all arrays but retains capacity for reuse across builds.
    pub fn clear_keep_capacity(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.normals.clear();
        self.tangents.clear();
        self.triangles.clear();
    }

    pub fn reserve_section(&mut self, n: usize) {
        let quads = n.saturating_sub(1).pow(2);
        self.vertices.reserve(n * n);
        self.uvs.reserve(n * n);
        self.normals.reserve(n * n);
        self.tangents.reserve(n * n);
        self.triangles.reserve(quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// True when every per-vertex array matches and every index is in range.
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len();
        self.uvs.len() == n
            && self.normals.len() == n
            && self.tangents.len() == n
            && self.triangles.len() % 3 == 0
            && self.triangles.iter().all(|&i| (i as usize) < n)
    }
}

/// Triangle soup handed to a physics cooker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl CollisionMesh {
    /// Copies positions and groups the index buffer into triangles.
    pub fn from_component(data: &ComponentData) -> Self {
        Self {
            vertices: data.vertices.clone(),
            triangles: data
                .triangles
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
        }
    }
}
