use strata_geom::Aabb;

use crate::component::ComponentData;

/// Consumer-side holder for one section's mesh.
///
/// `create` installs new topology; `update` swaps geometry in place and keeps the cached
/// index buffer. Revisions let a renderer tell the two apart.
#[derive(Clone, Debug, Default)]
pub struct MeshSlot {
    data: ComponentData,
    created: bool,
    topology_rev: u64,
    geometry_rev: u64,
}

impl MeshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, data: ComponentData) {
        self.data = data;
        self.created = true;
        self.topology_rev += 1;
        self.geometry_rev += 1;
    }

    /// Replaces per-vertex arrays. Returns false, leaving the slot untouched, if no mesh has
    /// been created yet or the vertex count changed.
    pub fn update(&mut self, data: ComponentData) -> bool {
        if !self.created {
            log::warn!(target: "mesh", "update on a slot with no mesh; create it first");
            return false;
        }
        if data.vertices.len() != self.data.vertices.len() {
            log::warn!(
                target: "mesh",
                "update vertex count {} does not match created mesh ({})",
                data.vertices.len(),
                self.data.vertices.len()
            );
            return false;
        }
        let ComponentData {
            vertices,
            uvs,
            normals,
            tangents,
            ..
        } = data;
        self.data.vertices = vertices;
        self.data.uvs = uvs;
        self.data.normals = normals;
        self.data.tangents = tangents;
        self.geometry_rev += 1;
        true
    }

    /// Creates on first use or when the incoming build carries topology, updates otherwise.
    pub fn apply(&mut self, data: ComponentData) -> bool {
        if !self.created || !data.triangles.is_empty() {
            self.create(data);
            true
        } else {
            self.update(data)
        }
    }

    pub fn clear(&mut self) {
        self.data.clear_keep_capacity();
        self.created = false;
        self.topology_rev += 1;
        self.geometry_rev += 1;
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        self.created
    }

    #[inline]
    pub fn data(&self) -> &ComponentData {
        &self.data
    }

    pub fn topology_revision(&self) -> u64 {
        self.topology_rev
    }

    pub fn geometry_revision(&self) -> u64 {
        self.geometry_rev
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.data.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::Vec3;

    fn quad(z: f32, with_tris: bool) -> ComponentData {
        let mut d = ComponentData::default();
        for y in 0..2 {
            for x in 0..2 {
                d.vertices.push(Vec3::new(x as f32, y as f32, z));
                d.uvs.push(strata_geom::Vec2::new(x as f32, y as f32));
                d.normals.push(Vec3::Z);
                d.tangents.push(Vec3::X);
            }
        }
        if with_tris {
            d.triangles = vec![0, 1, 3, 0, 3, 2];
        }
        d
    }

    #[test]
    fn update_before_create_is_rejected() {
        let mut slot = MeshSlot::new();
        assert!(!slot.update(quad(0.0, false)));
        assert!(!slot.is_created());
    }

    #[test]
    fn update_keeps_topology() {
        let mut slot = MeshSlot::new();
        slot.create(quad(0.0, true));
        let topo = slot.topology_revision();
        assert!(slot.update(quad(2.0, false)));
        assert_eq!(slot.topology_revision(), topo);
        assert_eq!(slot.data().triangles, vec![0, 1, 3, 0, 3, 2]);
        assert_eq!(slot.data().vertices[3].z, 2.0);
    }

    #[test]
    fn mismatched_update_leaves_slot_untouched() {
        let mut slot = MeshSlot::new();
        slot.create(quad(1.0, true));
        let mut bad = quad(5.0, false);
        bad.vertices.pop();
        assert!(!slot.update(bad));
        assert_eq!(slot.data().vertices[0].z, 1.0);
    }

    #[test]
    fn apply_switches_on_topology() {
        let mut slot = MeshSlot::new();
        assert!(slot.apply(quad(0.0, false)));
        assert_eq!(slot.topology_revision(), 1);
        assert!(slot.apply(quad(1.0, false)));
        assert_eq!(slot.topology_revision(), 1);
        assert_eq!(slot.geometry_revision(), 2);
        assert!(slot.apply(quad(1.0, true)));
        assert_eq!(slot.topology_revision(), 2);
    }
}
