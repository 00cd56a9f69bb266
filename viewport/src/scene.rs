//! Scene - Flat container of meshes
//!
//! No hierarchy: every mesh is positioned in world space.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::{BasicMaterial, BoxGeometry};

/// Handle to a mesh inside a [`Scene`]. Only meaningful for the scene that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

/// Geometry + material pair with a transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: BasicMaterial,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
}

impl Mesh {
    pub fn new(geometry: BoxGeometry, material: BasicMaterial) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<(MeshId, Mesh)>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.push((id, mesh));
        id
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|(mesh_id, _)| *mesh_id == id).map(|(_, mesh)| mesh)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|(mesh_id, _)| *mesh_id == id).map(|(_, mesh)| mesh)
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Mesh> {
        let index = self.meshes.iter().position(|(mesh_id, _)| *mesh_id == id)?;
        Some(self.meshes.remove(index).1)
    }

    /// Meshes in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().map(|(_, mesh)| mesh)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Remove every mesh, returning them for disposal.
    pub fn clear(&mut self) -> Vec<Mesh> {
        self.meshes.drain(..).map(|(_, mesh)| mesh).collect()
    }
}
