//! BoxGeometry - Procedural box mesh data
//!
//! Four vertices per face so each face keeps its own flat normal.

use std::sync::atomic::{AtomicU32, Ordering};

/// Process-unique id for a geometry, used by renderers to key GPU buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u32);

impl GeometryId {
    fn next() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        GeometryId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct BoxGeometry {
    id: GeometryId,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        let (vertices, indices) = build_box(width / 2.0, height / 2.0, depth / 2.0);
        Self {
            id: GeometryId::next(),
            width,
            height,
            depth,
            vertices,
            indices,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

fn build_box(hx: f32, hy: f32, hz: f32) -> (Vec<Vertex>, Vec<u16>) {
    // (normal, four corners in counter-clockwise order seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front face (+Z)
        ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
        // Back face (-Z)
        ([0.0, 0.0, -1.0], [[-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz], [hx, -hy, -hz]]),
        // Top face (+Y)
        ([0.0, 1.0, 0.0], [[-hx, hy, -hz], [-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz]]),
        // Bottom face (-Y)
        ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
        // Right face (+X)
        ([1.0, 0.0, 0.0], [[hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz], [hx, -hy, hz]]),
        // Left face (-X)
        ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u16;
        vertices.extend(corners.iter().map(|&position| Vertex { position, normal }));
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}
