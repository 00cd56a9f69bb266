//! BasicMaterial - Unlit, single-color surface

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

impl MaterialId {
    fn next() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        MaterialId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Flat color, ignores lighting.
#[derive(Debug, Clone)]
pub struct BasicMaterial {
    id: MaterialId,
    pub(crate) color: [f32; 4],
}

impl BasicMaterial {
    /// Create a material from a 0xRRGGBB color.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::from_rgba([channel(16), channel(8), channel(0), 1.0])
    }

    /// RGBA, values 0.0 to 1.0.
    pub fn from_rgba(color: [f32; 4]) -> Self {
        Self {
            id: MaterialId::next(),
            color,
        }
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self::from_rgba([1.0, 1.0, 1.0, 1.0])
    }
}
