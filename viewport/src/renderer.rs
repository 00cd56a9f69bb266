//! Renderer - The drawing backend a viewport drives

use crate::{BasicMaterial, BoxGeometry, PerspectiveCamera, RenderError, Scene, WindowSize};

pub trait Renderer {
    /// The node the renderer draws into; attached to the host's mount point.
    type Output;

    fn output_element(&self) -> &Self::Output;

    fn set_size(&mut self, size: WindowSize);

    /// RGBA, values 0.0 to 1.0.
    fn set_clear_color(&mut self, color: [f32; 4]);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;

    /// Release any GPU resources held for `geometry`.
    fn dispose_geometry(&mut self, geometry: &BoxGeometry);

    /// Release any GPU resources held for `material`.
    fn dispose_material(&mut self, material: &BasicMaterial);

    /// Release the surface and everything else. Rendering after this fails
    /// with [`RenderError::Disposed`].
    fn dispose(&mut self);
}
