//! Render targets - Things a wgpu surface can be created from

use viewport::WindowSize;

/// An element the renderer draws into.
///
/// The renderer keeps one clone as its output element and hands another to
/// wgpu to create the surface.
pub trait RenderTarget: Clone + 'static {
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static>;

    /// Match the element's backing store to the new surface size.
    fn resize(&self, _size: WindowSize) {}
}

/// Native window; the OS already sized it.
#[cfg(not(target_arch = "wasm32"))]
impl RenderTarget for std::sync::Arc<winit::window::Window> {
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static> {
        self.clone().into()
    }
}

/// Browser canvas; its drawing buffer follows the `width`/`height` attributes.
#[cfg(target_arch = "wasm32")]
impl RenderTarget for web_sys::HtmlCanvasElement {
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static> {
        wgpu::SurfaceTarget::Canvas(self.clone())
    }

    fn resize(&self, size: WindowSize) {
        self.set_width(size.width);
        self.set_height(size.height);
    }
}
