//! wgpu renderer for viewport
//!
//! [`GpuRenderer`] implements [`viewport::Renderer`] on top of wgpu. It is
//! generic over the [`RenderTarget`] it draws into: an `Arc<winit::Window>`
//! natively, an `HtmlCanvasElement` on the web.

mod renderer;
mod target;

pub use renderer::GpuRenderer;
pub use target::RenderTarget;
