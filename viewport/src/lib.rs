//! viewport - A spinning cube that knows how to mount and unmount itself
//!
//! The core is platform-agnostic. It owns the scene, the camera and a
//! [`Renderer`], and drives them through a [`Host`] that provides the window
//! size, the mount point, resize notifications and frame scheduling.
//!
//! - **Web**: `viewport-web` mounts into a DOM element and paces frames with
//!   `requestAnimationFrame`.
//! - **Native**: `viewport-shell` mounts into a winit window and paces frames
//!   with `request_redraw`.
//!
//! # Example
//!
//! ```rust,ignore
//! use viewport::{Viewport, ViewportConfig};
//!
//! let mut viewport = Viewport::new(ViewportConfig::default(), renderer);
//! viewport.mount(&mut host)?;
//!
//! // host callbacks
//! viewport.on_resize(&host);
//! viewport.on_frame(&mut host);
//!
//! viewport.unmount(&mut host);
//! ```

pub mod camera;
pub mod config;
mod error;
pub mod geometry;
pub mod host;
pub mod material;
pub mod renderer;
pub mod scene;
mod viewport;

pub use camera::PerspectiveCamera;
pub use config::{AnimationConfig, CameraConfig, CubeConfig, ViewportConfig};
pub use error::{HostError, RenderError, ViewportError};
pub use geometry::{BoxGeometry, GeometryId, Vertex};
pub use host::{FrameHandle, Host, ListenerId, WindowSize};
pub use material::{BasicMaterial, MaterialId};
pub use renderer::Renderer;
pub use scene::{Mesh, MeshId, Scene};
pub use viewport::{MountStatus, Viewport, ViewportState};
