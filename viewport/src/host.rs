//! Host - The platform a viewport is mounted into
//!
//! A host owns the actual platform callbacks. The viewport only asks it to
//! register or remove them; when they fire, the host calls back into
//! [`crate::Viewport::on_resize`] and [`crate::Viewport::on_frame`].

use crate::HostError;

/// Inner window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height. A collapsed window reports 1.0 instead of infinity.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Registration returned by [`Host::add_resize_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// A scheduled frame callback, cancellable with [`Host::cancel_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait Host {
    /// The element type the renderer produces (a canvas, a window, ...).
    type Element;

    fn window_size(&self) -> WindowSize;

    /// Whether the element the viewport should attach to exists.
    fn has_mount_point(&self) -> bool;

    fn append_to_mount_point(&mut self, element: &Self::Element) -> Result<(), HostError>;

    /// Whether `element` is currently a direct child of the mount point.
    fn is_mounted_child(&self, element: &Self::Element) -> bool;

    fn remove_from_mount_point(&mut self, element: &Self::Element) -> Result<(), HostError>;

    fn add_resize_listener(&mut self) -> Result<ListenerId, HostError>;

    fn remove_resize_listener(&mut self, id: ListenerId);

    /// Schedule one call to `on_frame` at the next display refresh.
    fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

    fn cancel_frame(&mut self, handle: FrameHandle);
}
