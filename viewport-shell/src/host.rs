//! Window host - A winit window standing in for the DOM
//!
//! The window is both the mount point and, once attached, the renderer's
//! output element. Resize events and redraws come from the event loop; the
//! host only records whether the viewport asked for them.

use std::sync::Arc;

use viewport::{FrameHandle, Host, HostError, ListenerId, WindowSize};
use winit::window::Window;

pub struct WindowHost {
    window: Arc<Window>,
    attached: Option<Arc<Window>>,
    resize_listener: Option<ListenerId>,
    pending_frame: Option<FrameHandle>,
    next_id: i32,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: None,
            resize_listener: None,
            pending_frame: None,
            next_id: 1,
        }
    }

    /// Whether resize events should reach the viewport.
    pub fn is_listening_for_resize(&self) -> bool {
        self.resize_listener.is_some()
    }

    /// Consume the pending frame, if any. Redraws nobody asked for return false.
    pub fn take_due_frame(&mut self) -> bool {
        self.pending_frame.take().is_some()
    }

    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Host for WindowHost {
    type Element = Arc<Window>;

    fn window_size(&self) -> WindowSize {
        let size = self.window.inner_size();
        WindowSize::new(size.width, size.height)
    }

    fn has_mount_point(&self) -> bool {
        true
    }

    fn append_to_mount_point(&mut self, element: &Arc<Window>) -> Result<(), HostError> {
        if !Arc::ptr_eq(element, &self.window) {
            return Err(HostError::new("renderer output belongs to a different window"));
        }
        self.attached = Some(element.clone());
        self.window.set_visible(true);
        Ok(())
    }

    fn is_mounted_child(&self, element: &Arc<Window>) -> bool {
        self.attached
            .as_ref()
            .is_some_and(|attached| Arc::ptr_eq(attached, element))
    }

    fn remove_from_mount_point(&mut self, element: &Arc<Window>) -> Result<(), HostError> {
        if !self.is_mounted_child(element) {
            return Err(HostError::new("renderer output is not attached"));
        }
        self.attached = None;
        self.window.set_visible(false);
        Ok(())
    }

    fn add_resize_listener(&mut self) -> Result<ListenerId, HostError> {
        let id = ListenerId(self.next_id() as u32);
        self.resize_listener = Some(id);
        Ok(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        if self.resize_listener == Some(id) {
            self.resize_listener = None;
        }
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let handle = FrameHandle(self.next_id());
        self.pending_frame = Some(handle);
        self.window.request_redraw();
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }
}
