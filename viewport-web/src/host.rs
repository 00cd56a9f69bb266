//! DOM host
//!
//! The mount point is an existing element, the renderer's output is a
//! `<canvas>`, resize notifications come from the window's `resize` event and
//! frames from `requestAnimationFrame`. The callbacks are created once by the
//! caller and registered/unregistered here as the viewport asks.

use viewport::{FrameHandle, Host, HostError, ListenerId, WindowSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement};

pub struct WebHost {
    window: web_sys::Window,
    mount_point: Option<Element>,
    on_resize: Closure<dyn FnMut()>,
    on_frame: Closure<dyn FnMut(f64)>,
    resize_listener: Option<ListenerId>,
    next_listener: u32,
}

impl WebHost {
    pub fn new(
        window: web_sys::Window,
        mount_point: Option<Element>,
        on_resize: Closure<dyn FnMut()>,
        on_frame: Closure<dyn FnMut(f64)>,
    ) -> Self {
        Self {
            window,
            mount_point,
            on_resize,
            on_frame,
            resize_listener: None,
            next_listener: 1,
        }
    }

    /// `window.innerWidth x window.innerHeight`, 0x0 if unavailable.
    pub fn inner_size(window: &web_sys::Window) -> WindowSize {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };
        WindowSize::new(dimension(window.inner_width()), dimension(window.inner_height()))
    }
}

fn js_error(context: &str, e: JsValue) -> HostError {
    HostError::new(format!("{}: {:?}", context, e))
}

impl Host for WebHost {
    type Element = HtmlCanvasElement;

    fn window_size(&self) -> WindowSize {
        Self::inner_size(&self.window)
    }

    fn has_mount_point(&self) -> bool {
        self.mount_point.is_some()
    }

    fn append_to_mount_point(&mut self, element: &HtmlCanvasElement) -> Result<(), HostError> {
        let mount_point = self
            .mount_point
            .as_ref()
            .ok_or_else(|| HostError::new("No mount point"))?;
        mount_point
            .append_child(element)
            .map_err(|e| js_error("Failed to append canvas", e))?;
        Ok(())
    }

    fn is_mounted_child(&self, element: &HtmlCanvasElement) -> bool {
        let (Some(mount_point), Some(parent)) = (&self.mount_point, element.parent_node()) else {
            return false;
        };
        parent.is_same_node(Some(mount_point))
    }

    fn remove_from_mount_point(&mut self, element: &HtmlCanvasElement) -> Result<(), HostError> {
        let mount_point = self
            .mount_point
            .as_ref()
            .ok_or_else(|| HostError::new("No mount point"))?;
        mount_point
            .remove_child(element)
            .map_err(|e| js_error("Failed to remove canvas", e))?;
        Ok(())
    }

    fn add_resize_listener(&mut self) -> Result<ListenerId, HostError> {
        self.window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
            .map_err(|e| js_error("Failed to add resize listener", e))?;

        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.resize_listener = Some(id);
        Ok(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        if self.resize_listener != Some(id) {
            return;
        }
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove resize listener: {:?}", e);
        }
        self.resize_listener = None;
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let id = self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
            .map_err(|e| js_error("requestAnimationFrame failed", e))?;
        Ok(FrameHandle(id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}
