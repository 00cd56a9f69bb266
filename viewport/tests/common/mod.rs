//! Recording doubles for the host platform and the rendering backend.

#![allow(dead_code)]

use viewport::{
    BasicMaterial, BoxGeometry, FrameHandle, Host, HostError, ListenerId, PerspectiveCamera,
    RenderError, Renderer, Scene, Viewport, WindowSize,
};

/// A host with an optional mount point, one window and a frame queue.
pub struct TestHost {
    pub size: WindowSize,
    pub mount_point: Option<Vec<String>>,
    pub listeners: Vec<ListenerId>,
    pub pending_frames: Vec<FrameHandle>,
    pub cancelled_frames: Vec<FrameHandle>,
    pub fail_listener: bool,
    pub fail_detach: bool,
    next_id: i32,
}

impl TestHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: WindowSize::new(width, height),
            mount_point: Some(Vec::new()),
            listeners: Vec::new(),
            pending_frames: Vec::new(),
            cancelled_frames: Vec::new(),
            fail_listener: false,
            fail_detach: false,
            next_id: 1,
        }
    }

    pub fn without_mount_point(width: u32, height: u32) -> Self {
        Self {
            mount_point: None,
            ..Self::new(width, height)
        }
    }

    pub fn children(&self) -> &[String] {
        self.mount_point.as_deref().unwrap_or(&[])
    }

    /// Change the window size and fire every registered resize listener.
    pub fn resize(&mut self, viewport: &mut Viewport<TestRenderer>, width: u32, height: u32) {
        self.size = WindowSize::new(width, height);
        for _ in 0..self.listeners.len() {
            viewport.on_resize(&*self);
        }
    }

    /// Run the frame callbacks that are due, as a display refresh would.
    pub fn tick(&mut self, viewport: &mut Viewport<TestRenderer>) {
        let due: Vec<FrameHandle> = self.pending_frames.drain(..).collect();
        for _ in due {
            viewport.on_frame(self);
        }
    }
}

impl Host for TestHost {
    type Element = String;

    fn window_size(&self) -> WindowSize {
        self.size
    }

    fn has_mount_point(&self) -> bool {
        self.mount_point.is_some()
    }

    fn append_to_mount_point(&mut self, element: &String) -> Result<(), HostError> {
        let children = self
            .mount_point
            .as_mut()
            .ok_or_else(|| HostError::new("no mount point"))?;
        children.push(element.clone());
        Ok(())
    }

    fn is_mounted_child(&self, element: &String) -> bool {
        self.children().contains(element)
    }

    fn remove_from_mount_point(&mut self, element: &String) -> Result<(), HostError> {
        if self.fail_detach {
            return Err(HostError::new("detach refused"));
        }
        let children = self
            .mount_point
            .as_mut()
            .ok_or_else(|| HostError::new("no mount point"))?;
        let index = children
            .iter()
            .position(|child| child == element)
            .ok_or_else(|| HostError::new("not a child"))?;
        children.remove(index);
        Ok(())
    }

    fn add_resize_listener(&mut self) -> Result<ListenerId, HostError> {
        if self.fail_listener {
            return Err(HostError::new("listener registration refused"));
        }
        let id = ListenerId(self.next_id as u32);
        self.next_id += 1;
        self.listeners.push(id);
        Ok(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|listener| *listener != id);
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending_frames.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending_frames.retain(|frame| *frame != handle);
        self.cancelled_frames.push(handle);
    }
}

/// Counts every call the viewport makes on its renderer.
#[derive(Default)]
pub struct TestRenderer {
    pub element: String,
    pub size: Option<WindowSize>,
    pub clear_color: Option<[f32; 4]>,
    pub renders: u32,
    pub last_rotation: Option<glam::Vec3>,
    pub last_aspect: Option<f32>,
    pub geometry_disposals: u32,
    pub material_disposals: u32,
    pub renderer_disposals: u32,
    pub fail_render: bool,
    /// Renders that fail before the surface comes back.
    pub lost_frames: u32,
}

impl TestRenderer {
    pub fn new() -> Self {
        Self {
            element: "canvas-0".to_string(),
            ..Default::default()
        }
    }
}

impl Renderer for TestRenderer {
    type Output = String;

    fn output_element(&self) -> &String {
        &self.element
    }

    fn set_size(&mut self, size: WindowSize) {
        self.size = Some(size);
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = Some(color);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.renderer_disposals > 0 {
            return Err(RenderError::Disposed);
        }
        if self.fail_render {
            return Err(RenderError::SurfaceUnavailable("lost".into()));
        }
        if self.lost_frames > 0 {
            self.lost_frames -= 1;
            return Err(RenderError::SurfaceUnavailable("outdated".into()));
        }
        self.renders += 1;
        self.last_rotation = scene.meshes().next().map(|mesh| mesh.rotation);
        self.last_aspect = Some(camera.aspect);
        Ok(())
    }

    fn dispose_geometry(&mut self, _geometry: &BoxGeometry) {
        self.geometry_disposals += 1;
    }

    fn dispose_material(&mut self, _material: &BasicMaterial) {
        self.material_disposals += 1;
    }

    fn dispose(&mut self) {
        self.renderer_disposals += 1;
    }
}
