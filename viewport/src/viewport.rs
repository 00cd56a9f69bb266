//! Viewport - Mount/unmount lifecycle around a scene, a camera and a renderer
//!
//! ```text
//!   Unmounted --mount--> Mounted --unmount--> Disposed
//!       |
//!       +--mount (no mount point)--> Unmounted
//! ```
//!
//! While mounted the viewport holds exactly one resize listener and at most
//! one pending frame. Both are released on unmount, so a frame callback that
//! still fires afterwards finds nothing to do.

use crate::{
    BasicMaterial, BoxGeometry, FrameHandle, Host, ListenerId, Mesh, MeshId, PerspectiveCamera,
    Renderer, Scene, ViewportConfig, ViewportError, WindowSize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportState {
    Unmounted,
    Mounted,
    /// Renderer released; the viewport cannot be mounted again.
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    Mounted,
    /// The host had nothing to attach to; nothing was created.
    MountPointMissing,
}

/// Resources that only exist while mounted.
struct Mounted {
    cube: MeshId,
    resize_listener: ListenerId,
    pending_frame: Option<FrameHandle>,
}

pub struct Viewport<R: Renderer> {
    config: ViewportConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    renderer: R,
    mounted: Option<Mounted>,
    disposed: bool,
    frame_count: u64,
}

impl<R: Renderer> Viewport<R> {
    /// Build the scene and camera and take ownership of the renderer.
    ///
    /// Nothing touches the host until [`Viewport::mount`].
    pub fn new(config: ViewportConfig, renderer: R) -> Self {
        let camera = PerspectiveCamera::from_config(&config.camera, 1.0);
        Self {
            config,
            scene: Scene::new(),
            camera,
            renderer,
            mounted: None,
            disposed: false,
            frame_count: 0,
        }
    }

    pub fn state(&self) -> ViewportState {
        match (&self.mounted, self.disposed) {
            (Some(_), _) => ViewportState::Mounted,
            (None, true) => ViewportState::Disposed,
            (None, false) => ViewportState::Unmounted,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The spinning cube, while mounted.
    pub fn cube(&self) -> Option<&Mesh> {
        self.mounted.as_ref().and_then(|m| self.scene.get(m.cube))
    }

    /// Frames successfully rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Attach to the host and start animating.
    ///
    /// Returns [`MountStatus::MountPointMissing`] without creating anything
    /// or registering listeners if the host has no mount point.
    pub fn mount<H>(&mut self, host: &mut H) -> Result<MountStatus, ViewportError>
    where
        H: Host<Element = R::Output>,
    {
        if self.disposed {
            return Err(ViewportError::Disposed);
        }
        if self.mounted.is_some() {
            return Err(ViewportError::AlreadyMounted);
        }
        if !host.has_mount_point() {
            log::warn!("No mount point, viewport not mounted");
            return Ok(MountStatus::MountPointMissing);
        }

        let size = host.window_size();
        self.renderer.set_clear_color(self.config.background);
        self.apply_size(size);
        host.append_to_mount_point(self.renderer.output_element())?;

        let cube_config = &self.config.cube;
        let cube = self.scene.add(Mesh::new(
            BoxGeometry::new(cube_config.width, cube_config.height, cube_config.depth),
            BasicMaterial::from_hex(cube_config.color),
        ));

        self.camera.position.z = self.config.camera.distance;

        let resize_listener = match host.add_resize_listener() {
            Ok(id) => id,
            Err(e) => {
                // Never rendered, so there is nothing on the GPU to dispose
                self.scene.remove(cube);
                let element = self.renderer.output_element();
                if host.is_mounted_child(element) {
                    if let Err(detach) = host.remove_from_mount_point(element) {
                        log::warn!("Failed to detach renderer output: {}", detach);
                    }
                }
                return Err(e.into());
            }
        };

        self.mounted = Some(Mounted {
            cube,
            resize_listener,
            pending_frame: None,
        });

        log::info!("Viewport mounted at {}x{}", size.width, size.height);

        // First frame runs right away; it schedules the rest
        self.on_frame(host);

        Ok(MountStatus::Mounted)
    }

    /// Advance the animation by one step, render and schedule the next frame.
    ///
    /// Does nothing unless mounted.
    pub fn on_frame<H: Host>(&mut self, host: &mut H) {
        let Some(mounted) = self.mounted.as_mut() else {
            log::debug!("Frame callback after unmount ignored");
            return;
        };

        match host.request_frame() {
            Ok(handle) => mounted.pending_frame = Some(handle),
            Err(e) => {
                mounted.pending_frame = None;
                log::error!("Failed to schedule next frame, animation stops: {}", e);
            }
        }

        let step = self.config.animation.rotation_step;
        if let Some(cube) = self.scene.get_mut(mounted.cube) {
            cube.rotation.x += step;
            cube.rotation.y += step;
        }

        match self.renderer.render(&self.scene, &self.camera) {
            Ok(()) => self.frame_count += 1,
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }

    /// Follow the host window size. Does nothing unless mounted.
    pub fn on_resize<H: Host>(&mut self, host: &H) {
        if self.mounted.is_none() {
            return;
        }
        let size = host.window_size();
        log::debug!("Viewport resized to {}x{}", size.width, size.height);
        self.apply_size(size);
    }

    /// Release listeners, the pending frame and every rendering resource, then
    /// detach from the mount point.
    ///
    /// Does nothing unless mounted, so disposal happens at most once.
    pub fn unmount<H>(&mut self, host: &mut H)
    where
        H: Host<Element = R::Output>,
    {
        let Some(mounted) = self.mounted.take() else {
            return;
        };

        host.remove_resize_listener(mounted.resize_listener);
        if let Some(frame) = mounted.pending_frame {
            host.cancel_frame(frame);
        }

        if let Some(cube) = self.scene.remove(mounted.cube) {
            self.renderer.dispose_geometry(&cube.geometry);
            self.renderer.dispose_material(&cube.material);
        }
        self.renderer.dispose();
        self.disposed = true;

        let element = self.renderer.output_element();
        if host.is_mounted_child(element) {
            if let Err(e) = host.remove_from_mount_point(element) {
                log::warn!("Failed to detach renderer output: {}", e);
            }
        }

        log::info!("Viewport unmounted after {} frames", self.frame_count);
    }

    fn apply_size(&mut self, size: WindowSize) {
        self.camera.set_aspect(size.aspect());
        self.camera.update_projection_matrix();
        self.renderer.set_size(size);
    }
}

impl<R: Renderer> Drop for Viewport<R> {
    fn drop(&mut self) {
        if self.mounted.is_some() {
            log::warn!("Viewport dropped while mounted; call unmount() to release host listeners");
        }
    }
}
