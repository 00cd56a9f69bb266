//! viewport-shell - Native window for the viewport
//!
//! Opens a winit window, mounts a [`Viewport`] into it and keeps it spinning
//! until the window is closed, at which point the viewport is unmounted.

mod host;

pub use host::WindowHost;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use viewport::{HostError, MountStatus, Viewport, ViewportConfig, ViewportError, WindowSize};
use viewport_render::GpuRenderer;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser, Debug)]
#[command(name = "viewport-shell")]
#[command(about = "Show the spinning cube viewport in a native window", long_about = None)]
pub struct ShellOptions {
    /// TOML config file (camera, cube, animation, background)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = "viewport")]
    pub title: String,
}

impl ShellOptions {
    pub fn load_config(&self) -> Result<ViewportConfig, ViewportError> {
        match &self.config {
            Some(path) => ViewportConfig::load(path),
            None => Ok(ViewportConfig::default()),
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(options: ShellOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.load_config()?;

    let event_loop = EventLoop::new()?;
    let mut app = ShellApp::new(options, config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

type WindowViewport = Viewport<GpuRenderer<Arc<Window>>>;

struct Running {
    host: WindowHost,
    viewport: WindowViewport,
}

struct ShellApp {
    options: ShellOptions,
    config: ViewportConfig,
    running: Option<Running>,
    error: Option<ViewportError>,
}

impl ShellApp {
    fn new(options: ShellOptions, config: ViewportConfig) -> Self {
        Self {
            options,
            config,
            running: None,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Option<Running>, ViewportError> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.options.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.width as f64,
                self.options.height as f64,
            ));
        let window = event_loop
            .create_window(window_attributes)
            .map_err(|e| HostError::new(format!("Failed to create window: {}", e)))?;
        let window = Arc::new(window);

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let renderer = pollster::block_on(GpuRenderer::new(
            window.clone(),
            WindowSize::new(size.width, size.height),
        ))?;

        let mut host = WindowHost::new(window);
        let mut viewport = Viewport::new(self.config.clone(), renderer);

        match viewport.mount(&mut host)? {
            MountStatus::Mounted => Ok(Some(Running { host, viewport })),
            MountStatus::MountPointMissing => Ok(None),
        }
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(Some(running)) => self.running = Some(running),
            Ok(None) => {
                log::warn!("Nothing to show, exiting");
                event_loop.exit();
            }
            Err(e) => {
                log::error!("Failed to start viewport: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(Running { host, viewport }) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                viewport.unmount(host);
                self.running = None;
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if host.is_listening_for_resize() {
                    viewport.on_resize(&*host);
                }
            }
            WindowEvent::RedrawRequested => {
                if host.take_due_frame() {
                    viewport.on_frame(host);
                }
            }
            _ => {}
        }
    }
}
