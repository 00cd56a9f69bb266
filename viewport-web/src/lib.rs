//! viewport-web - Browser entry point for the viewport
//!
//! `mount("root")` puts a canvas with the spinning cube into the element with
//! that id and returns a handle; `handle.unmount()` tears everything down
//! again. Only does anything on wasm32.

#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::fmt::Display;
    use std::rc::{Rc, Weak};

    use viewport::{MountStatus, Viewport, ViewportConfig};
    use viewport_render::GpuRenderer;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    use crate::host::WebHost;

    struct WebApp {
        viewport: Viewport<GpuRenderer<HtmlCanvasElement>>,
        host: WebHost,
    }

    #[wasm_bindgen(start)]
    pub fn init() {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        // A second module instance on the page already installed a logger
        let _ = console_log::init_with_level(log::Level::Info);
    }

    /// Mount the viewport with the default configuration.
    #[wasm_bindgen]
    pub async fn mount(mount_id: String) -> Result<ViewportHandle, JsValue> {
        start(&mount_id, ViewportConfig::default()).await
    }

    /// Mount the viewport with a JSON configuration; missing fields keep their defaults.
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub async fn mount_with_config(
        mount_id: String,
        config_json: String,
    ) -> Result<ViewportHandle, JsValue> {
        let config = ViewportConfig::from_json_str(&config_json).map_err(to_js)?;
        start(&mount_id, config).await
    }

    async fn start(mount_id: &str, config: ViewportConfig) -> Result<ViewportHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js("No window found"))?;
        let document = window.document().ok_or_else(|| to_js("No document found"))?;

        let Some(mount_point) = document.get_element_by_id(mount_id) else {
            log::warn!("No element with id '{}', viewport not mounted", mount_id);
            return Ok(ViewportHandle { app: None });
        };

        let canvas = document
            .create_element("canvas")
            .map_err(|e| to_js(format!("Failed to create canvas: {:?}", e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| to_js(format!("Failed to cast to HtmlCanvasElement: {:?}", e)))?;
        canvas
            .style()
            .set_property("display", "block")
            .map_err(|e| to_js(format!("{:?}", e)))?;

        let size = WebHost::inner_size(&window);
        let renderer = GpuRenderer::new(canvas, size).await.map_err(to_js)?;
        let viewport = Viewport::new(config, renderer);

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<WebApp>>| {
            let on_resize = {
                let weak = weak.clone();
                Closure::<dyn FnMut()>::new(move || {
                    with_app(&weak, |viewport, host| viewport.on_resize(&*host));
                })
            };
            let on_frame = {
                let weak = weak.clone();
                Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                    with_app(&weak, |viewport, host| viewport.on_frame(host));
                })
            };
            RefCell::new(WebApp {
                viewport,
                host: WebHost::new(window, Some(mount_point), on_resize, on_frame),
            })
        });

        let status = {
            let mut guard = app.borrow_mut();
            let WebApp { viewport, host } = &mut *guard;
            viewport.mount(host).map_err(to_js)?
        };

        match status {
            MountStatus::Mounted => Ok(ViewportHandle { app: Some(app) }),
            MountStatus::MountPointMissing => Ok(ViewportHandle { app: None }),
        }
    }

    /// Callbacks that fire after the app is gone, or while it is busy, are dropped.
    fn with_app(
        weak: &Weak<RefCell<WebApp>>,
        f: impl FnOnce(&mut Viewport<GpuRenderer<HtmlCanvasElement>>, &mut WebHost),
    ) {
        let Some(app) = weak.upgrade() else {
            return;
        };
        let Ok(mut guard) = app.try_borrow_mut() else {
            log::debug!("Viewport busy, callback skipped");
            return;
        };
        let WebApp { viewport, host } = &mut *guard;
        f(viewport, host);
    }

    fn to_js(e: impl Display) -> JsValue {
        js_sys::Error::new(&e.to_string()).into()
    }

    /// A mounted (or never mounted) viewport.
    ///
    /// Dropping the handle from JS (`free()`) unmounts it as well.
    #[wasm_bindgen]
    pub struct ViewportHandle {
        app: Option<Rc<RefCell<WebApp>>>,
    }

    #[wasm_bindgen]
    impl ViewportHandle {
        /// Stop the animation, release GPU resources and remove the canvas.
        pub fn unmount(&mut self) {
            if let Some(app) = self.app.take() {
                let mut guard = app.borrow_mut();
                let WebApp { viewport, host } = &mut *guard;
                viewport.unmount(host);
            }
        }

        #[wasm_bindgen(getter)]
        pub fn mounted(&self) -> bool {
            self.app
                .as_ref()
                .is_some_and(|app| app.borrow().viewport.is_mounted())
        }

        #[wasm_bindgen(getter, js_name = frameCount)]
        pub fn frame_count(&self) -> f64 {
            self.app
                .as_ref()
                .map_or(0.0, |app| app.borrow().viewport.frame_count() as f64)
        }
    }

    impl Drop for ViewportHandle {
        fn drop(&mut self) {
            self.unmount();
        }
    }
}
