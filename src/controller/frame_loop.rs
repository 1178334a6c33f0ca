use std::rc::Rc;
use std::cell::RefCell;

use tracing::{info, warn};
use web_sys::{HtmlCanvasElement, Window};

use crate::controller::Session;
use crate::ui;
use crate::view::{GpuContext, Renderer};

/// Per-frame driver for the browser build
pub struct FrameLoopContext {
    pub session: Rc<RefCell<Session>>,
    pub gpu: GpuContext,
    pub renderer: Renderer,
    pub canvas: HtmlCanvasElement,
    pub egui_ctx: egui::Context,
    pub last_time: f64,
}

impl FrameLoopContext {
    /// Advance the session one frame and draw it
    pub fn tick(&mut self, window: &Window) {
        // Time step
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let dt = ((now - self.last_time) / 1000.0) as f32;
        self.last_time = now;

        self.handle_resize(window);

        let mut session = self.session.borrow_mut();
        session.frame(dt);

        self.renderer.sync_world(&self.gpu.device, &session.world);
        self.renderer.update(&self.gpu.queue, &session.camera, session.target_block());

        // HUD
        let dpr = window.device_pixel_ratio() as f32;
        let (width, height) = (self.gpu.config.width, self.gpu.config.height);
        let raw_input = egui::RawInput {
            time: Some(now / 1000.0),
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(width as f32 / dpr, height as f32 / dpr),
            )),
            ..Default::default()
        };
        self.egui_ctx.set_pixels_per_point(dpr);
        let output = ui::build_ui(&self.egui_ctx, raw_input, &session, dt);
        let ui_frame = ui::into_ui_frame(&self.egui_ctx, output, width, height);

        match self.renderer.draw(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, Some(ui_frame)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(e) => warn!("surface error: {e:?}"),
        }
    }

    /// Track the window size; the canvas is sized in physical pixels
    fn handle_resize(&mut self, window: &Window) {
        let dpr = window.device_pixel_ratio();
        let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) else {
            return;
        };
        let nw = (w.as_f64().unwrap_or(800.0) * dpr) as u32;
        let nh = (h.as_f64().unwrap_or(600.0) * dpr) as u32;
        if nw == 0 || nh == 0 || (nw == self.gpu.config.width && nh == self.gpu.config.height) {
            return;
        }

        info!(width = nw, height = nh, "resizing surface");
        self.canvas.set_width(nw);
        self.canvas.set_height(nh);
        self.gpu.resize(nw, nh);
        self.renderer.resize(&self.gpu.device, nw, nh);
        self.session.borrow_mut().camera.set_aspect(nw, nh);
    }
}
