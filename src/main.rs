#[cfg(not(target_arch = "wasm32"))]
mod native_app {
    use std::sync::Arc;
    use std::time::Instant;

    use tracing::{error, info, warn};
    use winit::{
        application::ApplicationHandler,
        event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
        event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
        keyboard::{KeyCode, PhysicalKey},
        window::{CursorGrabMode, Window, WindowId},
    };

    // Import from the library crate
    use blockwalk::{
        config::GameConfig,
        controller::{input::native, InputEvent, Session},
        error::GpuError,
        logging, ui,
        view::{GpuContext, Renderer},
    };

    struct App {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: Renderer,
        session: Session,
        egui_ctx: egui::Context,
        egui_state: egui_winit::State,
        last_frame_time: Instant,
    }

    impl App {
        async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
            let gpu = GpuContext::new_native(window.clone()).await?;
            let (width, height) = (gpu.config.width, gpu.config.height);
            let renderer = Renderer::new(&gpu.device, gpu.format, width, height);
            let session = Session::new(&GameConfig::default(), width, height);

            let egui_ctx = egui::Context::default();
            let egui_state = egui_winit::State::new(
                egui_ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                None,
                None,
                None,
            );

            Ok(Self {
                window,
                gpu,
                renderer,
                session,
                egui_ctx,
                egui_state,
                last_frame_time: Instant::now(),
            })
        }

        fn set_locked(&mut self, locked: bool) {
            if locked {
                let grabbed = self
                    .window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grabbed {
                    warn!("cursor grab failed: {e}");
                    return;
                }
            } else if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!("cursor release failed: {e}");
            }
            self.window.set_cursor_visible(!locked);
            self.session.apply_event(&InputEvent::PointerLockChanged { locked });
        }

        /// Returns true when the event was consumed as game input
        fn input(&mut self, event: &WindowEvent) -> bool {
            // Let egui see everything, but it only wins while the cursor is free
            let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
            if egui_captured && !self.session.is_locked() {
                return true;
            }

            match event {
                WindowEvent::KeyboardInput {
                    event: KeyEvent { state, physical_key: PhysicalKey::Code(code), repeat, .. },
                    ..
                } => {
                    if *code == KeyCode::Escape && *state == ElementState::Pressed {
                        self.set_locked(false);
                    }
                    let name = native::key_code_name(*code);
                    let event = match state {
                        ElementState::Pressed if *repeat => return true,
                        ElementState::Pressed => InputEvent::KeyDown(name),
                        ElementState::Released => InputEvent::KeyUp(name),
                    };
                    self.session.apply_event(&event);
                    true
                }
                WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
                    if !self.session.is_locked() {
                        if *button == MouseButton::Left {
                            self.set_locked(true);
                        }
                    } else {
                        self.session.apply_event(&InputEvent::MouseDown(native::mouse_button(*button)));
                    }
                    true
                }
                WindowEvent::Focused(false) => {
                    self.set_locked(false);
                    self.session.apply_event(&InputEvent::FocusLost);
                    true
                }
                WindowEvent::Occluded(occluded) => {
                    self.session.apply_event(&InputEvent::VisibilityChanged { visible: !occluded });
                    true
                }
                _ => false,
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            if width == 0 || height == 0 {
                return;
            }
            info!(width, height, "resizing surface");
            self.gpu.resize(width, height);
            self.renderer.resize(&self.gpu.device, width, height);
            self.session.camera.set_aspect(width, height);
        }

        fn redraw(&mut self, event_loop: &ActiveEventLoop) {
            let now = Instant::now();
            let dt = (now - self.last_frame_time).as_secs_f32();
            self.last_frame_time = now;

            self.session.frame(dt);
            self.renderer.sync_world(&self.gpu.device, &self.session.world);
            self.renderer
                .update(&self.gpu.queue, &self.session.camera, self.session.target_block());

            let raw_input = self.egui_state.take_egui_input(&self.window);
            let mut output = ui::build_ui(&self.egui_ctx, raw_input, &self.session, dt);
            let platform_output = std::mem::take(&mut output.platform_output);
            self.egui_state.handle_platform_output(&self.window, platform_output);
            let ui_frame = ui::into_ui_frame(&self.egui_ctx, output, self.gpu.config.width, self.gpu.config.height);

            match self.renderer.draw(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, Some(ui_frame)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!("surface error: {e:?}"),
            }
        }
    }

    #[derive(Default)]
    struct Host {
        app: Option<App>,
    }

    impl ApplicationHandler for Host {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.app.is_some() {
                return;
            }
            let attributes = Window::default_attributes()
                .with_title("Blockwalk")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
            let window = match event_loop.create_window(attributes) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    error!("failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(App::new(window)) {
                Ok(app) => self.app = Some(app),
                Err(e) => {
                    error!("GPU init failed: {e}");
                    event_loop.exit();
                }
            }
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
            let Some(app) = self.app.as_mut() else { return };
            if window_id != app.window.id() || app.input(&event) {
                return;
            }
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => app.resize(size.width, size.height),
                WindowEvent::RedrawRequested => app.redraw(event_loop),
                _ => {}
            }
        }

        fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
            if let (Some(app), DeviceEvent::MouseMotion { delta }) = (self.app.as_mut(), event) {
                app.session.apply_event(&InputEvent::MouseMove {
                    dx: delta.0 as f32,
                    dy: delta.1 as f32,
                });
            }
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(app) = self.app.as_ref() {
                app.window.request_redraw();
            }
        }
    }

    pub fn run() {
        logging::init();

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                error!("failed to create event loop: {e}");
                return;
            }
        };
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut host = Host::default();
        if let Err(e) = event_loop.run_app(&mut host) {
            error!("event loop exited with error: {e}");
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    native_app::run();
}
