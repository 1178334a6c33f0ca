// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub use web::start;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{error, info};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use crate::config::GameConfig;
    use crate::controller::input::wasm as web_input;
    use crate::controller::{FrameLoopContext, InputEvent, KeyBindings, Session};
    use crate::logging;
    use crate::view::{GpuContext, Renderer};

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();
        let (window, document, canvas) = init_canvas()?;
        setup_app(window, document, canvas).await
    }

    /// Main application setup for WASM
    async fn setup_app(window: Window, document: Document, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let gpu = GpuContext::new(&canvas, canvas.width(), canvas.height())
            .await
            .map_err(|e| js_error(format!("GPU init failed: {e}")))?;

        let width = gpu.config.width;
        let height = gpu.config.height;
        let renderer = Renderer::new(&gpu.device, gpu.format, width, height);

        let session = Rc::new(RefCell::new(Session::new(&GameConfig::default(), width, height)));
        setup_input_listeners(&document, &window, &canvas, session.clone())?;
        info!(width, height, "session started");

        let mut frame_ctx = FrameLoopContext {
            session,
            gpu,
            renderer,
            canvas,
            egui_ctx: egui::Context::default(),
            last_time: window.performance().map(|p| p.now()).unwrap_or(0.0),
        };

        // Continuous redraw using requestAnimationFrame
        let window_for_loop = window.clone();
        RcCellCallback::new(window, move || frame_ctx.tick(&window_for_loop)).start();

        Ok(())
    }

    /// Wire DOM events into the session's input latch
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        canvas: &HtmlCanvasElement,
        session: Rc<RefCell<Session>>,
    ) -> Result<(), JsValue> {
        let bindings = KeyBindings::default();

        // Keyboard down
        {
            let session = session.clone();
            let bindings = bindings.clone();
            let document_for_exit = document.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                let code = e.code();
                if bindings.is_escape(&code) {
                    document_for_exit.exit_pointer_lock();
                }
                // Keep space and arrows from scrolling the page
                if bindings.is_bound(&code) {
                    e.prevent_default();
                }
                session.borrow_mut().apply_event(&web_input::keyboard_event_to_input(&e, true));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let session = session.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                session.borrow_mut().apply_event(&web_input::keyboard_event_to_input(&e, false));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Focus loss - clear all keys
        {
            let session = session.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                session.borrow_mut().apply_event(&InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Visibility change - clear all keys
        {
            let session = session.clone();
            let doc_vis = document.clone();
            let visibility = Closure::wrap(Box::new(move |_e: Event| {
                let visible = !doc_vis.hidden();
                session.borrow_mut().apply_event(&InputEvent::VisibilityChanged { visible });
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
            visibility.forget();
        }

        // Pointer lock change drives Locked/Unlocked
        {
            let session = session.clone();
            let doc_pl = document.clone();
            let plc = Closure::wrap(Box::new(move |_e: Event| {
                let locked = doc_pl.pointer_lock_element().is_some();
                session.borrow_mut().apply_event(&InputEvent::PointerLockChanged { locked });
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback("pointerlockchange", plc.as_ref().unchecked_ref())?;
            plc.forget();
        }

        // Canvas click to enter pointer lock
        {
            let session = session.clone();
            let canvas_click = canvas.clone();
            let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
                if session.borrow().is_locked() {
                    return;
                }
                canvas_click.request_pointer_lock();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
        }

        // Mouse move
        {
            let session = session.clone();
            let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
                session.borrow_mut().apply_event(&web_input::mouse_move_to_input(&e));
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
            mm.forget();
        }

        // Mouse down - queue block break/place
        {
            let session = session.clone();
            let mousedown = Closure::wrap(Box::new(move |e: MouseEvent| {
                session.borrow_mut().apply_event(&web_input::mouse_down_to_input(&e));
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
            mousedown.forget();
        }

        // Context menu prevention
        {
            let contextmenu = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.prevent_default();
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("contextmenu", contextmenu.as_ref().unchecked_ref())?;
            contextmenu.forget();
        }

        Ok(())
    }

    /// Full-viewport canvas appended to <body>, sized in physical pixels
    fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
        let document = window.document().ok_or_else(|| js_error("no document on window"))?;
        let body = document.body().ok_or_else(|| js_error("no body on document"))?;
        body.set_attribute("style", "margin:0;overflow:hidden")?;

        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        canvas_el.set_attribute("style", "display:block;width:100vw;height:100vh")?;

        let dpr = window.device_pixel_ratio();
        let css_width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let css_height = window.inner_height()?.as_f64().unwrap_or(600.0);
        canvas_el.set_width((css_width * dpr) as u32);
        canvas_el.set_height((css_height * dpr) as u32);

        body.append_child(&canvas_el)?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Recursively schedule next frame
                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                if let Err(e) = self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    error!("requestAnimationFrame failed to start: {e:?}");
                }
            }

            // Leak the closure to keep it alive
            std::mem::forget(callback);
        }
    }
}
