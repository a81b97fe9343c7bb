//! When Pigs Fly entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlTextAreaElement};

    use when_pigs_fly::consts::*;
    use when_pigs_fly::export::export_filename;
    use when_pigs_fly::overlay::{Overlay, sign_labels_html, with_hidden};
    use when_pigs_fly::renderer::{self, DrawList, QuadRenderState};
    use when_pigs_fly::sim::PointerEvent;
    use when_pigs_fly::{App, Tuning};

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<QuadRenderState>,
        /// Milliseconds of simulation owed
        accumulator: f32,
        last_time: f64,
        /// Last markup written to `#sign-labels`
        sign_labels: String,
    }

    impl Game {
        fn new(seed: u64, viewport: Vec2) -> Self {
            Self {
                app: App::new(seed, viewport, Tuning::default()),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                sign_labels: String::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f32) {
            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                self.app.tick(SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self, list: &DrawList) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(list) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Sync overlay elements with the active scene
        fn update_dom(&mut self, list: &DrawList) {
            let Some(document) = dom_document() else {
                return;
            };
            let overlay = Overlay::from_app(&self.app);
            for &(id, visible) in &overlay.visible {
                set_visible(&document, id, visible);
            }
            for (id, text) in &overlay.text {
                set_text(&document, id, text);
            }

            let labels = sign_labels_html(&list.labels);
            if labels != self.sign_labels {
                if let Some(el) = document.get_element_by_id("sign-labels") {
                    el.set_inner_html(&labels);
                }
                self.sign_labels = labels;
            }
        }
    }

    fn dom_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Toggle only the `hidden` class token
    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let current = el.class_name();
            let class = with_hidden(&current, !visible);
            if class != current {
                el.set_class_name(&class);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Current value of an input or textarea, empty if missing
    fn field_value(document: &Document, id: &str) -> String {
        let Some(el) = document.get_element_by_id(id) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    /// Hand `bytes` to the browser as a file download
    fn download(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
        let document = dom_document().ok_or_else(|| JsValue::from_str("no document"))?;
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::new();
        parts.push(&array);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("model/stl");
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;

        let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();
        web_sys::Url::revoke_object_url(&url)?;
        log::info!("Downloaded {} ({} bytes)", filename, bytes.len());
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("When Pigs Fly starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let (viewport, width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = QuadRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_pointer_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(canvas, game.clone());

        request_animation_frame(game);

        log::info!("When Pigs Fly running!");
        Ok(())
    }

    /// CSS viewport plus the physical surface size
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Vec2, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (Vec2::new(client_w as f32, client_h as f32), width, height)
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let events: [(&'static str, fn(Vec2) -> PointerEvent); 3] = [
            ("pointerdown", PointerEvent::Down),
            ("pointermove", PointerEvent::Move),
            ("pointerup", PointerEvent::Up),
        ];
        for (name, make) in events {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                event.prevent_default();
                let p = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let outcome = game.borrow_mut().app.pointer(make(p));
                log::debug!("{name}: {:?}", outcome);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: &Rc<RefCell<Game>>,
        mut handler: impl FnMut(&mut Game, &Document) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}");
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            if let Some(document) = dom_document() {
                handler(&mut game.borrow_mut(), &document);
            }
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", &game, |g, _| {
            g.app.start_run();
        });
        on_click(document, "end-run-btn", &game, |g, _| {
            g.app.end_run();
        });
        on_click(document, "restart-btn", &game, |g, _| {
            g.app.restart();
        });
        on_click(document, "generate-btn", &game, |g, _| {
            if let Some(recap) = g.app.recap_mut() {
                recap.retry();
                recap.request_export();
            }
        });
        on_click(document, "download-btn", &game, |g, _| {
            let Some(bytes) = g.app.recap().and_then(|r| r.export_bytes()) else {
                return;
            };
            let filename = export_filename(js_sys::Date::now());
            if let Err(e) = download(bytes, &filename) {
                log::error!("Download failed: {:?}", e);
            }
        });
        on_click(document, "send-email-btn", &game, |g, document| {
            let address = field_value(document, "email-input");
            if let Some(recap) = g.app.recap_mut() {
                let _ = recap.send_email(&address);
            }
        });
        on_click(document, "print-btn", &game, |g, _| {
            if let Some(recap) = g.app.recap_mut() {
                recap.open_print_form();
            }
        });
        on_click(document, "print-submit-btn", &game, |g, document| {
            let Some(recap) = g.app.recap_mut() else {
                return;
            };
            if let Some(form) = recap.print_form_mut() {
                form.name = field_value(document, "lead-name");
                form.email = field_value(document, "lead-email");
                form.phone = field_value(document, "lead-phone");
                form.notes = field_value(document, "lead-notes");
            }
            let _ = recap.submit_print_form();
        });
        on_click(document, "print-cancel-btn", &game, |g, _| {
            g.app.cancel_print_form();
        });
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (viewport, width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut g = game.borrow_mut();
            g.app.resize(viewport);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms);
            let list = renderer::build(&g.app);
            g.render(&list);
            g.update_dom(&list);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

/// Headless run: aim, power, launch and glide until the player settles,
/// then export the recap composite. An optional JSON file overrides tuning.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use when_pigs_fly::consts::SIM_DT_MS;
    use when_pigs_fly::sim::PointerEvent;
    use when_pigs_fly::{App, Tuning};

    env_logger::init();
    log::info!("When Pigs Fly (native) starting...");
    log::info!("Native mode runs a headless simulation - use `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let viewport = Vec2::new(1280.0, 720.0);
    let mut app = App::new(42, viewport, tuning);
    app.start_run();

    // Aim 45 degrees up, then wait for a strong power reading
    let Some(run) = app.run() else {
        return;
    };
    let target = run
        .camera
        .world_to_screen(run.launch_pivot + Vec2::new(100.0, -100.0));
    app.pointer(PointerEvent::Down(target));
    app.pointer(PointerEvent::Up(target));
    while app.run().is_some_and(|r| r.power.level < 0.8) {
        app.tick(SIM_DT_MS);
    }
    app.pointer(PointerEvent::Down(target));

    // Fly, boosting every second while the meter allows
    let mut ticks = 0u32;
    while app.run().is_some_and(|r| !r.hud.end_run_button) && ticks < 60 * 120 {
        if ticks % 60 == 0 {
            app.pointer(PointerEvent::Down(target));
        }
        app.tick(SIM_DT_MS);
        ticks += 1;
    }

    if !app.end_run() {
        log::warn!("Run did not settle after {ticks} ticks");
        return;
    }
    let Some(recap) = app.recap_mut() else {
        return;
    };
    println!(
        "Distance: {}m, collected: {}",
        recap.summary.distance,
        recap.summary.inventory.total()
    );
    for (color, count) in recap.summary.inventory.iter() {
        println!("  {:<7} {}", color.as_str(), count);
    }

    recap.request_export();
    while recap.export_bytes().is_none() && recap.export == when_pigs_fly::recap::ExportFlow::Generating {
        recap.tick(SIM_DT_MS);
    }
    match recap.export_bytes() {
        Some(bytes) => println!("STL: {} bytes, {} segments", bytes.len(), recap.segments.len()),
        None => println!("STL export failed"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
