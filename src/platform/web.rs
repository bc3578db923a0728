//! Browser host
//!
//! `mount` wires a `Game` to a canvas: WebGPU draws the shapes, a 2D canvas
//! stacked on top draws the text, and `requestAnimationFrame` drives frames
//! until the handle is destroyed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::audio::web::WebAudio;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::game::{Game, StopHandle};
use crate::palette::Color;
use crate::persistence::web::LocalStore;
use crate::renderer::RenderState;
use crate::scene::{Align, DrawCmd, DrawSink, Frame};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{GamePhase, Key};

fn js_err(context: &str, e: impl std::fmt::Debug) -> JsValue {
    JsValue::from_str(&format!("{context}: {e:?}"))
}

fn css_color([r, g, b, a]: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}

/// 2D canvas laid over the GPU canvas for text
pub struct TextOverlay {
    ctx: CanvasRenderingContext2d,
}

impl TextOverlay {
    fn new(document: &web_sys::Document, canvas: &HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let overlay: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        overlay.set_width(canvas.width());
        overlay.set_height(canvas.height());

        let style = overlay.style();
        style.set_property("position", "absolute")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("left", &format!("{}px", canvas.offset_left()))?;
        style.set_property("top", &format!("{}px", canvas.offset_top()))?;
        style.set_property("width", &format!("{}px", canvas.client_width()))?;
        style.set_property("height", &format!("{}px", canvas.client_height()))?;

        if let Some(parent) = canvas.parent_node() {
            parent.insert_before(&overlay, canvas.next_sibling().as_ref())?;
        }

        let ctx: CanvasRenderingContext2d = overlay
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.scale(
            canvas.width() as f64 / FIELD_WIDTH as f64,
            canvas.height() as f64 / FIELD_HEIGHT as f64,
        )?;
        log::debug!("Text overlay ready at dpr {}", dpr);

        Ok(Self { ctx })
    }

    fn draw(&self, frame: &Frame) {
        self.ctx
            .clear_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        for cmd in &frame.cmds {
            let DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } = cmd
            else {
                continue;
            };
            let at: Vec2 = *pos + frame.offset;
            self.ctx.set_font(&format!("bold {}px monospace", size));
            self.ctx.set_fill_style_str(&css_color(*color));
            self.ctx.set_text_align(match align {
                Align::Left => "left",
                Align::Center => "center",
            });
            if let Err(e) = self.ctx.fill_text(text, at.x as f64, at.y as f64) {
                log::warn!("fill_text failed: {:?}", e);
            }
        }
    }
}

/// GPU shapes plus overlay text
pub struct WebSink {
    gpu: RenderState,
    overlay: TextOverlay,
}

impl DrawSink for WebSink {
    fn present(&mut self, frame: &Frame) {
        self.gpu.render_or_log(frame);
        self.overlay.draw(frame);
    }
}

struct Host {
    game: Game,
    sink: WebSink,
    raf_id: Option<i32>,
}

type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;
type ClickListener = Closure<dyn FnMut(MouseEvent)>;

/// Handle returned to the embedding page
#[wasm_bindgen]
pub struct SpaceTennis {
    host: Rc<RefCell<Host>>,
    stopped: StopHandle,
    canvas: HtmlCanvasElement,
    current: Rc<Cell<GamePhase>>,
    on_change: Rc<RefCell<Option<js_sys::Function>>>,
    keydown: Option<KeyListener>,
    keyup: Option<KeyListener>,
    click: Option<ClickListener>,
}

#[wasm_bindgen]
impl SpaceTennis {
    /// Stop the loop and detach every listener
    pub fn destroy(&mut self) {
        self.stopped.stop();
        // Inside a frame the loop sees the flag and stops on its own
        if let Ok(mut host) = self.host.try_borrow_mut() {
            host.game.stop();
            if let (Some(id), Some(window)) = (host.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
        *self.on_change.borrow_mut() = None;

        if let Some(window) = web_sys::window() {
            for (event, listener) in [("keydown", self.keydown.take()), ("keyup", self.keyup.take())] {
                if let Some(listener) = listener {
                    let _ = window.remove_event_listener_with_callback(
                        event,
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        }
        if let Some(listener) = self.click.take() {
            let _ = self
                .canvas
                .remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
        }
        log::info!("Space Tennis destroyed");
    }

    /// Same as clicking the canvas
    #[wasm_bindgen(js_name = handleClick)]
    pub fn handle_click(&self) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.game.click(),
            Err(_) => log::warn!("Click ignored while a frame is running"),
        }
    }

    /// Register a callback receiving the phase name on every change
    #[wasm_bindgen(js_name = setOnStateChange)]
    pub fn set_on_state_change(&self, callback: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    /// Current phase name
    pub fn phase(&self) -> String {
        self.current.get().as_str().to_string()
    }

    /// Current settings as JSON
    pub fn settings(&self) -> Result<String, JsValue> {
        let host = self
            .host
            .try_borrow()
            .map_err(|_| JsValue::from_str("frame in progress"))?;
        serde_json::to_string(host.game.settings()).map_err(|e| js_err("Bad settings", e))
    }

    /// Replace settings from JSON; missing fields take their defaults
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| js_err("Bad settings", e))?;
        self.with_game(|game| game.update_settings(settings))
    }

    /// Switch quality preset by name ("low", "medium", "high")
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&self, name: &str) -> Result<(), JsValue> {
        let preset = QualityPreset::parse(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown quality {name:?}")))?;
        self.with_game(|game| game.set_quality(preset))
    }
}

impl SpaceTennis {
    fn with_game(&self, f: impl FnOnce(&mut Game)) -> Result<(), JsValue> {
        let mut host = self
            .host
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("frame in progress"))?;
        f(&mut host.game);
        Ok(())
    }
}

fn schedule(host: Rc<RefCell<Host>>, stopped: StopHandle) {
    if stopped.is_stopped() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let next = host.clone();
    let closure = Closure::once(move |time: f64| {
        game_loop(next, stopped, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => host.borrow_mut().raf_id = Some(id),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

fn game_loop(host: Rc<RefCell<Host>>, stopped: StopHandle, time: f64) {
    let keep_going = {
        let mut h = host.borrow_mut();
        h.raf_id = None;
        let Host { game, sink, .. } = &mut *h;
        game.frame(time, sink)
    };

    if keep_going {
        schedule(host, stopped);
    }
}

/// Mount the game on the canvas with id `canvas_id`
#[wasm_bindgen]
pub async fn mount(canvas_id: String) -> Result<SpaceTennis, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into()?;

    // Backing store at device resolution, layout stays 800x600
    let dpr = window.device_pixel_ratio();
    let width = (FIELD_WIDTH as f64 * dpr) as u32;
    let height = (FIELD_HEIGHT as f64 * dpr) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| js_err("Failed to create surface", e))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| js_err("Failed to get adapter", e))?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let gpu = RenderState::new(surface, &adapter, width, height)
        .await
        .map_err(|e| js_err("Failed to create device", e))?;
    let overlay = TextOverlay::new(&document, &canvas, dpr)?;

    let seed = js_sys::Date::now() as u64;
    let mut game = Game::new(seed, Box::new(WebAudio::new()), Box::new(LocalStore::new()));

    let current = Rc::new(Cell::new(game.phase()));
    let on_change: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
    {
        let current = current.clone();
        let on_change = on_change.clone();
        game.set_phase_observer(move |phase| {
            current.set(phase);
            let callback = on_change.borrow().clone();
            if let Some(f) = callback
                && let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(phase.as_str()))
            {
                log::warn!("State change callback threw: {:?}", e);
            }
        });
    }

    let host = Rc::new(RefCell::new(Host {
        game,
        sink: WebSink { gpu, overlay },
        raf_id: None,
    }));

    // Keyboard
    let keydown = {
        let host = host.clone();
        Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let name = event.key();
            if Key::suppresses_default(&name) {
                event.prevent_default();
            }
            if let Some(key) = Key::from_dom(&name)
                && let Ok(mut h) = host.try_borrow_mut()
            {
                h.game.key_down(key);
            }
        })
    };
    let keyup = {
        let host = host.clone();
        Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_dom(&event.key())
                && let Ok(mut h) = host.try_borrow_mut()
            {
                h.game.key_up(key);
            }
        })
    };
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;

    // Mouse
    let click = {
        let host = host.clone();
        Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            if let Ok(mut h) = host.try_borrow_mut() {
                h.game.click();
            }
        })
    };
    canvas.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;

    let stopped = host.borrow().game.stop_handle();
    schedule(host.clone(), stopped.clone());
    log::info!("Space Tennis mounted on #{}", canvas_id);

    Ok(SpaceTennis {
        host,
        stopped,
        canvas,
        current,
        on_change,
        keydown: Some(keydown),
        keyup: Some(keyup),
        click: Some(click),
    })
}

/// Page entry point: mount on `#canvas` for the lifetime of the page
pub async fn run() {
    console_error_panic_hook::set_once();
    // A host page may have set up logging already
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Space Tennis starting...");

    match mount("canvas".to_string()).await {
        Ok(handle) => std::mem::forget(handle),
        Err(e) => log::error!("Failed to start: {:?}", e),
    }
}
